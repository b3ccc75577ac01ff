//! Checkout Models
//!
//! The checkout is a small state machine walked by user actions:
//!
//! ```text
//! Cart -> AgreementPending -> AgreementAccepted -> PaymentProcessing
//!                                                    |-> PaymentSucceeded -> Confirmed
//!                                                    `-> PaymentFailed -> PaymentProcessing (retry)
//! ```

use super::payment::PaymentOutcome;
use crate::cart::{helpers::cart_total, models::CartLineItem};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Phases and Errors
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutPhase {
    #[default]
    Cart,
    AgreementPending,
    AgreementAccepted,
    PaymentProcessing,
    PaymentSucceeded,
    PaymentFailed,
    Confirmed,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cart => "cart",
            Self::AgreementPending => "agreement pending",
            Self::AgreementAccepted => "agreement accepted",
            Self::PaymentProcessing => "payment processing",
            Self::PaymentSucceeded => "payment succeeded",
            Self::PaymentFailed => "payment failed",
            Self::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("the rental agreement must be accepted")]
    AgreementDeclined,

    #[error("cannot {action} while checkout is in phase '{from}'")]
    InvalidTransition {
        from: CheckoutPhase,
        action: &'static str,
    },
}

// =============================================================================
// Add-on Services
// =============================================================================

/// Optional paid services booked with a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonService {
    /// Home delivery.
    Delivery,
    /// Access to tool manuals and tutorial videos.
    Manuals,
    /// Damage insurance coverage.
    Insurance,
}

impl AddonService {
    pub fn price(self) -> u64 {
        match self {
            Self::Delivery => 200,
            Self::Manuals => 50,
            Self::Insurance => 150,
        }
    }
}

// =============================================================================
// Checkout Session
// =============================================================================

/// Checkout progress of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutSession {
    phase: CheckoutPhase,
    items: Vec<CartLineItem>,
    addons: Vec<AddonService>,
    amount: u64,
    attempts: u32,
    rental_id: Option<String>,
}

impl CheckoutSession {
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Cart snapshot taken when the checkout started.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Amount to charge: cart total plus add-ons.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn rental_id(&self) -> Option<&str> {
        self.rental_id.as_deref()
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            from: self.phase,
            action,
        }
    }

    /// Snapshots the cart and moves to the agreement step.
    ///
    /// Allowed from any phase except while a payment is processing or has
    /// succeeded but is not yet confirmed. A previous checkout is discarded.
    pub fn begin(
        &mut self,
        items: Vec<CartLineItem>,
        addons: Vec<AddonService>,
    ) -> Result<(), CheckoutError> {
        if matches!(
            self.phase,
            CheckoutPhase::PaymentProcessing | CheckoutPhase::PaymentSucceeded
        ) {
            return Err(self.invalid("start checkout"));
        }
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut addons = addons;
        addons.sort_by_key(|a| *a as u8);
        addons.dedup();

        let addons_total: u64 = addons.iter().map(|a| a.price()).sum();
        *self = Self {
            phase: CheckoutPhase::AgreementPending,
            amount: cart_total(&items).saturating_add(addons_total),
            items,
            addons,
            attempts: 0,
            rental_id: None,
        };
        Ok(())
    }

    /// Records the user's answer to the rental agreement.
    pub fn accept_agreement(&mut self, accepted: bool) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::AgreementPending {
            return Err(self.invalid("answer the agreement"));
        }
        if !accepted {
            return Err(CheckoutError::AgreementDeclined);
        }
        self.phase = CheckoutPhase::AgreementAccepted;
        Ok(())
    }

    /// Marks a payment attempt as in flight and returns the amount to charge.
    ///
    /// Rejects re-submission while an attempt is processing.
    pub fn start_payment(&mut self) -> Result<u64, CheckoutError> {
        match self.phase {
            CheckoutPhase::AgreementAccepted | CheckoutPhase::PaymentFailed => {
                self.phase = CheckoutPhase::PaymentProcessing;
                self.attempts += 1;
                Ok(self.amount)
            }
            _ => Err(self.invalid("submit payment")),
        }
    }

    /// Applies the gateway's answer to the in-flight attempt.
    pub fn finish_payment(&mut self, outcome: PaymentOutcome) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::PaymentProcessing {
            return Err(self.invalid("finish payment"));
        }
        self.phase = match outcome {
            PaymentOutcome::Approved => CheckoutPhase::PaymentSucceeded,
            PaymentOutcome::Declined => CheckoutPhase::PaymentFailed,
        };
        Ok(())
    }

    /// Gives up on an attempt that never received the gateway's answer.
    ///
    /// The checkout lands in `PaymentFailed`, so the attempt can be retried.
    pub fn abort_payment(&mut self) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::PaymentProcessing {
            return Err(self.invalid("abort payment"));
        }
        self.phase = CheckoutPhase::PaymentFailed;
        Ok(())
    }

    /// Closes a paid checkout with the rental it produced.
    pub fn confirm(&mut self, rental_id: String) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::PaymentSucceeded {
            return Err(self.invalid("confirm"));
        }
        self.phase = CheckoutPhase::Confirmed;
        self.rental_id = Some(rental_id);
        Ok(())
    }

    pub fn view(&self) -> CheckoutView {
        CheckoutView {
            phase: self.phase,
            amount: self.amount,
            addons: self.addons.clone(),
            item_count: self.items.len(),
            attempts: self.attempts,
            rental_id: self.rental_id.clone(),
        }
    }
}

// =============================================================================
// API Inputs and Responses
// =============================================================================

/// Body of `POST /checkout/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartCheckoutInput {
    #[serde(default)]
    pub addons: Vec<AddonService>,
}

/// Body of `POST /checkout/agreement`.
#[derive(Debug, Deserialize)]
pub struct AgreementInput {
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub phase: CheckoutPhase,
    pub amount: u64,
    pub addons: Vec<AddonService>,
    pub item_count: usize,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_id: Option<String>,
}

/// Outcome flag of a payment attempt, as carried to the confirmation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failure,
}

/// Response of `POST /checkout/payment`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_status: PaymentStatus,
    #[serde(flatten)]
    pub checkout: CheckoutView,
}
