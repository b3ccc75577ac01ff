//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the cart: line
//! items, their merge key, and the request/response shapes of the cart API.

use crate::catalog::models::Tool;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Purchase Type and Rental Duration
// =============================================================================

/// Whether a line item is rented or bought outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    Rent,
    Buy,
}

/// How long a rented line item is booked for.
///
/// The three durations offered by the storefront are named; anything else
/// (e.g. `"5days"` produced from a date range) is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RentalDuration {
    #[default]
    OneDay,
    ThreeDays,
    OneWeek,
    Custom(String),
}

impl RentalDuration {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OneDay => "1day",
            Self::ThreeDays => "3days",
            Self::OneWeek => "1week",
            Self::Custom(raw) => raw,
        }
    }

    /// Label for a booking of `days` days: `1day` or `<n>days`.
    pub fn from_days(days: u64) -> Self {
        if days == 1 {
            Self::OneDay
        } else {
            Self::from(format!("{days}days"))
        }
    }
}

impl From<String> for RentalDuration {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "1day" => Self::OneDay,
            "3days" => Self::ThreeDays,
            "1week" => Self::OneWeek,
            _ => Self::Custom(raw),
        }
    }
}

impl From<&str> for RentalDuration {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RentalDuration> for String {
    fn from(duration: RentalDuration) -> Self {
        match duration {
            RentalDuration::Custom(raw) => raw,
            named => named.as_str().to_string(),
        }
    }
}

impl fmt::Display for RentalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart Line Items
// =============================================================================

/// Identity of a line item for merging: buy lines carry no duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub tool_id: String,
    pub purchase_type: PurchaseType,
    pub rental_duration: Option<RentalDuration>,
}

impl LineKey {
    /// Builds the key, defaulting a missing rental duration to one day and
    /// dropping the duration of buy lines.
    pub fn new(
        tool_id: impl Into<String>,
        purchase_type: PurchaseType,
        rental_duration: Option<RentalDuration>,
    ) -> Self {
        let rental_duration = match purchase_type {
            PurchaseType::Rent => Some(rental_duration.unwrap_or_default()),
            PurchaseType::Buy => None,
        };
        Self {
            tool_id: tool_id.into(),
            purchase_type,
            rental_duration,
        }
    }
}

/// One row of the cart: a snapshot of the tool plus what was chosen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Tool as it was when added.
    #[serde(flatten)]
    pub tool: Tool,

    /// Always at least 1.
    pub quantity: u32,

    pub purchase_type: PurchaseType,

    /// Present only on rent lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_duration: Option<RentalDuration>,
}

impl CartLineItem {
    pub fn key(&self) -> LineKey {
        LineKey {
            tool_id: self.tool.id.clone(),
            purchase_type: self.purchase_type,
            rental_duration: self.rental_duration.clone(),
        }
    }

    pub fn matches(&self, key: &LineKey) -> bool {
        self.tool.id == key.tool_id
            && self.purchase_type == key.purchase_type
            && (self.purchase_type == PurchaseType::Buy
                || self.rental_duration == key.rental_duration)
    }
}

// =============================================================================
// API Inputs
// =============================================================================

/// Returns the default quantity (1) for cart additions
fn default_quantity() -> u32 {
    1
}

/// Body of `POST /cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub tool_id: String,
    pub purchase_type: PurchaseType,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Ignored for purchases; defaults to `1day` for rentals.
    pub rental_duration: Option<RentalDuration>,
}

/// Body of `DELETE /cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemInput {
    pub tool_id: String,
    pub purchase_type: PurchaseType,
    pub rental_duration: Option<RentalDuration>,
}

/// Body of `PATCH /cart/items/quantity`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    pub tool_id: String,
    pub purchase_type: PurchaseType,
    pub rental_duration: Option<RentalDuration>,

    /// Values below 1 remove the line item.
    pub quantity: i64,
}

/// Body of `PATCH /cart/items/duration`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDurationInput {
    pub tool_id: String,
    pub rental_duration: RentalDuration,
}

// =============================================================================
// API Responses
// =============================================================================

/// Cart contents returned by every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub session_id: String,
    pub items: Vec<CartLineItem>,
    /// Sum of all line quantities.
    pub item_count: u64,
    pub total: u64,
}
