//! Rental Ledger Models
//!
//! Immutable records of completed checkouts.

use crate::cart::models::{PurchaseType, RentalDuration};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalStatus {
    Confirmed,
    Processing,
    Active,
    #[serde(rename = "Awaiting Return")]
    AwaitingReturn,
    Returned,
    #[serde(rename = "Payment Failed")]
    PaymentFailed,
}

/// A line of a rental, frozen at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentalEntryItem {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_buy: Option<u64>,
    pub price_rent: u64,
    pub quantity: u32,
    pub purchase_type: PurchaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_duration: Option<RentalDuration>,
    /// Unit price charged: the buy price, or the daily rate times the days.
    pub price_at_rental: u64,
}

/// One completed checkout in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentalEntry {
    pub id: String,
    pub items: Vec<RentalEntryItem>,
    pub total_amount: u64,
    /// Checkout date.
    pub rental_date: NaiveDate,
    pub status: RentalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_due_date: Option<NaiveDate>,
}

/// Ledger entry before id, date and status are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    pub items: Vec<RentalEntryItem>,
    pub total_amount: u64,
    pub rental_start_date: Option<NaiveDate>,
    pub rental_due_date: Option<NaiveDate>,
}

/// `payment_status` flag accepted by the rental detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatusFlag {
    Success,
    Failure,
}

/// Query string of `GET /rentals/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct RentalDetailParams {
    pub payment_status: Option<PaymentStatusFlag>,
}

/// Rental as shown on its detail page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalView {
    #[serde(flatten)]
    pub entry: RentalEntry,
    /// Due date has passed and the tools are not back.
    pub overdue: bool,
}
