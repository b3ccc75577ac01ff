//! Rental Ledger Helpers

use super::models::{
    NewRental, PaymentStatusFlag, RentalEntry, RentalEntryItem, RentalStatus, RentalView,
};
use crate::cart::{
    helpers::resolve_days,
    models::{CartLineItem, PurchaseType},
};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;

const RENTAL_ID_PREFIX: &str = "CCH";
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 5;

/// Current date in UTC, the calendar used for all ledger dates.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Generates `CCH-<unix millis>-<5 base-36 chars>`.
pub fn generate_rental_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())]))
        .collect();
    format!("{RENTAL_ID_PREFIX}-{millis}-{suffix}")
}

impl RentalEntryItem {
    /// Freezes a cart line, capturing its unit price.
    pub fn from_line_item(item: &CartLineItem) -> Self {
        let price_at_rental = match item.purchase_type {
            PurchaseType::Buy => item.tool.price_buy.unwrap_or(0),
            PurchaseType::Rent => {
                let days = item.rental_duration.as_ref().map_or(1, resolve_days);
                item.tool.price_rent.saturating_mul(days)
            }
        };

        Self {
            id: item.tool.id.clone(),
            name: item.tool.name.clone(),
            image: item.tool.image.clone(),
            description_short: item.tool.description_short.clone(),
            price_buy: item.tool.price_buy,
            price_rent: item.tool.price_rent,
            quantity: item.quantity,
            purchase_type: item.purchase_type,
            rental_duration: item.rental_duration.clone(),
            price_at_rental,
        }
    }
}

/// Start and due dates for the rented lines of a checkout.
///
/// The window starts on `start` and lasts as long as the longest rental.
/// Purchases alone have no window.
pub fn rental_window(items: &[CartLineItem], start: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let longest = items
        .iter()
        .filter(|i| i.purchase_type == PurchaseType::Rent)
        .map(|i| i.rental_duration.as_ref().map_or(1, resolve_days))
        .max()?;
    let due = start.checked_add_days(Days::new(longest))?;
    Some((start, due))
}

impl NewRental {
    /// Ledger entry for a paid checkout of `items`.
    pub fn from_checkout(items: &[CartLineItem], total_amount: u64, start: NaiveDate) -> Self {
        let window = rental_window(items, start);
        Self {
            items: items.iter().map(RentalEntryItem::from_line_item).collect(),
            total_amount,
            rental_start_date: window.map(|(s, _)| s),
            rental_due_date: window.map(|(_, d)| d),
        }
    }
}

impl RentalEntry {
    /// Stamps a new entry with id, date and the `Confirmed` status.
    pub fn confirmed(new: NewRental, id: String, rental_date: NaiveDate) -> Self {
        Self {
            id,
            items: new.items,
            total_amount: new.total_amount,
            rental_date,
            status: RentalStatus::Confirmed,
            rental_start_date: new.rental_start_date,
            rental_due_date: new.rental_due_date,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != RentalStatus::Returned && self.rental_due_date.is_some_and(|due| due < today)
    }
}

impl RentalView {
    /// Detail view of `entry`; a payment flag only changes what is shown.
    pub fn new(
        mut entry: RentalEntry,
        payment_status: Option<PaymentStatusFlag>,
        today: NaiveDate,
    ) -> Self {
        match payment_status {
            Some(PaymentStatusFlag::Success) => entry.status = RentalStatus::Confirmed,
            Some(PaymentStatusFlag::Failure) => entry.status = RentalStatus::PaymentFailed,
            None => {}
        }
        let overdue = entry.is_overdue(today);
        Self { entry, overdue }
    }
}
