//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations: merging line
//! items and pricing them.

use super::models::{CartLineItem, PurchaseType, RentalDuration};

/// Number of days a rental duration is billed for.
///
/// `3days` is 3, `1week` is 7, and any other value ending in `day`/`days`
/// is billed for its leading number. Everything else bills a single day.
pub fn resolve_days(duration: &RentalDuration) -> u64 {
    match duration {
        RentalDuration::OneDay => 1,
        RentalDuration::ThreeDays => 3,
        RentalDuration::OneWeek => 7,
        RentalDuration::Custom(raw) => parse_day_count(raw).unwrap_or(1),
    }
}

/// Leading number of a `"<n>day"` / `"<n>days"` label.
fn parse_day_count(raw: &str) -> Option<u64> {
    if !(raw.ends_with("day") || raw.ends_with("days")) {
        return None;
    }
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Price of one line: `priceBuy * qty` when buying, `priceRent * days * qty`
/// when renting. Tools without a buy price contribute 0 to buy lines.
pub fn line_total(item: &CartLineItem) -> u64 {
    let quantity = u64::from(item.quantity);
    match item.purchase_type {
        PurchaseType::Buy => item.tool.price_buy.unwrap_or(0).saturating_mul(quantity),
        PurchaseType::Rent => {
            let days = item.rental_duration.as_ref().map_or(1, resolve_days);
            item.tool
                .price_rent
                .saturating_mul(days)
                .saturating_mul(quantity)
        }
    }
}

/// Sum of [`line_total`] over the cart.
pub fn cart_total(items: &[CartLineItem]) -> u64 {
    items
        .iter()
        .map(line_total)
        .fold(0, u64::saturating_add)
}

/// Merges `incoming` into `cart_items`, aggregating quantities for an
/// existing line with the same key and appending brand new ones.
///
/// This function mutates `cart_items` in-place.
pub fn merge_line_item(cart_items: &mut Vec<CartLineItem>, incoming: CartLineItem) {
    let key = incoming.key();
    if let Some(existing) = cart_items.iter_mut().find(|i| i.matches(&key)) {
        existing.quantity = existing.quantity.saturating_add(incoming.quantity);
    } else {
        cart_items.push(incoming);
    }
}

/// Folds lines sharing a key into the first of them, summing quantities.
pub fn coalesce_line_items(cart_items: &mut Vec<CartLineItem>) {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(cart_items.len());
    for item in cart_items.drain(..) {
        merge_line_item(&mut merged, item);
    }
    *cart_items = merged;
}

/// Produces a human-readable one-line summary for a list of line items.
///
/// Example output: `"2x Concrete Mixer CM-50L (rent 3days), 1x Basic Hand Tool Set (buy)"`.
pub fn format_item_summary(items: &[CartLineItem]) -> String {
    items
        .iter()
        .map(|i| match (&i.purchase_type, &i.rental_duration) {
            (PurchaseType::Rent, Some(d)) => format!("{}x {} (rent {d})", i.quantity, i.tool.name),
            (PurchaseType::Rent, None) => format!("{}x {} (rent)", i.quantity, i.tool.name),
            (PurchaseType::Buy, _) => format!("{}x {} (buy)", i.quantity, i.tool.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::Tool;

    fn line(purchase_type: PurchaseType, duration: Option<&str>, quantity: u32) -> CartLineItem {
        CartLineItem {
            tool: Tool {
                id: "1".into(),
                name: "Drill".into(),
                price_buy: Some(3500),
                price_rent: 500,
                stock: 3,
                ..Default::default()
            },
            quantity,
            purchase_type,
            rental_duration: duration.map(RentalDuration::from),
        }
    }

    #[test]
    fn resolves_named_and_custom_durations() {
        let days = |raw: &str| resolve_days(&RentalDuration::from(raw));
        assert_eq!(days("1day"), 1);
        assert_eq!(days("3days"), 3);
        assert_eq!(days("1week"), 7);
        assert_eq!(days("5days"), 5);
        assert_eq!(days("12day"), 12);
        assert_eq!(days("2weeks"), 1);
        assert_eq!(days("days"), 1);
        assert_eq!(days("-2days"), 1);
    }

    #[test]
    fn line_totals_for_buy_and_rent() {
        assert_eq!(line_total(&line(PurchaseType::Buy, None, 2)), 7000);
        assert_eq!(line_total(&line(PurchaseType::Rent, Some("3days"), 1)), 1500);
        assert_eq!(line_total(&line(PurchaseType::Rent, Some("1week"), 1)), 3500);

        let cart = vec![
            line(PurchaseType::Buy, None, 2),
            line(PurchaseType::Rent, Some("3days"), 1),
        ];
        assert_eq!(cart_total(&cart), 8500);
    }

    #[test]
    fn buy_line_without_buy_price_costs_nothing() {
        let mut item = line(PurchaseType::Buy, None, 4);
        item.tool.price_buy = None;
        assert_eq!(line_total(&item), 0);
    }

    #[test]
    fn merge_aggregates_matching_keys_only() {
        let mut cart = vec![line(PurchaseType::Rent, Some("3days"), 1)];

        merge_line_item(&mut cart, line(PurchaseType::Rent, Some("3days"), 2));
        merge_line_item(&mut cart, line(PurchaseType::Rent, Some("1week"), 1));
        merge_line_item(&mut cart, line(PurchaseType::Buy, None, 1));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart[0].quantity, 3);
    }

    #[test]
    fn coalesce_keeps_first_position() {
        let mut cart = vec![
            line(PurchaseType::Buy, None, 1),
            line(PurchaseType::Rent, Some("1week"), 2),
            line(PurchaseType::Rent, Some("1week"), 3),
        ];
        coalesce_line_items(&mut cart);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].purchase_type, PurchaseType::Buy);
        assert_eq!(cart[1].quantity, 5);
    }

    #[test]
    fn summary_lists_each_line() {
        let cart = vec![
            line(PurchaseType::Rent, Some("3days"), 2),
            line(PurchaseType::Buy, None, 1),
        ];
        assert_eq!(
            format_item_summary(&cart),
            "2x Drill (rent 3days), 1x Drill (buy)"
        );
    }
}
