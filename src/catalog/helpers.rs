//! Catalog Helpers
//!
//! Pure functions behind the catalog queries: filter matching, comparison
//! id parsing and rent-versus-buy quotes.

use super::models::{PriceQuote, Tool, ToolQuery, MAX_COMPARE_ITEMS};
use crate::cart::models::RentalDuration;
use chrono::NaiveDate;

impl ToolQuery {
    /// Whether `tool` passes every filter of this query.
    pub fn matches(&self, tool: &Tool) -> bool {
        if let Some(term) = &self.search {
            if !tool.name.to_lowercase().contains(&term.trim().to_lowercase()) {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.iter().any(|c| tool.in_category(c)) {
            return false;
        }

        let above_min = self.min_price.map_or(true, |min| tool.price_rent >= min);
        let below_max = self.max_price.map_or(true, |max| tool.price_rent <= max);
        above_min && below_max
    }
}

/// Splits a `products=1,2,3` parameter into at most [`MAX_COMPARE_ITEMS`] ids.
///
/// Ids past the cap are dropped; blank entries keep their slot so that the
/// remaining ids stay where the client put them.
pub fn parse_compare_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .take(MAX_COMPARE_ITEMS)
        .map(|id| id.trim().to_string())
        .collect()
}

/// Whole rental days between two dates, rounded up; 0 unless `end > start`.
pub fn rental_days_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u64 {
    match (start, end) {
        (Some(start), Some(end)) if end > start => (end - start).num_days().unsigned_abs(),
        _ => 0,
    }
}

/// Prices renting `quantity` units of `tool` for `rental_days` against buying them.
pub fn quote(tool: &Tool, rental_days: u64, quantity: u32) -> PriceQuote {
    let quantity_u64 = u64::from(quantity);
    let rent_total = rental_days
        .saturating_mul(tool.price_rent)
        .saturating_mul(quantity_u64);
    let buy_total = tool.price_buy.map(|p| p.saturating_mul(quantity_u64));

    let purchase_cheaper = match buy_total {
        Some(buy) if rental_days > 0 && rent_total > 0 => buy < rent_total,
        _ => false,
    };

    PriceQuote {
        tool_id: tool.id.clone(),
        quantity,
        rental_days,
        // Adding a rental without a date range books a single day.
        rental_duration: RentalDuration::from_days(rental_days.max(1)).to_string(),
        rent_total,
        buy_total,
        purchase_cheaper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill() -> Tool {
        Tool {
            id: "1".into(),
            name: "Heavy Duty Electric Drill XR-5000".into(),
            stock: 3,
            price_buy: Some(3500),
            price_rent: 500,
            categories: vec!["basic".into(), "electrical-general".into()],
            ..Default::default()
        }
    }

    #[test]
    fn query_combines_search_category_and_price() {
        let tool = drill();

        let by_name = ToolQuery {
            search: Some("DRILL".into()),
            ..Default::default()
        };
        assert!(by_name.matches(&tool));

        let wrong_category = ToolQuery {
            categories: vec!["gardening".into()],
            ..Default::default()
        };
        assert!(!wrong_category.matches(&tool));

        let any_category = ToolQuery {
            categories: vec!["gardening".into(), "basic".into()],
            ..Default::default()
        };
        assert!(any_category.matches(&tool));

        let inclusive_bounds = ToolQuery {
            min_price: Some(500),
            max_price: Some(500),
            ..Default::default()
        };
        assert!(inclusive_bounds.matches(&tool));

        let too_cheap = ToolQuery {
            max_price: Some(499),
            ..Default::default()
        };
        assert!(!too_cheap.matches(&tool));
    }

    #[test]
    fn compare_ids_are_capped_at_four() {
        assert_eq!(parse_compare_ids("1, 2,3,4,5"), vec!["1", "2", "3", "4"]);
        assert_eq!(parse_compare_ids("6"), vec!["6"]);
    }

    #[test]
    fn rental_days_round_up_and_require_forward_range() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day);
        assert_eq!(rental_days_between(d(1), d(4)), 3);
        assert_eq!(rental_days_between(d(4), d(4)), 0);
        assert_eq!(rental_days_between(d(4), d(1)), 0);
        assert_eq!(rental_days_between(None, d(1)), 0);
    }

    #[test]
    fn quote_flags_when_buying_is_cheaper() {
        let tool = drill();

        // 8 days * 500 = 4000 > 3500
        let long = quote(&tool, 8, 1);
        assert_eq!(long.rent_total, 4000);
        assert_eq!(long.buy_total, Some(3500));
        assert!(long.purchase_cheaper);
        assert_eq!(long.rental_duration, "8days");

        let short = quote(&tool, 3, 2);
        assert_eq!(short.rent_total, 3000);
        assert_eq!(short.buy_total, Some(7000));
        assert!(!short.purchase_cheaper);
        assert_eq!(short.rental_duration, "3days");

        let no_range = quote(&tool, 0, 1);
        assert_eq!(no_range.rent_total, 0);
        assert!(!no_range.purchase_cheaper);
        assert_eq!(no_range.rental_duration, "1day");
    }
}
