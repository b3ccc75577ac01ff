//! Catalog Domain Models
//!
//! Products, categories and articles shown by the storefront. All of them
//! are immutable once the catalog is loaded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Constants
// =============================================================================

/// Stock level at or below which a tool is flagged, when the tool sets none.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 2;
/// Number of slots on the comparison page.
pub const MAX_COMPARE_ITEMS: usize = 4;
/// Number of recommendations shown next to a tool.
pub const MAX_RECOMMENDED: usize = 4;

// =============================================================================
// Tools
// =============================================================================

/// One step of a tool's usage guide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HowToUseStep {
    pub id: String,
    pub title: String,
    pub media_url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

/// A rentable (and possibly purchasable) catalog item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub image: String,

    /// Units available.
    pub stock: u32,

    /// Outright purchase price; tools without one are rent-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_buy: Option<u64>,

    /// Rental price per day.
    pub price_rent: u64,

    /// Category ids this tool belongs to.
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cord_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drill_bit_size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub how_to_use_steps: Vec<HowToUseStep>,

    /// Display-only threshold, see [`Tool::is_low_stock`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

impl Tool {
    /// Whether the stock is at or below the tool's low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock
            <= self
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c == category_id)
    }

    /// Whether the two tools share at least one category.
    pub fn shares_category_with(&self, other: &Tool) -> bool {
        self.categories.iter().any(|c| other.in_category(c))
    }
}

// =============================================================================
// Categories, Articles, Topics
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Table-of-contents entry of an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogArticle {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub thumbnail: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub cost: String,
    /// Article body (HTML).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_products: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

/// Home-page shortcut into a filtered list or an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickTopic {
    pub id: String,
    pub text: String,
    pub link: String,
}

// =============================================================================
// Queries and Views
// =============================================================================

/// Equipment-list filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolQuery {
    /// Case-insensitive substring of the tool name.
    pub search: Option<String>,
    /// Matches tools in any of these categories; empty matches all.
    pub categories: Vec<String>,
    /// Inclusive lower bound on the daily rent price.
    pub min_price: Option<u64>,
    /// Inclusive upper bound on the daily rent price.
    pub max_price: Option<u64>,
}

/// Raw query string of `GET /catalog/tools`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolQueryParams {
    pub search: Option<String>,
    /// Comma-separated category ids.
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl From<ToolQueryParams> for ToolQuery {
    fn from(params: ToolQueryParams) -> Self {
        let categories = params
            .category
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            search: params.search.filter(|s| !s.trim().is_empty()),
            categories,
            min_price: params.min_price,
            max_price: params.max_price,
        }
    }
}

/// Query string of `GET /catalog/articles`.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleQueryParams {
    pub difficulty: Option<Difficulty>,
}

/// Query string of `GET /catalog/tools/:id/quote`.
#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default = "default_quote_quantity")]
    pub quantity: u32,
}

fn default_quote_quantity() -> u32 {
    1
}

/// Price comparison between renting and buying a tool.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub tool_id: String,
    pub quantity: u32,
    /// Whole days between start and end, rounded up; 0 without a valid range.
    pub rental_days: u64,
    /// Duration label to use when adding the rental to the cart.
    pub rental_duration: String,
    pub rent_total: u64,
    pub buy_total: Option<u64>,
    pub purchase_cheaper: bool,
}

/// Tool detail page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetail<'a> {
    pub tool: &'a Tool,
    pub low_stock: bool,
    pub in_stock: bool,
    pub recommended: Vec<&'a Tool>,
}

/// Query string of `GET /compare`.
#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub products: Option<String>,
}

/// Comparison grid: always [`MAX_COMPARE_ITEMS`] slots, empty ones as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareView<'a> {
    pub product_ids: Vec<String>,
    pub slots: Vec<Option<&'a Tool>>,
}
