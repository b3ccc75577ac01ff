//! Catalog Store
//!
//! Read-only lookups over the product, category and article data. Queries
//! are recomputed on every call.

use super::{
    data,
    helpers::parse_compare_ids,
    models::{
        BlogArticle, CategoryInfo, CompareView, Difficulty, QuickTopic, Tool, ToolQuery,
        MAX_COMPARE_ITEMS, MAX_RECOMMENDED,
    },
};

/// Immutable catalog owned by the application state.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<Tool>,
    categories: Vec<CategoryInfo>,
    articles: Vec<BlogArticle>,
    quick_topics: Vec<QuickTopic>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(
        tools: Vec<Tool>,
        categories: Vec<CategoryInfo>,
        articles: Vec<BlogArticle>,
        quick_topics: Vec<QuickTopic>,
    ) -> Self {
        Self {
            tools,
            categories,
            articles,
            quick_topics,
        }
    }

    /// The catalog shipped with the service.
    pub fn builtin() -> Self {
        let tools = data::tools();
        let articles = data::articles(&tools);
        Self::new(tools, data::categories(), articles, data::quick_topics())
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    pub fn quick_topics(&self) -> &[QuickTopic] {
        &self.quick_topics
    }

    pub fn lookup(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn find_article(&self, slug: &str) -> Option<&BlogArticle> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    /// Tools satisfying `predicate`, in catalog order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&Tool>
    where
        P: Fn(&Tool) -> bool,
    {
        self.tools.iter().filter(|&t| predicate(t)).collect()
    }

    pub fn search(&self, query: &ToolQuery) -> Vec<&Tool> {
        self.filter(|t| query.matches(t))
    }

    /// Other tools sharing a category with `tool`.
    pub fn recommended(&self, tool: &Tool) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|t| t.id != tool.id && t.shares_category_with(tool))
            .take(MAX_RECOMMENDED)
            .collect()
    }

    /// Articles, optionally restricted to one difficulty.
    pub fn articles(&self, difficulty: Option<Difficulty>) -> Vec<&BlogArticle> {
        self.articles
            .iter()
            .filter(|a| difficulty.map_or(true, |d| a.difficulty == d))
            .collect()
    }

    /// Articles recommended to newcomers.
    pub fn beginner_articles(&self) -> Vec<&BlogArticle> {
        self.articles(Some(Difficulty::Easy))
    }

    /// Fills the comparison grid from a `products` parameter.
    ///
    /// Without a parameter the first slot is pre-filled with the first tool.
    pub fn compare(&self, products: Option<&str>) -> CompareView<'_> {
        let mut slots: Vec<Option<&Tool>> = vec![None; MAX_COMPARE_ITEMS];

        let product_ids = match products.filter(|p| !p.trim().is_empty()) {
            Some(raw) => {
                let ids = parse_compare_ids(raw);
                for (slot, id) in slots.iter_mut().zip(&ids) {
                    *slot = self.lookup(id);
                }
                ids
            }
            None => {
                slots[0] = self.tools.first();
                Vec::new()
            }
        };

        CompareView {
            product_ids: product_ids
                .into_iter()
                .filter(|id| !id.is_empty())
                .collect(),
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lookups() {
        let catalog = Catalog::builtin();

        assert_eq!(catalog.tools().len(), 6);
        assert_eq!(catalog.categories().len(), 8);
        assert_eq!(
            catalog.lookup("1").map(|t| t.name.as_str()),
            Some("Heavy Duty Electric Drill XR-5000")
        );
        assert!(catalog.lookup("missing").is_none());

        let guide = catalog.find_article("guide-concrete-tools").unwrap();
        let related: Vec<_> = guide.related_products.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(related, vec!["3", "6"]);
        assert!(catalog.find_article("nope").is_none());
    }

    #[test]
    fn filter_returns_matches_in_catalog_order() {
        let catalog = Catalog::builtin();
        let rent_only: Vec<_> = catalog
            .filter(|t| t.price_buy.is_none())
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(rent_only, vec!["3", "6"]);
    }

    #[test]
    fn low_stock_uses_tool_threshold_or_default() {
        let catalog = Catalog::builtin();
        // stock 3, threshold 5
        assert!(catalog.lookup("1").unwrap().is_low_stock());
        // stock 8, threshold 3
        assert!(!catalog.lookup("2").unwrap().is_low_stock());
        // stock 5, default threshold 2
        assert!(!catalog.lookup("3").unwrap().is_low_stock());
        // stock 2, threshold 2
        assert!(catalog.lookup("4").unwrap().is_low_stock());
    }

    #[test]
    fn recommendations_share_a_category_and_exclude_self() {
        let catalog = Catalog::builtin();
        let drill = catalog.lookup("1").unwrap();
        let ids: Vec<_> = catalog
            .recommended(drill)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "5"]);
    }

    #[test]
    fn compare_keeps_first_four_ids() {
        let catalog = Catalog::builtin();
        let view = catalog.compare(Some("1,2,3,4,5"));

        assert_eq!(view.product_ids, vec!["1", "2", "3", "4"]);
        assert_eq!(view.slots.len(), MAX_COMPARE_ITEMS);
        assert!(view.slots.iter().all(Option::is_some));
        assert!(view.slots.iter().flatten().all(|t| t.id != "5"));
    }

    #[test]
    fn compare_leaves_unknown_ids_empty_and_prefills_without_param() {
        let catalog = Catalog::builtin();

        let view = catalog.compare(Some("2,zzz"));
        assert_eq!(view.slots[0].map(|t| t.id.as_str()), Some("2"));
        assert!(view.slots[1].is_none());

        let view = catalog.compare(None);
        assert_eq!(view.slots[0].map(|t| t.id.as_str()), Some("1"));
        assert!(view.slots[1..].iter().all(Option::is_none));
    }

    #[test]
    fn beginner_articles_are_easy() {
        let catalog = Catalog::builtin();
        let beginner = catalog.beginner_articles();
        assert_eq!(beginner.len(), 4);
        assert!(beginner.iter().all(|a| a.difficulty == Difficulty::Easy));
    }
}
