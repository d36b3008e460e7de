use serde::{Deserialize, Serialize};

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSortBy {
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
    #[default]
    Popular,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    pub category: String,
    pub search_query: String,
    pub sort_by: ProductSortBy,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
            sort_by: ProductSortBy::default(),
        }
    }
}
