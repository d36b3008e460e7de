use std::{fs, path::Path};

use crate::{
    dto::products::{ALL_CATEGORIES, ProductQuery, ProductSortBy},
    error::AppResult,
    models::Product,
};

/// Loads the product catalog from a JSON array on disk.
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Vec<Product>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Distinct categories in first-seen order.
pub fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Filters the full product list by category and search text, then sorts it.
/// Ties keep their catalog order.
pub fn apply_filters(products: &[Product], query: &ProductQuery) -> Vec<Product> {
    let needle = query.search_query.to_lowercase();

    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| query.category == ALL_CATEGORIES || product.category == query.category)
        .filter(|product| needle.is_empty() || matches_search(product, &needle))
        .cloned()
        .collect();

    match query.sort_by {
        ProductSortBy::PriceLow => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
        ProductSortBy::PriceHigh => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        ProductSortBy::Rating => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        ProductSortBy::Newest => filtered.sort_by(|a, b| b.is_new.cmp(&a.is_new)),
        ProductSortBy::Popular => filtered.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
    }

    filtered
}

fn matches_search(product: &Product, needle: &str) -> bool {
    [&product.name, &product.brand, &product.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Catalog browsing state: the full list, its categories, the current
/// criteria and the displayed subset derived from them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
    filtered: Vec<Product>,
    query: ProductQuery,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        catalog.set_products(products);
        catalog
    }

    /// Replaces the catalog. The displayed list starts in load order until
    /// the first criteria change.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.categories = derive_categories(&products);
        self.filtered = products.clone();
        self.products = products;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.query.category = category.into();
        self.refresh();
    }

    pub fn set_search_query(&mut self, search_query: impl Into<String>) {
        self.query.search_query = search_query.into();
        self.refresh();
    }

    pub fn set_sort_by(&mut self, sort_by: ProductSortBy) {
        self.query.sort_by = sort_by;
        self.refresh();
    }

    pub fn set_query(&mut self, query: ProductQuery) {
        self.query = query;
        self.refresh();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.filtered.iter().filter(|product| product.is_featured)
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// Applies a freshly computed average rating and counts the new review.
    /// The displayed order is left as is.
    pub fn update_product_rating(&mut self, product_id: &str, rating: f64) -> bool {
        let mut found = false;
        for product in self
            .products
            .iter_mut()
            .chain(self.filtered.iter_mut())
            .filter(|product| product.id == product_id)
        {
            product.rating = rating;
            product.review_count += 1;
            found = true;
        }
        found
    }

    fn refresh(&mut self) {
        self.filtered = apply_filters(&self.products, &self.query);
        tracing::debug!(
            category = %self.query.category,
            search = %self.query.search_query,
            shown = self.filtered.len(),
            "catalog filters applied"
        );
    }
}
