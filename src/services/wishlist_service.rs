use crate::{
    audit::log_audit,
    db::{Db, keys},
    dto::wishlist::WishlistSnapshot,
    models::Product,
};

/// Set of saved products, unique by product id, persisted on every change.
#[derive(Debug, Clone)]
pub struct Wishlist {
    db: Db,
    items: Vec<Product>,
}

impl Wishlist {
    pub fn load(db: Db) -> Self {
        let snapshot: WishlistSnapshot = db.read(keys::WISHLIST).unwrap_or_default();
        let mut wishlist = Self {
            db,
            items: Vec::with_capacity(snapshot.items.len()),
        };
        wishlist.extend_unique(snapshot.items);
        wishlist
    }

    /// Returns `false` without touching the store when the product is already saved.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        let product_id = product.id.clone();
        self.items.push(product);
        self.commit(
            "wishlist_add",
            serde_json::json!({ "product_id": product_id }),
        );
        true
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.id != product_id);
        self.commit(
            "wishlist_remove",
            serde_json::json!({ "product_id": product_id }),
        );
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.commit("wishlist_clear", serde_json::Value::Null);
    }

    /// Replaces the whole set; later duplicates of an id are dropped.
    pub fn set_items(&mut self, products: Vec<Product>) {
        self.items.clear();
        self.extend_unique(products);
        self.commit(
            "wishlist_set",
            serde_json::json!({ "item_count": self.items.len() }),
        );
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn snapshot(&self) -> WishlistSnapshot {
        WishlistSnapshot {
            items: self.items.clone(),
            item_count: self.items.len(),
        }
    }

    fn extend_unique(&mut self, products: Vec<Product>) {
        for product in products {
            if !self.contains(&product.id) {
                self.items.push(product);
            }
        }
    }

    fn commit(&self, action: &str, metadata: serde_json::Value) {
        if let Err(err) = self.db.write(keys::WISHLIST, &self.snapshot()) {
            tracing::warn!(error = %err, "failed to persist wishlist");
        }
        log_audit(None, action, Some("wishlist"), Some(metadata));
    }
}
