use crate::{
    audit::log_audit,
    db::{Db, keys},
    dto::cart::CartSnapshot,
    models::{CartItem, Product},
};

/// Product -> quantity ledger for the browser session, independent of login.
///
/// `total` and `item_count` are recomputed from the lines after every
/// mutation, and every mutation writes the snapshot back to the store. The
/// open/closed flag is view state only: it is never persisted and always
/// starts closed.
#[derive(Debug, Clone)]
pub struct CartLedger {
    db: Db,
    items: Vec<CartItem>,
    total: i64,
    item_count: u32,
    is_open: bool,
}

impl CartLedger {
    pub fn load(db: Db) -> Self {
        let snapshot: CartSnapshot = db.read(keys::CART).unwrap_or_default();
        let mut cart = Self {
            db,
            items: snapshot.items,
            total: 0,
            item_count: 0,
            is_open: false,
        };
        cart.items.retain(|item| item.quantity > 0);
        cart.recompute();
        cart
    }

    /// Adds `quantity` units, merging into an existing line for the same product.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let product_id = product.id.clone();

        match self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }

        self.commit(
            "cart_add",
            serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        );
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.product.id != product_id);
        self.commit(
            "cart_remove",
            serde_json::json!({ "product_id": product_id }),
        );
    }

    /// Sets an absolute quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.items.retain(|item| item.product.id != product_id);
        } else if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
        {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        self.commit(
            "cart_update",
            serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        );
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.commit("cart_clear", serde_json::Value::Null);
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Sum of price x quantity, in minor units.
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total,
            item_count: self.item_count,
        }
    }

    fn recompute(&mut self) {
        self.item_count = self
            .items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity));
        self.total = self
            .items
            .iter()
            .fold(0i64, |total, item| total.saturating_add(item.line_total()));
    }

    fn commit(&mut self, action: &str, metadata: serde_json::Value) {
        self.recompute();
        if let Err(err) = self.db.write(keys::CART, &self.snapshot()) {
            tracing::warn!(error = %err, "failed to persist cart");
        }
        tracing::debug!(
            item_count = self.item_count,
            total = self.total,
            "cart updated"
        );
        log_audit(None, action, Some("cart"), Some(metadata));
    }
}
