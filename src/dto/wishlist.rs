use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WishlistSnapshot {
    pub items: Vec<Product>,
    pub item_count: usize,
}
