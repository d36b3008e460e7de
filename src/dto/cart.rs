use serde::{Deserialize, Serialize};

use crate::models::CartItem;

/// Persisted cart document. The open/closed flag is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: i64,
    pub item_count: u32,
}
