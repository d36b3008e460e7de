use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub product_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}
