use serde::{Deserialize, Serialize};

use crate::models::Address;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Card,
    #[serde(rename = "cod")]
    CashOnDelivery,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInfo {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name_on_card: String,
}

impl PaymentInfo {
    pub fn is_complete(&self) -> bool {
        [
            &self.card_number,
            &self.expiry_date,
            &self.cvv,
            &self.name_on_card,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: Address,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_info: PaymentInfo,
}

/// Price breakdown of a checkout, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub shipping: i64,
    pub tax: i64,
    pub total: i64,
}
