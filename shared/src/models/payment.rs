//! Payment request / response DTOs
//!
//! Bodies of the write endpoints under
//! `/restaurants/{id}/branches/{b}/tables/{t}`.

use serde::{Deserialize, Serialize};

/// `POST split-bill`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitBillRequest {
    pub number_of_people: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_names: Option<Vec<String>>,
}

/// `POST pay-split`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaySplitRequest {
    pub user_id: String,
    pub guest_name: String,
    pub payment_method_id: String,
}

/// `POST pay`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub amount: f64,
    pub user_id: String,
    pub guest_name: String,
    pub payment_method_id: String,
}

/// `POST dishes/pay` - pay a set of dish orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayDishesRequest {
    pub dish_order_ids: Vec<String>,
    pub user_id: String,
    pub guest_name: String,
    pub payment_method_id: String,
}

/// `POST transactions` - record a completed payment with its tip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    pub amount: f64,
    #[serde(default)]
    pub tip_amount: f64,
    /// Payment mode tag (`full-bill`, `equal-shares`, ...)
    pub mode: String,
    pub guest_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub payment_method_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dish_order_ids: Vec<String>,
}

/// Response of every payment write endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}
