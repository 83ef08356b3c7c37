//! Checkout hand-off types
//!
//! A payment action ends by handing the computed amount to the tip
//! selection step, carried as `amount`, `type` and `userName` query
//! parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the guest chose to pay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMode {
    /// Pay the whole remaining bill
    FullBill,
    /// Pay a hand-picked set of dishes
    SelectItems,
    /// Pay one equal share of the remaining bill
    EqualShares,
    /// Pay a custom amount
    ChooseAmount,
    /// Pay every unpaid dish of the current guest
    UserItems,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 5] = [
        Self::FullBill,
        Self::SelectItems,
        Self::EqualShares,
        Self::ChooseAmount,
        Self::UserItems,
    ];

    /// Wire tag used in the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullBill => "full-bill",
            Self::SelectItems => "select-items",
            Self::EqualShares => "equal-shares",
            Self::ChooseAmount => "choose-amount",
            Self::UserItems => "user-items",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown payment mode tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment mode: {0}")]
pub struct UnknownPaymentMode(pub String);

impl FromStr for PaymentMode {
    type Err = UnknownPaymentMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownPaymentMode(s.to_string()))
    }
}

/// Parameters forwarded to the tip selection step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TipHandoff {
    pub amount: f64,
    #[serde(rename = "type")]
    pub mode: PaymentMode,
    pub user_name: String,
    /// Dish orders covered by this payment (select-items / user-items)
    #[serde(default, skip_serializing)]
    pub dish_order_ids: Vec<String>,
}

impl TipHandoff {
    /// Query parameters in the order the tip step reads them
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("amount", format!("{:.2}", self.amount)),
            ("type", self.mode.as_str().to_string()),
            ("userName", self.user_name.clone()),
        ]
    }
}
