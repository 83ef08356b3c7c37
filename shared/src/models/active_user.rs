//! Active User Model

use serde::{Deserialize, Serialize};

/// A guest session currently associated with a table, with running payment totals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    #[serde(default)]
    pub guest_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub total_paid_individual: Option<f64>,
    #[serde(default)]
    pub total_paid_amount: Option<f64>,
    #[serde(default)]
    pub total_paid_split: Option<f64>,
}

impl ActiveUser {
    pub fn new(guest_name: impl Into<String>) -> Self {
        Self {
            guest_name: guest_name.into(),
            ..Default::default()
        }
    }

    /// Sum of the three paid-amount fields, missing values count as zero
    pub fn paid_sum(&self) -> f64 {
        [
            self.total_paid_individual,
            self.total_paid_amount,
            self.total_paid_split,
        ]
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .sum()
    }

    /// A user owes money until any of their paid-amount fields is positive
    pub fn is_pending(&self) -> bool {
        self.paid_sum() == 0.0
    }

    pub fn has_paid(&self) -> bool {
        self.paid_sum() > 0.0
    }
}
