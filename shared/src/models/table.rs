//! Table Models

use serde::{Deserialize, Serialize};

use super::{DishOrder, TableSummary};

/// Identifies one table of one restaurant branch (resolved from the QR code)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub restaurant_id: String,
    pub branch_id: String,
    pub table_number: String,
}

impl TableRef {
    pub fn new(
        restaurant_id: impl Into<String>,
        branch_id: impl Into<String>,
        table_number: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            branch_id: branch_id.into(),
            table_number: table_number.into(),
        }
    }

    /// All three parts are present
    pub fn is_resolved(&self) -> bool {
        !self.restaurant_id.trim().is_empty()
            && !self.branch_id.trim().is_empty()
            && !self.table_number.trim().is_empty()
    }

    /// `restaurants/{id}/branches/{b}/tables/{t}` (no leading slash)
    pub fn path(&self) -> String {
        format!(
            "restaurants/{}/branches/{}/tables/{}",
            self.restaurant_id, self.branch_id, self.table_number
        )
    }

    /// Path of an endpoint below this table
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.path(), name.trim_start_matches('/'))
    }
}

/// Dish orders of a table plus the optional server-side aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableOrders {
    #[serde(default, alias = "dishOrders")]
    pub orders: Vec<DishOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<TableSummary>,
}

/// Result of the table access / session validation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
}
