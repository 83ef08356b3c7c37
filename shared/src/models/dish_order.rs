//! Dish Order Model

use serde::{Deserialize, Serialize};

/// Payment status of a single dish order
///
/// Anything the backend sends that is not `paid` (including a missing
/// field) counts as unpaid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    NotPaid,
    Paid,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// One line item ordered by one guest at a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DishOrder {
    pub id: String,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Line total in currency unit
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dish_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

impl DishOrder {
    pub fn new(id: impl Into<String>, guest_name: impl Into<String>, total_price: f64) -> Self {
        Self {
            id: id.into(),
            guest_name: guest_name.into(),
            user_id: None,
            payment_status: Some(PaymentStatus::NotPaid),
            total_price: Some(total_price),
            dish_name: None,
            quantity: None,
        }
    }

    pub fn paid(mut self) -> Self {
        self.payment_status = Some(PaymentStatus::Paid);
        self
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.is_some_and(|s| s.is_paid())
    }

    /// Line total, zero when missing or not a finite number
    pub fn amount(&self) -> f64 {
        match self.total_price {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_status_is_unpaid() {
        let json = r#"{"id":"d1","guestName":"Ana","totalPrice":12.5}"#;
        let order: DishOrder = serde_json::from_str(json).unwrap();
        assert!(order.payment_status.is_none());
        assert!(!order.is_paid());
        assert_eq!(order.amount(), 12.5);
    }

    #[test]
    fn test_unknown_status_is_unpaid() {
        let json = r#"{"id":"d1","guestName":"Ana","paymentStatus":"refunded"}"#;
        let order: DishOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.payment_status, Some(PaymentStatus::Unknown));
        assert!(!order.is_paid());
    }

    #[test]
    fn test_missing_price_is_zero() {
        let json = r#"{"id":"d1","guestName":"Ana","paymentStatus":"paid","totalPrice":null}"#;
        let order: DishOrder = serde_json::from_str(json).unwrap();
        assert!(order.is_paid());
        assert_eq!(order.amount(), 0.0);

        let mut nan = DishOrder::new("d2", "Ben", 0.0);
        nan.total_price = Some(f64::NAN);
        assert_eq!(nan.amount(), 0.0);
    }
}
