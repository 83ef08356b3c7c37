//! Payment action guards
//!
//! Every payment action is checked against the current allocation before
//! anything is sent to the backend. A refused action produces a
//! [`GuardViolation`] carrying the message shown to the guest.

use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

use super::allocation::BillAllocation;
use super::money::{self, MONEY_TOLERANCE, to_decimal, to_f64};
use crate::checkout::{PaymentMode, TipHandoff};
use crate::error::{AppError, ErrorCode};

/// A payment action requested by the guest
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentIntent {
    FullBill,
    SelectItems { dish_order_ids: Vec<String> },
    EqualShares,
    ChooseAmount { amount: f64 },
    UserItems,
}

impl PaymentIntent {
    pub fn mode(&self) -> PaymentMode {
        match self {
            Self::FullBill => PaymentMode::FullBill,
            Self::SelectItems { .. } => PaymentMode::SelectItems,
            Self::EqualShares => PaymentMode::EqualShares,
            Self::ChooseAmount { .. } => PaymentMode::ChooseAmount,
            Self::UserItems => PaymentMode::UserItems,
        }
    }
}

/// A payment action refused before any network call
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct GuardViolation {
    pub mode: PaymentMode,
    pub code: ErrorCode,
    pub message: String,
}

impl GuardViolation {
    pub fn new(mode: PaymentMode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            mode,
            code,
            message: message.into(),
        }
    }
}

impl From<GuardViolation> for AppError {
    fn from(v: GuardViolation) -> Self {
        AppError::with_message(v.code, v.message).with_detail("mode", v.mode.as_str())
    }
}

/// Check a payment action and build its hand-off to the tip step
pub fn guard(
    intent: &PaymentIntent,
    allocation: &BillAllocation,
    user_name: &str,
) -> Result<TipHandoff, GuardViolation> {
    let mode = intent.mode();
    let unpaid = to_decimal(allocation.unpaid_amount.value);

    let (amount, dish_order_ids) = match intent {
        PaymentIntent::FullBill => {
            require_due(mode, unpaid)?;
            (unpaid, Vec::new())
        }
        PaymentIntent::SelectItems { dish_order_ids } => {
            select_items(mode, allocation, dish_order_ids)?
        }
        PaymentIntent::EqualShares => {
            require_due(mode, unpaid)?;
            if allocation.split_eligible_guests.is_empty() {
                return Err(GuardViolation::new(
                    mode,
                    ErrorCode::SplitNoEligibleGuests,
                    "Nobody left to split the bill with",
                ));
            }
            (to_decimal(allocation.per_person_share), Vec::new())
        }
        PaymentIntent::ChooseAmount { amount } => {
            require_due(mode, unpaid)?;
            if !money::is_positive(*amount) {
                return Err(GuardViolation::new(
                    mode,
                    ErrorCode::PaymentAmountInvalid,
                    "Please enter an amount greater than zero",
                ));
            }
            let amount = to_decimal(*amount);
            if amount - unpaid > MONEY_TOLERANCE {
                return Err(GuardViolation::new(
                    mode,
                    ErrorCode::PaymentExceedsBalance,
                    format!(
                        "The amount cannot exceed the remaining {:.2}",
                        to_f64(unpaid)
                    ),
                ));
            }
            (amount.min(unpaid), Vec::new())
        }
        PaymentIntent::UserItems => {
            if user_name.trim().is_empty() {
                return Err(GuardViolation::new(
                    mode,
                    ErrorCode::NotAuthenticated,
                    "We could not tell who you are, please sign in again",
                ));
            }
            let own: Vec<_> = allocation
                .unpaid_dishes
                .iter()
                .filter(|d| d.guest_name == user_name)
                .collect();
            let amount = money::sum(own.iter().map(|d| d.amount()));
            if amount <= Decimal::ZERO {
                return Err(GuardViolation::new(
                    mode,
                    ErrorCode::PaymentNothingDue,
                    "You have no unpaid items",
                ));
            }
            (amount, own.iter().map(|d| d.id.clone()).collect())
        }
    };

    Ok(TipHandoff {
        amount: to_f64(amount),
        mode,
        user_name: user_name.to_string(),
        dish_order_ids,
    })
}

fn require_due(mode: PaymentMode, unpaid: Decimal) -> Result<(), GuardViolation> {
    if unpaid <= Decimal::ZERO {
        return Err(GuardViolation::new(
            mode,
            ErrorCode::PaymentNothingDue,
            "There is nothing left to pay",
        ));
    }
    Ok(())
}

fn select_items(
    mode: PaymentMode,
    allocation: &BillAllocation,
    ids: &[String],
) -> Result<(Decimal, Vec<String>), GuardViolation> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    if ids.is_empty() {
        return Err(GuardViolation::new(
            mode,
            ErrorCode::OrderSelectionEmpty,
            "Please select at least one item",
        ));
    }

    let mut total = Decimal::ZERO;
    for id in &ids {
        let Some(dish) = allocation.unpaid_dish(id) else {
            let code = if allocation.paid_dishes.iter().any(|d| &d.id == id) {
                ErrorCode::OrderAlreadyPaid
            } else {
                ErrorCode::OrderNotFound
            };
            return Err(GuardViolation::new(mode, code, code.message()));
        };
        total += to_decimal(dish.amount());
    }

    if total <= Decimal::ZERO {
        return Err(GuardViolation::new(
            mode,
            ErrorCode::PaymentNothingDue,
            "The selected items have nothing left to pay",
        ));
    }
    Ok((total, ids))
}
