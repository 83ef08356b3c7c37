//! Bill allocation calculator
//!
//! Derives who owes what at a table from the dish orders, the optional
//! server-side summary, the active guest sessions and the split-payment
//! records. Pure: the same input always produces the same allocation.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{self, to_f64_exact};
use crate::models::{ActiveUser, DishOrder, SplitPaymentRecord, TableSummary};

/// Where a resolved figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    /// Taken from the backend's table summary
    Summary,
    /// Recomputed from the dish orders
    Computed,
}

/// A figure together with the source it was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: AmountSource,
}

impl<T> Resolved<T> {
    pub fn is_from_summary(&self) -> bool {
        self.source == AmountSource::Summary
    }
}

/// Prefer the summary value, fall back to the computed one
pub fn resolve<T>(summary: Option<T>, computed: impl FnOnce() -> T) -> Resolved<T> {
    match summary {
        Some(value) => Resolved {
            value,
            source: AmountSource::Summary,
        },
        None => Resolved {
            value: computed(),
            source: AmountSource::Computed,
        },
    }
}

/// Which data decided the pending-guest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSource {
    ActiveUsers,
    SplitRecords,
    UnpaidDishes,
}

/// Everything the calculator reads
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationInput<'a> {
    pub orders: &'a [DishOrder],
    pub summary: Option<&'a TableSummary>,
    pub active_users: Option<&'a [ActiveUser]>,
    pub split_records: Option<&'a [SplitPaymentRecord]>,
    pub current_guest: Option<&'a str>,
}

impl<'a> AllocationInput<'a> {
    pub fn new(orders: &'a [DishOrder]) -> Self {
        Self {
            orders,
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: Option<&'a TableSummary>) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_active_users(mut self, users: Option<&'a [ActiveUser]>) -> Self {
        self.active_users = users;
        self
    }

    pub fn with_split_records(mut self, records: Option<&'a [SplitPaymentRecord]>) -> Self {
        self.split_records = records;
        self
    }

    pub fn with_current_guest(mut self, guest: Option<&'a str>) -> Self {
        self.current_guest = guest;
        self
    }

    /// Active-user data counts as present only when non-empty
    fn active_users(&self) -> Option<&'a [ActiveUser]> {
        self.active_users.filter(|users| !users.is_empty())
    }

    fn split_records(&self) -> Option<&'a [SplitPaymentRecord]> {
        self.split_records.filter(|records| !records.is_empty())
    }
}

/// Derived allocation of a table's bill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillAllocation {
    pub unpaid_dishes: Vec<DishOrder>,
    pub paid_dishes: Vec<DishOrder>,
    pub table_total_price: Resolved<f64>,
    pub paid_amount: Resolved<f64>,
    pub unpaid_amount: Resolved<f64>,
    pub item_count: Resolved<u32>,
    /// Guests still owing money, first-seen order, no duplicates
    pub pending_guests: Vec<String>,
    pub pending_source: PendingSource,
    /// Guests sharing an equal split
    pub split_eligible_guests: Vec<String>,
    pub current_guest_unpaid_amount: f64,
    pub per_person_share: f64,
}

impl BillAllocation {
    /// Run the calculator over one snapshot of table data
    pub fn compute(input: &AllocationInput<'_>) -> Self {
        let (paid_dishes, unpaid_dishes): (Vec<DishOrder>, Vec<DishOrder>) =
            input.orders.iter().cloned().partition(DishOrder::is_paid);

        let summary = input.summary;
        let table_total_price = resolve(summary.and_then(|s| s.total_amount), || {
            to_f64_exact(sum_amounts(input.orders))
        });
        let paid_amount = resolve(summary.and_then(|s| s.paid_amount), || {
            to_f64_exact(sum_amounts(&paid_dishes))
        });
        let unpaid_amount = resolve(summary.and_then(|s| s.remaining_amount), || {
            to_f64_exact(sum_amounts(&unpaid_dishes))
        });
        let item_count = resolve(summary.and_then(|s| s.item_count), || {
            u32::try_from(input.orders.len()).unwrap_or(u32::MAX)
        });

        let (pending_guests, pending_source) = pending_guests(input, &unpaid_dishes);
        let split_eligible_guests = split_eligible_guests(input, &unpaid_dishes);

        let current_guest_unpaid_amount = match input.current_guest {
            Some(guest) => to_f64_exact(money::sum(
                unpaid_dishes
                    .iter()
                    .filter(|d| d.guest_name == guest)
                    .map(DishOrder::amount),
            )),
            None => 0.0,
        };

        let per_person_share = to_f64_exact(money::share(
            money::to_decimal(unpaid_amount.value),
            split_eligible_guests.len(),
        ));

        tracing::debug!(
            orders = input.orders.len(),
            totals_source = ?table_total_price.source,
            pending_source = ?pending_source,
            pending = pending_guests.len(),
            eligible = split_eligible_guests.len(),
            "Bill allocation computed"
        );

        Self {
            unpaid_dishes,
            paid_dishes,
            table_total_price,
            paid_amount,
            unpaid_amount,
            item_count,
            pending_guests,
            pending_source,
            split_eligible_guests,
            current_guest_unpaid_amount,
            per_person_share,
        }
    }

    pub fn is_pending(&self, guest: &str) -> bool {
        self.pending_guests.iter().any(|g| g == guest)
    }

    pub fn unpaid_dish(&self, id: &str) -> Option<&DishOrder> {
        self.unpaid_dishes.iter().find(|d| d.id == id)
    }

    /// Nothing left to pay at this table
    pub fn is_settled(&self) -> bool {
        !money::is_positive(self.unpaid_amount.value)
    }
}

fn sum_amounts(orders: &[DishOrder]) -> Decimal {
    money::sum(orders.iter().map(DishOrder::amount))
}

/// Distinct, non-empty identities in first-seen order
fn distinct<'a>(identities: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    identities
        .into_iter()
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn pending_guests(
    input: &AllocationInput<'_>,
    unpaid_dishes: &[DishOrder],
) -> (Vec<String>, PendingSource) {
    if let Some(users) = input.active_users() {
        let guests = distinct(
            users
                .iter()
                .filter(|u| u.is_pending())
                .map(active_user_identity),
        );
        return (guests, PendingSource::ActiveUsers);
    }

    if let Some(records) = input.split_records() {
        let guests = distinct(
            records
                .iter()
                .filter(|r| r.is_pending())
                .filter_map(SplitPaymentRecord::identity),
        );
        return (guests, PendingSource::SplitRecords);
    }

    let guests = distinct(unpaid_dishes.iter().map(|d| d.guest_name.as_str()));
    (guests, PendingSource::UnpaidDishes)
}

fn active_user_identity(user: &ActiveUser) -> &str {
    if user.guest_name.is_empty() {
        user.user_id.as_deref().unwrap_or_default()
    } else {
        &user.guest_name
    }
}

fn split_eligible_guests(input: &AllocationInput<'_>, unpaid_dishes: &[DishOrder]) -> Vec<String> {
    let already_paid: HashSet<&str> = input
        .active_users()
        .map(|users| {
            users
                .iter()
                .filter(|u| u.has_paid())
                .map(|u| u.guest_name.as_str())
                .collect()
        })
        .unwrap_or_default();

    distinct(
        unpaid_dishes
            .iter()
            .map(|d| d.guest_name.as_str())
            .filter(|name| !already_paid.contains(name)),
    )
}
