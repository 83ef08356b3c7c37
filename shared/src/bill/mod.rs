//! Bill allocation: who owes what at a table, and which payment actions
//! are allowed.

pub mod allocation;
pub mod guard;
pub mod money;

pub use allocation::{
    AllocationInput, AmountSource, BillAllocation, PendingSource, Resolved, resolve,
};
pub use guard::{GuardViolation, PaymentIntent, guard};
