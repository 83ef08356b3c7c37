//! Shared types for the table checkout client
//!
//! Data model of the restaurant backend, error codes, the bill allocation
//! calculator, payment action guards and the table session state. Nothing
//! in this crate performs I/O.

pub mod bill;
pub mod checkout;
pub mod error;
pub mod models;
pub mod session;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use bill::{AllocationInput, BillAllocation, GuardViolation, PaymentIntent};
pub use checkout::{PaymentMode, TipHandoff};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use session::{AccessState, ApplyOutcome, Generation, SessionAction, TableSession};
