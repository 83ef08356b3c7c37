//! Unified error system for the table checkout client
//!
//! - [`ErrorCode`]: Standardized error codes, shared with the backend
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Backend response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Session / access errors (fatal to the table flow)
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Split bill errors
//! - 7xxx: Table errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::PaymentNothingDue);
//! assert!(!err.is_fatal());
//!
//! let err = AppError::access_denied("QR code expired")
//!     .with_detail("table", "12");
//! assert!(err.is_fatal());
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(1101));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
