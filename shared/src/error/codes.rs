//! Unified error codes for the table checkout client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Session / access errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Split bill errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the backend's numeric
/// `code` field can be decoded directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Session ====================
    /// Guest is not authenticated
    NotAuthenticated = 1001,
    /// Session has expired
    SessionExpired = 1005,
    /// Guest may not access this table
    TableAccessDenied = 1101,

    // ==================== 4xxx: Order ====================
    /// Dish order not found
    OrderNotFound = 4001,
    /// Dish order has already been paid
    OrderAlreadyPaid = 4002,
    /// No dishes selected
    OrderSelectionEmpty = 4008,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Nothing left to pay
    PaymentNothingDue = 5006,
    /// Amount must be positive
    PaymentAmountInvalid = 5007,
    /// Amount exceeds the remaining balance
    PaymentExceedsBalance = 5008,
    /// A payment is already being submitted
    PaymentInProgress = 5009,

    // ==================== 6xxx: Split bill ====================
    /// No guests are eligible for an equal split
    SplitNoEligibleGuests = 6001,
    /// Split bill is not active for this table
    SplitNotActive = 6002,
    /// Split bill already active
    SplitAlreadyActive = 6003,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table reference is incomplete
    TableUnresolved = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            ErrorCode::NotAuthenticated => "Guest is not authenticated",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::TableAccessDenied => "Access to this table was denied",

            ErrorCode::OrderNotFound => "Dish order not found",
            ErrorCode::OrderAlreadyPaid => "Dish order has already been paid",
            ErrorCode::OrderSelectionEmpty => "No dishes selected",

            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentNothingDue => "There is nothing left to pay",
            ErrorCode::PaymentAmountInvalid => "Amount must be greater than zero",
            ErrorCode::PaymentExceedsBalance => "Amount exceeds the remaining balance",
            ErrorCode::PaymentInProgress => "A payment is already in progress",

            ErrorCode::SplitNoEligibleGuests => "No guests are eligible to split the bill",
            ErrorCode::SplitNotActive => "Split bill is not active",
            ErrorCode::SplitAlreadyActive => "Split bill is already active",

            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableUnresolved => "Table number has not been resolved",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1005 => Ok(ErrorCode::SessionExpired),
            1101 => Ok(ErrorCode::TableAccessDenied),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4008 => Ok(ErrorCode::OrderSelectionEmpty),

            5001 => Ok(ErrorCode::PaymentFailed),
            5006 => Ok(ErrorCode::PaymentNothingDue),
            5007 => Ok(ErrorCode::PaymentAmountInvalid),
            5008 => Ok(ErrorCode::PaymentExceedsBalance),
            5009 => Ok(ErrorCode::PaymentInProgress),

            6001 => Ok(ErrorCode::SplitNoEligibleGuests),
            6002 => Ok(ErrorCode::SplitNotActive),
            6003 => Ok(ErrorCode::SplitAlreadyActive),

            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableUnresolved),

            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
