//! HTTP status code mapping for error codes
//!
//! Used for error responses that carry no structured `{code, message}` body.

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Map an HTTP status returned by the backend to the closest error code
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::TableAccessDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::OrderAlreadyPaid,
            StatusCode::PAYMENT_REQUIRED => Self::PaymentFailed,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            s if s.is_success() => Self::Success,
            _ => Self::InternalError,
        }
    }
}
