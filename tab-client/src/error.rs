//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error returned by the backend
    #[error("API error {code}: {message}")]
    Api {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Non-2xx response without a structured body
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        code: ErrorCode,
        body: String,
    },

    /// Refused locally with a specific code
    #[error("{0}")]
    App(AppError),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Closest shared error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Api { code, .. } => ErrorCode::try_from(*code).unwrap_or(ErrorCode::Unknown),
            Self::Status { code, .. } => *code,
            Self::App(err) => err.code,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InternalError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Unstructured error response, classified by its status
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        Self::Status {
            status,
            code: ErrorCode::from_http_status(status),
            body,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = err.code();
        match err {
            ClientError::Api {
                message, details, ..
            } => {
                let app = AppError::with_message(code, message);
                match details {
                    Some(details) => app.with_detail("backend", details),
                    None => app,
                }
            }
            ClientError::App(app) => app,
            other => AppError::with_message(code, other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
