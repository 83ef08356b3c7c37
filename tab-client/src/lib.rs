//! Tab Client - table checkout client for the restaurant backend
//!
//! Loads a table's dishes, guests and split state over HTTP, keeps them in a
//! [`TableSession`](shared::TableSession) and drives payment actions through
//! to the tip selection step.

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod loader;
pub mod logger;

pub use api::TableApi;
pub use checkout::{Checkout, CheckoutError, CheckoutService};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use loader::{DegradedRead, LoadError, LoadReport, TableLoader, TableRead, TableSnapshot};

// Re-export shared types for convenience
pub use shared::{ApiResponse, PaymentIntent, PaymentMode, TableSession, TipHandoff};
