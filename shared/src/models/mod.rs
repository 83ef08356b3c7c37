//! Data models
//!
//! Transient snapshots of backend state, exchanged as camelCase JSON.
//! Nothing here is persisted locally; every value is re-fetched on load.

pub mod active_user;
pub mod dish_order;
pub mod payment;
pub mod split_payment;
pub mod table;
pub mod table_summary;

// Re-exports
pub use active_user::*;
pub use dish_order::*;
pub use payment::*;
pub use split_payment::*;
pub use table::*;
pub use table_summary::*;
