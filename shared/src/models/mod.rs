//! Data models
//!
//! Shared between admin-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod menu_item;
pub mod payment_method;
pub mod variation;

// Re-exports
pub use menu_item::*;
pub use payment_method::*;
pub use variation::*;
