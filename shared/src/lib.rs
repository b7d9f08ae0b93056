//! Shared types for the catalog admin
//!
//! Catalog models, ordering request types, the unified error system and
//! small utilities used by the server and its clients.

pub mod error;
pub mod models;
pub mod request;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use request::{MoveRequest, ReorderRequest, SortOrderItem};
