//! Request types for the shared crate
//!
//! Ordering payloads used by every drag-to-reorder endpoint

use serde::{Deserialize, Serialize};

/// One (id, rank) pair of a batch sort-order write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderItem {
    pub id: i64,
    pub sort_order: i32,
}

/// Full reorder: every id of the collection, in the new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<i64>,
}

/// Shift-insert one entity at a 1-based target rank
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    pub target_rank: i32,
}
