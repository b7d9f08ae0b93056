//! Variation Model (package options of a menu item)

use serde::{Deserialize, Serialize};

/// Variation entity
///
/// `category` and `sort` carry the group membership and group rank; they are
/// only written by the grouping engine, never by plain updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Variation {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
    /// Price in cents
    pub price: i64,
    /// Group label; `None` means the anonymous bucket
    pub category: Option<String>,
    /// Group rank; `None` sorts after every ranked group
    pub sort: Option<i32>,
    /// Position inside the group
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create variation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationCreate {
    pub name: String,
    pub price: i64,
}

/// Update variation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariationUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub is_active: Option<bool>,
}
