//! Payment Method Model

use serde::{Deserialize, Serialize};

/// Payment method entity, ordered within its admin group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethod {
    pub id: i64,
    pub admin_group_id: i64,
    pub name: String,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub image: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payment method payload (admin group comes from the route)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodCreate {
    pub name: String,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub image: Option<String>,
}

/// Update payment method payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodUpdate {
    pub name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}
