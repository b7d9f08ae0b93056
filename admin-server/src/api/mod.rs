//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu_items`] - 菜单项 CRUD 与目录排序
//! - [`payment_methods`] - 支付方式 CRUD 与管理组内排序
//! - [`variations`] - 规格 CRUD 与分组操作

pub mod health;
pub mod menu_items;
pub mod payment_methods;
pub mod variations;

use crate::core::ServerState;
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build the Axum router (without state)
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(menu_items::router())
        .merge(payment_methods::router())
        .merge(variations::router())
}

/// Build the complete application with state and middleware
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    routes()
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
