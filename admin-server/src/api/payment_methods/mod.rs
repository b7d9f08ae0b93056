//! Payment Method API 模块
//!
//! 支付方式按管理组 (admin group) 分别排序。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin-groups/{group_id}/payment-methods",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/admin-groups/{group_id}/payment-methods/sort-order",
            put(handler::reorder),
        )
        .route(
            "/api/payment-methods/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/payment-methods/{id}/move", post(handler::move_to))
}
