//! Variation API 模块
//!
//! 规格挂在菜单项下，分组由 `category` 推导。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/menu-items/{id}/variations | GET | 规格列表 |
//! | /api/menu-items/{id}/groups | GET | 推导出的分组 |
//! | /api/menu-items/{id}/groups/members | POST | 在分组中新建规格 |
//! | /api/menu-items/{id}/groups/rename | PUT | 重命名分组 |
//! | /api/menu-items/{id}/groups/rank | PUT | 设置分组排序 |
//! | /api/menu-items/{id}/groups/sort-order | PUT | 分组整体重排 |
//! | /api/menu-items/{id}/groups/members/sort-order | PUT | 组内规格重排 |
//! | /api/menu-items/{id}/groups/delete | POST | 解散分组 (需确认) |
//! | /api/variations/{id} | PUT/DELETE | 更新 / 删除规格 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/menu-items/{id}", item_routes())
        .route(
            "/api/variations/{id}",
            put(handler::update).delete(handler::delete),
        )
}

fn item_routes() -> Router<ServerState> {
    Router::new()
        .route("/variations", get(handler::list))
        .route("/groups", get(handler::groups))
        .route("/groups/members", post(handler::add_member))
        .route("/groups/rename", put(handler::rename))
        .route("/groups/rank", put(handler::set_rank))
        .route("/groups/sort-order", put(handler::reorder_groups))
        .route("/groups/members/sort-order", put(handler::reorder_members))
        .route("/groups/delete", post(handler::delete_group))
}
