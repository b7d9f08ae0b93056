//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::{MoveRequest, ReorderRequest};

use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::ordering::RankEntry;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 404 with the catalog-specific code
pub(crate) async fn ensure_menu_item(state: &ServerState, id: i64) -> AppResult<MenuItem> {
    menu_item::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
            .with_detail("id", id)
    })
}

/// GET /api/menu-items - 按目录顺序获取所有菜单项
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu_item::find_all(state.pool()).await?;
    Ok(Json(items))
}

/// GET /api/menu-items/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    Ok(Json(ensure_menu_item(&state, id).await?))
}

/// POST /api/menu-items - 创建菜单项 (追加到末尾)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::create(state.pool(), payload).await?;
    tracing::info!(id = item.id, sort_order = item.sort_order, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/menu-items/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    ensure_menu_item(&state, id).await?;
    let item = menu_item::update(state.pool(), id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu-items/:id - 删除菜单项及其规格，剩余项重新编号
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    ensure_menu_item(&state, id).await?;
    let result = menu_item::delete(state.pool(), id).await?;
    tracing::info!(id, "Menu item deleted");
    Ok(Json(result))
}

/// PUT /api/menu-items/sort-order - 拖拽后整体重排
pub async fn reorder(
    State(state): State<ServerState>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<Json<Vec<RankEntry>>> {
    tracing::info!(count = payload.ids.len(), "Menu item reorder request received");
    let ranks = state.menu_item_sequencer().reorder(&payload.ids).await?;
    Ok(Json(ranks))
}

/// POST /api/menu-items/:id/move - 移动到指定位置
pub async fn move_to(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<Vec<RankEntry>>> {
    ensure_menu_item(&state, id).await?;
    let ranks = state
        .menu_item_sequencer()
        .shift_insert(payload.target_rank, id)
        .await?;
    Ok(Json(ranks))
}
