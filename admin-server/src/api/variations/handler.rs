//! Variation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{Variation, VariationCreate, VariationUpdate};

use crate::api::menu_items::ensure_menu_item;
use crate::core::ServerState;
use crate::db::repository::variation;
use crate::ordering::{Group, GroupKey};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub group: GroupKey,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub group: GroupKey,
    pub name: String,
}

/// `rank: null` clears the rank
#[derive(Debug, Deserialize)]
pub struct SetGroupRankRequest {
    pub group: GroupKey,
    pub rank: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderGroupsRequest {
    pub groups: Vec<GroupKey>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderMembersRequest {
    pub group: GroupKey,
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteGroupRequest {
    pub group: GroupKey,
    #[serde(default)]
    pub confirmed: bool,
}

async fn ensure_variation(state: &ServerState, id: i64) -> AppResult<Variation> {
    variation::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::VariationNotFound, format!("Variation {id} not found"))
            .with_detail("id", id)
    })
}

/// GET /api/menu-items/:id/variations
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Variation>>> {
    ensure_menu_item(&state, id).await?;
    let rows = variation::find_by_menu_item(state.pool(), id).await?;
    Ok(Json(rows))
}

/// GET /api/menu-items/:id/groups
pub async fn groups(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    let groups = state.variation_grouper(id).groups().await?;
    Ok(Json(groups))
}

/// POST /api/menu-items/:id/groups/members - 新建规格并加入分组末尾
pub async fn add_member(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddMemberRequest>,
) -> AppResult<Json<Variation>> {
    ensure_menu_item(&state, id).await?;
    let created = state
        .variation_grouper(id)
        .add_member(
            &payload.group,
            VariationCreate {
                name: payload.name,
                price: payload.price,
            },
        )
        .await?;
    Ok(Json(created))
}

/// PUT /api/menu-items/:id/groups/rename
pub async fn rename(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RenameGroupRequest>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    let groups = state
        .variation_grouper(id)
        .rename(&payload.group, &payload.name)
        .await?;
    Ok(Json(groups))
}

/// PUT /api/menu-items/:id/groups/rank
pub async fn set_rank(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetGroupRankRequest>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    let groups = state
        .variation_grouper(id)
        .set_rank(&payload.group, payload.rank)
        .await?;
    Ok(Json(groups))
}

/// PUT /api/menu-items/:id/groups/sort-order
pub async fn reorder_groups(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReorderGroupsRequest>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    tracing::info!(menu_item_id = id, count = payload.groups.len(), "Group reorder request received");
    let groups = state
        .variation_grouper(id)
        .reorder_groups(&payload.groups)
        .await?;
    Ok(Json(groups))
}

/// PUT /api/menu-items/:id/groups/members/sort-order
pub async fn reorder_members(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReorderMembersRequest>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    let groups = state
        .variation_grouper(id)
        .reorder_members(&payload.group, &payload.ids)
        .await?;
    Ok(Json(groups))
}

/// POST /api/menu-items/:id/groups/delete - 解散分组，成员移入匿名组
pub async fn delete_group(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeleteGroupRequest>,
) -> AppResult<Json<Vec<Group>>> {
    ensure_menu_item(&state, id).await?;
    let groups = state
        .variation_grouper(id)
        .delete_group(&payload.group, payload.confirmed)
        .await?;
    Ok(Json(groups))
}

/// PUT /api/variations/:id - 仅名称、价格、启用状态
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<VariationUpdate>,
) -> AppResult<Json<Variation>> {
    ensure_variation(&state, id).await?;
    let row = variation::update(state.pool(), id, payload).await?;
    Ok(Json(row))
}

/// DELETE /api/variations/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    ensure_variation(&state, id).await?;
    let result = variation::delete(state.pool(), id).await?;
    tracing::info!(id, "Variation deleted");
    Ok(Json(result))
}
