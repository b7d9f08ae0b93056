//! Payment Method API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{PaymentMethod, PaymentMethodCreate, PaymentMethodUpdate};
use shared::{MoveRequest, ReorderRequest};

use crate::core::ServerState;
use crate::db::repository::payment_method;
use crate::ordering::RankEntry;
use crate::utils::{AppError, AppResult, ErrorCode};

async fn ensure_payment_method(state: &ServerState, id: i64) -> AppResult<PaymentMethod> {
    payment_method::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PaymentMethodNotFound,
                format!("Payment method {id} not found"),
            )
            .with_detail("id", id)
        })
}

/// GET /api/admin-groups/:group_id/payment-methods
pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> AppResult<Json<Vec<PaymentMethod>>> {
    let methods = payment_method::find_by_group(state.pool(), group_id).await?;
    Ok(Json(methods))
}

/// POST /api/admin-groups/:group_id/payment-methods - 追加到组末尾
pub async fn create(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<PaymentMethodCreate>,
) -> AppResult<Json<PaymentMethod>> {
    let method = payment_method::create(state.pool(), group_id, payload).await?;
    tracing::info!(
        id = method.id,
        admin_group_id = group_id,
        sort_order = method.sort_order,
        "Payment method created"
    );
    Ok(Json(method))
}

/// GET /api/payment-methods/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PaymentMethod>> {
    Ok(Json(ensure_payment_method(&state, id).await?))
}

/// PUT /api/payment-methods/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentMethodUpdate>,
) -> AppResult<Json<PaymentMethod>> {
    ensure_payment_method(&state, id).await?;
    let method = payment_method::update(state.pool(), id, payload).await?;
    Ok(Json(method))
}

/// DELETE /api/payment-methods/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    ensure_payment_method(&state, id).await?;
    let result = payment_method::delete(state.pool(), id).await?;
    tracing::info!(id, "Payment method deleted");
    Ok(Json(result))
}

/// PUT /api/admin-groups/:group_id/payment-methods/sort-order
pub async fn reorder(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<Json<Vec<RankEntry>>> {
    tracing::info!(
        admin_group_id = group_id,
        count = payload.ids.len(),
        "Payment method reorder request received"
    );
    let ranks = state
        .payment_method_sequencer(group_id)
        .reorder(&payload.ids)
        .await?;
    Ok(Json(ranks))
}

/// POST /api/payment-methods/:id/move - 在所属管理组内移动
pub async fn move_to(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<Vec<RankEntry>>> {
    let method = ensure_payment_method(&state, id).await?;
    let ranks = state
        .payment_method_sequencer(method.admin_group_id)
        .shift_insert(payload.target_rank, id)
        .await?;
    Ok(Json(ranks))
}
