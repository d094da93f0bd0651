//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    DeleteOutcome, OrderItem, OrderItemBatch, OrderItemPack, OrderItemUpdate, OrderSummary,
};

use crate::core::ServerState;
use crate::orders::OrderError;
use crate::utils::AppResult;

/// GET /orderItems
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderItem>>> {
    let items = state.repos.order_items.find_all().await?;
    Ok(Json(items))
}

/// GET /orderItems/:orderItem_id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_item_id): Path<String>,
) -> AppResult<Json<OrderItem>> {
    let item = state
        .repos
        .order_items
        .find_by_id(&order_item_id)
        .await?
        .ok_or(OrderError::ItemNotFound(order_item_id))?;
    Ok(Json(item))
}

/// POST /orderItems - 批量下单
pub async fn create(
    State(state): State<ServerState>,
    Json(pack): Json<OrderItemPack>,
) -> AppResult<Json<OrderItemBatch>> {
    let batch = state.lifecycle.submit_batch(pack).await?;
    Ok(Json(batch))
}

/// PATCH /orderItems/:orderItem_id
pub async fn update(
    State(state): State<ServerState>,
    Path(order_item_id): Path<String>,
    Json(patch): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderItem>> {
    let item = state.lifecycle.update_order_item(&order_item_id, patch).await?;
    Ok(Json(item))
}

/// DELETE /orderItems/:orderItem_id
pub async fn delete(
    State(state): State<ServerState>,
    Path(order_item_id): Path<String>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.lifecycle.delete_order_item(&order_item_id).await?;
    Ok(Json(outcome))
}

/// GET /orderItems-order/:order_id - 账单视图
pub async fn compose_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let view = state.composer.compose(Some(&order_id)).await?;
    Ok(Json(view))
}

/// GET /orderItems-order - 所有订单的账单视图
pub async fn compose_all(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderSummary>>> {
    let view = state.composer.compose(None).await?;
    Ok(Json(view))
}
