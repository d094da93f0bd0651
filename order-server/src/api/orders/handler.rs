//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Order, OrderCreate, OrderUpdate};

use crate::core::ServerState;
use crate::orders::OrderError;
use crate::utils::AppResult;

/// GET /orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.repos.orders.find_all().await?;
    Ok(Json(orders))
}

/// GET /orders/:order_id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .repos
        .orders
        .find_by_id(&order_id)
        .await?
        .ok_or(OrderError::OrderNotFound(order_id))?;
    Ok(Json(order))
}

/// POST /orders - 创建订单 (桌台可选)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.create_order(payload).await?;
    Ok(Json(order))
}

/// PATCH /orders/:order_id - 更换桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.update_order(&order_id, payload).await?;
    tracing::info!(order_id = %order_id, table_id = ?order.table_id, "Order updated");
    Ok(Json(order))
}
