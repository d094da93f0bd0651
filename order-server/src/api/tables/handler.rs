//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::core::ServerState;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// GET /tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.repos.tables.find_all().await?;
    Ok(Json(tables))
}

/// GET /tables/:table_id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .repos
        .tables
        .find_by_id(&table_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {}", table_id)))?;
    Ok(Json(table))
}

/// POST /tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_payload(&payload)?;
    let table = state.repos.tables.create(payload).await?;
    tracing::info!(table_id = %table.table_id, table_number = table.table_number, "Table created");
    Ok(Json(table))
}

/// PATCH /tables/:table_id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    validate_payload(&payload)?;
    let table = state.repos.tables.update(&table_id, payload).await?;
    Ok(Json(table))
}

/// DELETE /tables/:table_id - 删除桌台 (不级联订单)
pub async fn delete(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.repos.tables.delete(&table_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Table {}", table_id)));
    }
    tracing::info!(table_id = %table_id, "Table deleted");
    Ok(Json(true))
}
