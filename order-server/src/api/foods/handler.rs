//! Food API Handlers
//!
//! Prices are normalized to 2 dp by the repository on every write.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Food, FoodCreate, FoodUpdate};

use crate::core::ServerState;
use crate::orders::money::validate_price;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult};

/// GET /foods
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Food>>> {
    let foods = state.repos.foods.find_all().await?;
    Ok(Json(foods))
}

/// GET /foods/:food_id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(food_id): Path<String>,
) -> AppResult<Json<Food>> {
    let food = state
        .repos
        .foods
        .find_by_id(&food_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food {}", food_id)))?;
    Ok(Json(food))
}

/// POST /foods
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodCreate>,
) -> AppResult<Json<Food>> {
    validate_payload(&payload)?;
    validate_price(payload.price).map_err(|e| AppError::validation(format!("price: {}", e)))?;
    let food = state.repos.foods.create(payload).await?;
    tracing::info!(food_id = %food.food_id, price = food.price, "Food created");
    Ok(Json(food))
}

/// PATCH /foods/:food_id
pub async fn update(
    State(state): State<ServerState>,
    Path(food_id): Path<String>,
    Json(payload): Json<FoodUpdate>,
) -> AppResult<Json<Food>> {
    validate_payload(&payload)?;
    if let Some(price) = payload.price {
        validate_price(price).map_err(|e| AppError::validation(format!("price: {}", e)))?;
    }
    let food = state.repos.foods.update(&food_id, payload).await?;
    Ok(Json(food))
}

/// DELETE /foods/:food_id - 不级联订单明细
pub async fn delete(
    State(state): State<ServerState>,
    Path(food_id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.repos.foods.delete(&food_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Food {}", food_id)));
    }
    tracing::info!(food_id = %food_id, "Food deleted");
    Ok(Json(true))
}
