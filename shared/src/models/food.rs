//! Food Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu food entity
///
/// `price` is always persisted rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub food_id: String,
    pub name: String,
    pub price: f64,
    pub food_image: String,
    /// Menu reference (not owned)
    pub menu_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "price must be between 0 and 1000000"))]
    pub price: f64,
    #[validate(length(min = 1, message = "food_image is required"))]
    pub food_image: String,
    #[validate(length(min = 1, message = "menu_id is required"))]
    pub menu_id: String,
}

/// Update food payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FoodUpdate {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "price must be between 0 and 1000000"))]
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}
