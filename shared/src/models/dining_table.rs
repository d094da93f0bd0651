//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table entity (桌台)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub table_id: String,
    /// Seating capacity
    pub number_of_guests: i32,
    pub table_number: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1, message = "number_of_guests must be positive"))]
    pub number_of_guests: i32,
    #[validate(range(min = 1, message = "table_number must be positive"))]
    pub table_number: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(range(min = 1, message = "number_of_guests must be positive"))]
    pub number_of_guests: Option<i32>,
    #[validate(range(min = 1, message = "table_number must be positive"))]
    pub table_number: Option<i32>,
}
