//! Order core errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

/// Errors raised by the order lifecycle and composition
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    /// One entry of a batch failed validation (zero-based index)
    #[error("order_items[{index}]: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// payment_due 超出 Decimal 范围 (order_id 为 None 表示孤立明细组)
    #[error("Amount overflow for order {0:?}")]
    AmountOverflow(Option<String>),

    #[error(transparent)]
    Store(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
                    .with_detail("order_id", id)
            }
            OrderError::ItemNotFound(id) => AppError::with_message(
                ErrorCode::OrderItemNotFound,
                format!("Order item {} not found", id),
            )
            .with_detail("order_item_id", id),
            OrderError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
                    .with_detail("table_id", id)
            }
            OrderError::FoodNotFound(id) => {
                AppError::with_message(ErrorCode::FoodNotFound, format!("Food {} not found", id))
                    .with_detail("food_id", id)
            }
            OrderError::InvalidEntry { index, reason } => AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("order_items[{}]: {}", index, reason),
            )
            .with_detail("index", index),
            OrderError::InvalidOperation(msg) => AppError::validation(msg),
            OrderError::AmountOverflow(order_id) => {
                let err = AppError::invalid_request("payment_due is out of range");
                match order_id {
                    Some(id) => err.with_detail("order_id", id),
                    None => err,
                }
            }
            OrderError::Store(e) => e.into(),
        }
    }
}
