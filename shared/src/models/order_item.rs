//! Order Item Model

use serde::{Deserialize, Serialize};

/// Order item entity (one food selection inside an order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: String,
    pub quantity: i32,
    /// Copied from the food price at creation time, rounded to 2 dp
    pub unit_price: f64,
    pub food_id: String,
    /// Parent order (immutable after creation)
    pub order_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One food selection in a batch submission
///
/// Fields are optional so that a missing field is reported against its
/// entry index instead of failing the whole body at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemEntry {
    pub food_id: Option<String>,
    pub quantity: Option<i32>,
}

/// Batch submission: `POST /orderItems`
///
/// Without `order_id` a new order is opened for `table_id`; with
/// `order_id` the entries are appended to that existing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemPack {
    pub table_id: Option<String>,
    pub order_id: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItemEntry>,
}

/// Result of a batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemBatch {
    pub order_id: String,
    pub order_items: Vec<OrderItem>,
}

/// Update order item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
    pub food_id: Option<String>,
}

impl OrderItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.unit_price.is_none() && self.food_id.is_none()
    }
}

/// Outcome of deleting an order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The item was the last one; its order is gone too
    OrderDeleted { order_id: String, message: String },
    /// Other items remain on the order
    ItemDeleted {
        order_id: String,
        remaining_count: i64,
        message: String,
    },
}

impl DeleteOutcome {
    pub fn order_deleted(order_id: impl Into<String>) -> Self {
        Self::OrderDeleted {
            order_id: order_id.into(),
            message: "Order and all items deleted".to_string(),
        }
    }

    pub fn item_deleted(order_id: impl Into<String>, remaining_count: i64) -> Self {
        Self::ItemDeleted {
            order_id: order_id.into(),
            remaining_count,
            message: "Order item deleted".to_string(),
        }
    }
}
