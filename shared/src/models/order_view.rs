//! Composed order view (billing summary)

use serde::{Deserialize, Serialize};

/// One order item joined with its food, order and table
///
/// Every joined field is optional: a dangling reference keeps the row and
/// leaves the field absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub order_item_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub food_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    /// Current food price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Amount this row contributes to `payment_due`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
}

/// Billing summary for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    pub payment_due: f64,
    pub total_count: usize,
    pub order_items: Vec<OrderItemRow>,
}
