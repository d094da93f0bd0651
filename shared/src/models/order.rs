//! Order Model

use serde::{Deserialize, Serialize};

/// Order entity (one dining session)
///
/// An order only exists while at least one order item references it.
/// `item_count` is maintained in the same store transaction as every
/// item insert/delete, so it never has to be recounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// Order timestamp (Unix millis)
    pub order_date: i64,
    /// Table reference (not owned)
    pub table_id: Option<String>,
    #[serde(default)]
    pub item_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: Option<String>,
    /// Defaults to now
    pub order_date: Option<i64>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub table_id: Option<String>,
}
