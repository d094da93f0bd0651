//! Data models
//!
//! Shared between the order server and its clients (via API).
//! Every entity carries a textual identifier (`*_id: String`) that is
//! independent of the store's internal record id. Timestamps are Unix millis.

pub mod dining_table;
pub mod food;
pub mod order;
pub mod order_item;
pub mod order_view;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use food::*;
pub use order::*;
pub use order_item::*;
pub use order_view::*;
pub use user::*;
