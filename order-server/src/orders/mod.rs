//! 订单核心
//!
//! - [`money`]: price normalization (2 dp, half away from zero)
//! - [`lifecycle`]: order creation with item batches, cascade delete
//! - [`composition`]: joined billing view per order

pub mod composition;
pub mod error;
pub mod lifecycle;
pub mod money;

pub use composition::OrderComposer;
pub use error::{OrderError, OrderResult};
pub use lifecycle::OrderLifecycle;
