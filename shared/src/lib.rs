//! Shared types for the restaurant order backend
//!
//! Entity models, payloads, the composed order view and the unified
//! error type used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
