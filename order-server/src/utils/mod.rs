//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`validation`] - 请求体校验

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
