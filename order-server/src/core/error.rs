use thiserror::Error;

use crate::utils::AppError;

/// Startup and serve-loop errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("网络错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// Result type for server lifecycle calls
pub type Result<T> = std::result::Result<T, ServerError>;
