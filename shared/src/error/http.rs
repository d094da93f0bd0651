//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use super::types::AppError;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::FoodNotFound
            | Self::TableNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::EmailOrPhoneExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            Self::ValidationFailed | Self::InvalidRequest | Self::OrderItemInvalid => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Error body sent to clients: `{ "error": "...", "code": 4002 }`
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a std::collections::HashMap<String, serde_json::Value>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // 系统错误只记录日志，不向客户端暴露细节
        let (message, details) = if self.code.is_system() {
            tracing::error!(code = %self.code, error = %self.message, "Request failed");
            (self.code.message(), None)
        } else {
            (self.message.as_str(), self.details.as_ref())
        };

        let body = ErrorBody {
            error: message,
            code: self.code,
            details,
        };

        (status, Json(body)).into_response()
    }
}
