//! 认证中间件
//!
//! 为会话令牌认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Session cookie name set at login
pub const TOKEN_COOKIE: &str = "token";

/// 认证中间件 - 要求用户登录
///
/// 令牌来源 (按顺序):
/// 1. `token` cookie (由登录接口设置)
/// 2. `Authorization: Bearer <token>` 头
///
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - `/health`
/// - `/users/signup`, `/users/login`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || is_public_route(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let cookie_token = req
        .extensions()
        .get::<Cookies>()
        .and_then(|cookies| cookies.get(TOKEN_COOKIE))
        .map(|c| c.value().to_string());

    let token = match cookie_token {
        Some(token) => token,
        None => {
            let header = req
                .headers()
                .get(http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());
            match header.and_then(JwtService::extract_from_header) {
                Some(token) => token.to_string(),
                None => {
                    security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
                    return Err(AppError::unauthorized());
                }
            }
        }
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn is_public_route(path: &str) -> bool {
    matches!(path, "/health" | "/users/signup" | "/users/login")
}
