//! User Handlers
//!
//! Sign-up, login and user lookups

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{AuthResponse, LoginRequest, SignUpRequest, User, UserPage, UserResponse};
use shared::util::{new_id, now_millis};
use tower_cookies::{Cookie, Cookies};

use crate::auth::{TOKEN_COOKIE, password};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Session cookie lifetime (seconds)
const TOKEN_COOKIE_MAX_AGE_SECS: i64 = 3600;

/// Default page size for `GET /users`
const DEFAULT_PAGE_SIZE: u64 = 10;

const MAX_WINDOW_VALUE: u64 = i64::MAX as u64;

/// Pagination query: `?recordPerPage=&page=&startIndex=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub record_per_page: Option<String>,
    pub page: Option<String>,
    pub start_index: Option<String>,
}

impl PageQuery {
    /// `(limit, start)`; bad or non-positive values fall back to defaults
    ///
    /// Values beyond `i64::MAX` (the store's integer range) count as bad, and
    /// an overflowing `(page-1)*limit` falls back to the first page.
    fn window(&self) -> (u64, u64) {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|n| *n <= MAX_WINDOW_VALUE)
        };

        let limit = parse(&self.record_per_page)
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page = parse(&self.page).filter(|n| *n >= 1).unwrap_or(1);
        let start = parse(&self.start_index).unwrap_or_else(|| {
            (page - 1)
                .checked_mul(limit)
                .filter(|n| *n <= MAX_WINDOW_VALUE)
                .unwrap_or(0)
        });
        (limit, start)
    }
}

/// GET /users - 分页查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<UserPage>> {
    let (limit, start) = query.window();
    let (total_count, users) = state.repos.users.find_page(limit, start).await?;
    Ok(Json(UserPage {
        total_count,
        user_items: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /users/:user_id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .repos
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", user_id))
        })?;
    Ok(Json(user.into()))
}

/// POST /users/signup
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignUpRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_payload(&req)?;

    if state
        .repos
        .users
        .exists_email_or_phone(&req.email, &req.phone)
        .await?
    {
        return Err(AppError::new(ErrorCode::EmailOrPhoneExists));
    }

    let hash = password::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let now = now_millis();
    let mut user = User {
        user_id: new_id(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        phone: req.phone,
        password: hash,
        avatar: req.avatar,
        user_type: req.user_type,
        token: None,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    };

    let (token, refresh_token) = state
        .jwt_service
        .generate_tokens(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;
    user.token = Some(token.clone());
    user.refresh_token = Some(refresh_token.clone());

    let user = state.repos.users.create(user).await?;
    tracing::info!(user_id = %user.user_id, "User signed up");

    Ok(Json(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    }))
}

/// POST /users/login
///
/// 成功后设置 HTTP-only `token` cookie；失败统一返回凭据错误，避免邮箱枚举
pub async fn login(
    State(state): State<ServerState>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let found = state.repos.users.find_by_email(&req.email).await?;

    let user = match found {
        Some(user) => {
            let valid = password::verify_password(&req.password, &user.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !valid {
                security_log!("WARN", "login_failed", email = req.email.clone());
                return Err(AppError::invalid_credentials());
            }
            user
        }
        None => {
            security_log!("WARN", "login_unknown_email", email = req.email.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let (token, refresh_token) = state
        .jwt_service
        .generate_tokens(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let user = state
        .repos
        .users
        .update_tokens(&user.user_id, token.clone(), refresh_token.clone())
        .await?;

    let mut cookie = Cookie::new(TOKEN_COOKIE, token.clone());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(TOKEN_COOKIE_MAX_AGE_SECS));
    cookies.add(cookie);

    tracing::info!(user_id = %user.user_id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(per_page: Option<&str>, page: Option<&str>, start: Option<&str>) -> PageQuery {
        PageQuery {
            record_per_page: per_page.map(Into::into),
            page: page.map(Into::into),
            start_index: start.map(Into::into),
        }
    }

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(query(None, None, None).window(), (10, 0));
    }

    #[test]
    fn test_page_window_from_page() {
        assert_eq!(query(Some("5"), Some("3"), None).window(), (5, 10));
    }

    #[test]
    fn test_page_window_invalid_values_fall_back() {
        assert_eq!(query(Some("0"), Some("abc"), None).window(), (10, 0));
        assert_eq!(query(Some("-4"), Some("-1"), None).window(), (10, 0));
        // (page - 1) * limit would overflow u64
        assert_eq!(query(None, Some("18446744073709551615"), None).window(), (10, 0));
        assert_eq!(
            query(Some("9223372036854775807"), Some("3"), None).window(),
            (9_223_372_036_854_775_807, 0)
        );
        // above the store's integer range
        assert_eq!(query(Some("18446744073709551615"), None, Some("18446744073709551615")).window(), (10, 0));
    }

    #[test]
    fn test_start_index_overrides_page() {
        assert_eq!(query(Some("5"), Some("3"), Some("2")).window(), (5, 2));
    }
}
