//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 用户注册、登录、查询
//! - [`tables`] - 桌台管理接口
//! - [`foods`] - 菜品管理接口
//! - [`orders`] - 订单管理接口
//! - [`order_items`] - 订单明细、批量下单、账单视图

pub mod foods;
pub mod health;
pub mod order_items;
pub mod orders;
pub mod tables;
pub mod users;

use std::time::Duration;

use axum::{Router, middleware};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router())
        .merge(tables::router())
        .merge(foods::router())
        .merge(orders::router())
        .merge(order_items::router())
}

/// Full application: routes, auth gate and tower layers, bound to `state`
pub fn build_router(state: ServerState) -> Router {
    let request_timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_app()
        // require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // 最外层: 认证中间件从请求扩展中读取 Cookies
        .layer(CookieManagerLayer::new())
}
