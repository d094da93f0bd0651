//! User API 模块
//!
//! `/users/signup` 与 `/users/login` 为公共路由，其余需要登录。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list))
        .route("/users/{user_id}", get(handler::get_by_id))
        .route("/users/signup", post(handler::signup))
        .route("/users/login", post(handler::login))
}
