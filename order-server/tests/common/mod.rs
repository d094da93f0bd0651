//! Shared helpers for router-level tests
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use order_server::{Config, ServerState, build_router};
use order_server::db::DbService;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    pub token: String,
}

impl TestApp {
    /// Fresh in-memory store, router and a signed-up user
    pub async fn spawn() -> Self {
        Self::spawn_with(Config::for_testing()).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        let db = DbService::new(&config).await.unwrap();
        let state = ServerState::new(config, db.db);
        let router = build_router(state.clone());

        let mut app = Self {
            router,
            state,
            token: String::new(),
        };
        let (status, body) = app
            .send(
                "POST",
                "/users/signup",
                Some(json!({
                    "first_name": "Ada",
                    "last_name": "Waiter",
                    "email": "ada@example.com",
                    "phone": "5550001",
                    "password": "secret-pass"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        app.token = body["token"].as_str().unwrap().to_string();
        app
    }

    /// Authenticated request (session cookie)
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.token.is_empty() {
            builder = builder.header(header::COOKIE, format!("token={}", self.token));
        }
        self.dispatch(builder, body).await.0
    }

    /// Request without credentials, also returning the response headers
    pub async fn send_anonymous(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> ((StatusCode, Value), http::HeaderMap) {
        let builder = Request::builder().method(method).uri(uri);
        self.dispatch(builder, body).await
    }

    async fn dispatch(
        &self,
        builder: http::request::Builder,
        body: Option<Value>,
    ) -> ((StatusCode, Value), http::HeaderMap) {
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        ((status, value), headers)
    }

    pub async fn create_table(&self, table_number: i32) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/tables",
                Some(json!({ "number_of_guests": 4, "table_number": table_number })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create table failed: {body}");
        body["table_id"].as_str().unwrap().to_string()
    }

    pub async fn create_food(&self, name: &str, price: f64) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/foods",
                Some(json!({
                    "name": name,
                    "price": price,
                    "food_image": format!("{name}.png"),
                    "menu_id": "menu-1"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create food failed: {body}");
        body["food_id"].as_str().unwrap().to_string()
    }

    /// Submit a new order for `table_id`; returns `(order_id, [order_item_id])`
    pub async fn submit_order(&self, table_id: &str, foods: &[(&str, i32)]) -> (String, Vec<String>) {
        let entries: Vec<Value> = foods
            .iter()
            .map(|(food_id, quantity)| json!({ "food_id": food_id, "quantity": quantity }))
            .collect();
        let (status, body) = self
            .send(
                "POST",
                "/orderItems",
                Some(json!({ "table_id": table_id, "order_items": entries })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "submit order failed: {body}");

        let order_id = body["order_id"].as_str().unwrap().to_string();
        let item_ids = body["order_items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["order_item_id"].as_str().unwrap().to_string())
            .collect();
        (order_id, item_ids)
    }
}
