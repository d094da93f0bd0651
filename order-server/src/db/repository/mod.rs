//! Repository Module
//!
//! Typed access to each collection of the embedded store. Every call goes
//! through [`BaseRepository::run`], which bounds it by the configured
//! per-operation timeout.

pub mod dining_table;
pub mod food;
pub mod order;
pub mod order_item;
pub mod user;

pub use dining_table::DiningTableRepository;
pub use food::FoodRepository;
pub use order::OrderRepository;
pub use order_item::OrderItemRepository;
pub use user::UserRepository;

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Timeout(after) => AppError::timeout(format!("store call exceeded {after:?}")),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `SELECT count() ... GROUP ALL` row
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}

/// Base repository with database reference and per-call deadline
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
    timeout: Duration,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Run one store operation under the deadline
    ///
    /// Nothing is retried: an expired call is reported as
    /// [`RepoError::Timeout`] and the caller decides what to do.
    pub async fn run<T, F>(&self, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Store call timed out");
                Err(RepoError::Timeout(self.timeout))
            }
        }
    }
}

/// Typed handles to every collection, built once and injected into the
/// components that need them.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub tables: DiningTableRepository,
    pub foods: FoodRepository,
    pub orders: OrderRepository,
    pub order_items: OrderItemRepository,
}

impl Repositories {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        let base = BaseRepository::new(db, timeout);
        Self {
            users: UserRepository::new(base.clone()),
            tables: DiningTableRepository::new(base.clone()),
            foods: FoodRepository::new(base.clone()),
            orders: OrderRepository::new(base.clone()),
            order_items: OrderItemRepository::new(base),
        }
    }
}
