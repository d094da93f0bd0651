//! Database Module
//!
//! Opens the embedded SurrealDB store and prepares its tables/indexes.

pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::Config;
use crate::core::config::DatabaseKind;
use crate::utils::AppError;

/// Schema: textual identifiers are unique and indexed for lookups.
///
/// Tables stay schemaless; the indexes only enforce identity and speed up
/// the `WHERE <x>_id = $id` lookups every repository does.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_id_idx ON user FIELDS user_id UNIQUE;
DEFINE INDEX IF NOT EXISTS user_email_idx ON user FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS user_phone_idx ON user FIELDS phone UNIQUE;

DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
DEFINE INDEX IF NOT EXISTS table_id_idx ON dining_table FIELDS table_id UNIQUE;

DEFINE TABLE IF NOT EXISTS food SCHEMALESS;
DEFINE INDEX IF NOT EXISTS food_id_idx ON food FIELDS food_id UNIQUE;

DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_id_idx ON orders FIELDS order_id UNIQUE;

DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_item_id_idx ON order_item FIELDS order_item_id UNIQUE;
DEFINE INDEX IF NOT EXISTS order_item_order_idx ON order_item FIELDS order_id;
"#;

/// Database service (owns the SurrealDB handle)
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the store selected by `config.database`
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = match config.database {
            DatabaseKind::Memory => Surreal::new::<Mem>(())
                .await
                .map_err(|e| AppError::database(format!("Failed to open memory store: {e}")))?,
            DatabaseKind::RocksDb => {
                let dir = config.database_dir();
                std::fs::create_dir_all(&dir).map_err(|e| {
                    AppError::database(format!("Failed to create {}: {e}", dir.display()))
                })?;
                Surreal::new::<RocksDb>(dir)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
            }
        };

        db.use_ns(config.db_namespace.as_str())
            .use_db(config.db_name.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::apply_schema(&db).await?;

        tracing::info!(
            engine = ?config.database,
            namespace = %config.db_namespace,
            database = %config.db_name,
            "Database connection established"
        );

        Ok(Self { db })
    }

    /// In-memory store with schema applied (tests)
    pub async fn memory() -> Result<Self, AppError> {
        Self::new(&Config::for_testing()).await
    }

    async fn apply_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::debug!("Database schema applied");
        Ok(())
    }
}
