//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::util::{new_id, now_millis};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self { base }
    }

    /// Find all tables ordered by table number
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        self.base
            .run(async {
                let tables: Vec<DiningTable> = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table ORDER BY table_number")
                    .await?
                    .take(0)?;
                Ok(tables)
            })
            .await
    }

    /// Find table by its textual id
    pub async fn find_by_id(&self, table_id: &str) -> RepoResult<Option<DiningTable>> {
        let table_id = table_id.to_string();
        self.base
            .run(async {
                let table: Option<DiningTable> = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table WHERE table_id = $table_id LIMIT 1")
                    .bind(("table_id", table_id))
                    .await?
                    .take(0)?;
                Ok(table)
            })
            .await
    }

    /// Batch lookup (missing ids are simply absent from the result)
    pub async fn find_by_ids(&self, table_ids: Vec<String>) -> RepoResult<Vec<DiningTable>> {
        if table_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .run(async {
                let tables: Vec<DiningTable> = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table WHERE table_id IN $ids")
                    .bind(("ids", table_ids))
                    .await?
                    .take(0)?;
                Ok(tables)
            })
            .await
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let now = now_millis();
        let table = DiningTable {
            table_id: new_id(),
            number_of_guests: data.number_of_guests,
            table_number: data.table_number,
            created_at: now,
            updated_at: now,
        };

        self.base
            .run(async {
                let created: Option<DiningTable> =
                    self.base.db().create(TABLE).content(table).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
            })
            .await
    }

    /// Patch a dining table; only provided fields change
    pub async fn update(&self, table_id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", table_id)))?;

        let number_of_guests = data.number_of_guests.unwrap_or(existing.number_of_guests);
        let table_number = data.table_number.unwrap_or(existing.table_number);
        let table_id = table_id.to_string();

        self.base
            .run(async {
                let updated: Option<DiningTable> = self
                    .base
                    .db()
                    .query(
                        "UPDATE dining_table SET number_of_guests = $guests, table_number = $number, \
                         updated_at = $now WHERE table_id = $table_id RETURN AFTER",
                    )
                    .bind(("guests", number_of_guests))
                    .bind(("number", table_number))
                    .bind(("now", now_millis()))
                    .bind(("table_id", table_id.clone()))
                    .await?
                    .take(0)?;
                updated.ok_or_else(|| RepoError::NotFound(format!("Table {} not found", table_id)))
            })
            .await
    }

    /// Hard delete; orders keep their (now dangling) reference
    pub async fn delete(&self, table_id: &str) -> RepoResult<bool> {
        let table_id = table_id.to_string();
        self.base
            .run(async {
                let deleted: Vec<DiningTable> = self
                    .base
                    .db()
                    .query("DELETE dining_table WHERE table_id = $table_id RETURN BEFORE")
                    .bind(("table_id", table_id))
                    .await?
                    .take(0)?;
                Ok(!deleted.is_empty())
            })
            .await
    }
}
