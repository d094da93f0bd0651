//! Order Repository
//!
//! Orders live in the `orders` table. `item_count` is only ever changed by
//! the order item transactions in [`super::OrderItemRepository`].

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::Order;
use shared::util::{new_id, now_millis};

const TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self { base }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        self.base
            .run(async {
                let orders: Vec<Order> = self
                    .base
                    .db()
                    .query("SELECT * FROM orders ORDER BY order_date DESC")
                    .await?
                    .take(0)?;
                Ok(orders)
            })
            .await
    }

    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order_id = order_id.to_string();
        self.base
            .run(async {
                let order: Option<Order> = self
                    .base
                    .db()
                    .query("SELECT * FROM orders WHERE order_id = $order_id LIMIT 1")
                    .bind(("order_id", order_id))
                    .await?
                    .take(0)?;
                Ok(order)
            })
            .await
    }

    pub async fn find_by_ids(&self, order_ids: Vec<String>) -> RepoResult<Vec<Order>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.base
            .run(async {
                let orders: Vec<Order> = self
                    .base
                    .db()
                    .query("SELECT * FROM orders WHERE order_id IN $ids")
                    .bind(("ids", order_ids))
                    .await?
                    .take(0)?;
                Ok(orders)
            })
            .await
    }

    /// Create an empty order (item_count = 0)
    pub async fn create(&self, table_id: Option<String>, order_date: i64) -> RepoResult<Order> {
        let now = now_millis();
        let order = Order {
            order_id: new_id(),
            order_date,
            table_id,
            item_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.base
            .run(async {
                let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create order".into()))
            })
            .await
    }

    /// Point an existing order at another table
    pub async fn update_table(&self, order_id: &str, table_id: String) -> RepoResult<Order> {
        let order_id = order_id.to_string();
        self.base
            .run(async {
                let updated: Option<Order> = self
                    .base
                    .db()
                    .query(
                        "UPDATE orders SET table_id = $table_id, updated_at = $now \
                         WHERE order_id = $order_id RETURN AFTER",
                    )
                    .bind(("table_id", table_id))
                    .bind(("now", now_millis()))
                    .bind(("order_id", order_id.clone()))
                    .await?
                    .take(0)?;
                updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
            })
            .await
    }

    /// Remove the order only if no item references it any more
    ///
    /// Returns `true` when a record was deleted.
    pub async fn delete_if_empty(&self, order_id: &str) -> RepoResult<bool> {
        let order_id = order_id.to_string();
        self.base
            .run(async {
                let deleted: Vec<Order> = self
                    .base
                    .db()
                    .query("DELETE orders WHERE order_id = $order_id AND item_count <= 0 RETURN BEFORE")
                    .bind(("order_id", order_id))
                    .await?
                    .take(0)?;
                Ok(!deleted.is_empty())
            })
            .await
    }
}
