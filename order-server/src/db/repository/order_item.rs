//! Order Item Repository
//!
//! Item writes that touch `orders.item_count` run inside a single SurrealDB
//! transaction together with the count change, so the count and the set of
//! items never disagree.

use serde::Deserialize;

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use shared::models::{DeleteOutcome, OrderItem};
use shared::util::now_millis;

/// Raised inside the batch transaction when the parent order is gone
const ORDER_MISSING: &str = "order_item batch: parent order not found";

/// Raised inside the delete transaction when no row was removed
const ITEM_MISSING: &str = "order_item delete: item not found";

const INSERT_BATCH: &str = r#"
BEGIN TRANSACTION;
LET $target = (UPDATE orders SET item_count += $count, updated_at = $now WHERE order_id = $order_id RETURN AFTER);
IF array::len($target) = 0 { THROW $missing; };
INSERT INTO order_item $items;
COMMIT TRANSACTION;
"#;

// The outcome is captured inside the transaction and returned after COMMIT.
const DELETE_CASCADE: &str = r#"
BEGIN TRANSACTION;
LET $deleted = (DELETE order_item WHERE order_item_id = $order_item_id RETURN BEFORE);
IF array::len($deleted) = 0 { THROW $missing; };
LET $order_id = $deleted[0].order_id;
LET $existing = (SELECT order_id FROM orders WHERE order_id = $order_id);
UPDATE orders SET item_count -= 1, updated_at = $now WHERE order_id = $order_id;
DELETE orders WHERE order_id = $order_id AND item_count <= 0;
LET $outcome = {
    order_id: $order_id,
    order_existed: array::len($existing) > 0,
    order_remains: array::len((SELECT order_id FROM orders WHERE order_id = $order_id)) > 0,
    remaining: (SELECT count() FROM order_item WHERE order_id = $order_id GROUP ALL)[0].count ?? 0
};
COMMIT TRANSACTION;
RETURN $outcome;
"#;

/// Row returned by [`DELETE_CASCADE`]
#[derive(Debug, Deserialize)]
struct CascadeRow {
    order_id: String,
    order_existed: bool,
    order_remains: bool,
    remaining: i64,
}

impl CascadeRow {
    fn into_outcome(self) -> DeleteOutcome {
        // 订单本就不存在时不算"订单被删除"
        if self.order_existed && !self.order_remains {
            DeleteOutcome::order_deleted(self.order_id)
        } else {
            DeleteOutcome::item_deleted(self.order_id, self.remaining)
        }
    }
}

/// Field changes for an existing item (already resolved and normalized)
#[derive(Debug, Clone, Default)]
pub struct OrderItemChanges {
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
    pub food_id: Option<String>,
}

#[derive(Clone)]
pub struct OrderItemRepository {
    base: BaseRepository,
}

impl OrderItemRepository {
    pub fn new(base: BaseRepository) -> Self {
        Self { base }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<OrderItem>> {
        self.find_by_order(None).await
    }

    pub async fn find_by_id(&self, order_item_id: &str) -> RepoResult<Option<OrderItem>> {
        let order_item_id = order_item_id.to_string();
        self.base
            .run(async {
                let item: Option<OrderItem> = self
                    .base
                    .db()
                    .query("SELECT * FROM order_item WHERE order_item_id = $order_item_id LIMIT 1")
                    .bind(("order_item_id", order_item_id))
                    .await?
                    .take(0)?;
                Ok(item)
            })
            .await
    }

    /// Items of one order, or of every order when `order_id` is `None`
    ///
    /// Sorted by `(created_at, order_item_id)`.
    pub async fn find_by_order(&self, order_id: Option<&str>) -> RepoResult<Vec<OrderItem>> {
        let order_id = order_id.map(str::to_string);
        self.base
            .run(async {
                let db = self.base.db();
                let mut response = match order_id {
                    Some(order_id) => {
                        db.query(
                            "SELECT * FROM order_item WHERE order_id = $order_id \
                             ORDER BY created_at ASC, order_item_id ASC",
                        )
                        .bind(("order_id", order_id))
                        .await?
                    }
                    None => {
                        db.query("SELECT * FROM order_item ORDER BY created_at ASC, order_item_id ASC")
                            .await?
                    }
                };
                let items: Vec<OrderItem> = response.take(0)?;
                Ok(items)
            })
            .await
    }

    /// Number of items currently referencing `order_id`
    pub async fn count_by_order(&self, order_id: &str) -> RepoResult<i64> {
        let order_id = order_id.to_string();
        self.base
            .run(async {
                let row: Option<CountRow> = self
                    .base
                    .db()
                    .query("SELECT count() FROM order_item WHERE order_id = $order_id GROUP ALL")
                    .bind(("order_id", order_id))
                    .await?
                    .take(0)?;
                Ok(row.map(|r| r.count).unwrap_or(0))
            })
            .await
    }

    /// Insert a batch of items into an existing order
    ///
    /// All items plus the `item_count` increment commit together; if the
    /// order has vanished nothing is written.
    pub async fn insert_batch(
        &self,
        order_id: &str,
        items: Vec<OrderItem>,
    ) -> RepoResult<Vec<OrderItem>> {
        if items.is_empty() {
            return Err(RepoError::Validation("order item batch is empty".into()));
        }
        let order_id = order_id.to_string();
        let count = items.len() as i64;

        self.base
            .run(async {
                let mut response = self
                    .base
                    .db()
                    .query(INSERT_BATCH)
                    .bind(("order_id", order_id.clone()))
                    .bind(("count", count))
                    .bind(("now", now_millis()))
                    .bind(("missing", ORDER_MISSING))
                    .bind(("items", items.clone()))
                    .await?;

                let errors = response.take_errors();
                if errors.values().any(|e| e.to_string().contains(ORDER_MISSING)) {
                    return Err(RepoError::NotFound(format!("Order {} not found", order_id)));
                }
                if let Some(err) = errors.into_values().next() {
                    return Err(err.into());
                }
                Ok(items)
            })
            .await
    }

    /// Apply field changes to an item; `None` when the item does not exist
    pub async fn update(
        &self,
        order_item_id: &str,
        changes: OrderItemChanges,
    ) -> RepoResult<Option<OrderItem>> {
        let mut sets = vec!["updated_at = $now"];
        if changes.quantity.is_some() {
            sets.push("quantity = $quantity");
        }
        if changes.unit_price.is_some() {
            sets.push("unit_price = $unit_price");
        }
        if changes.food_id.is_some() {
            sets.push("food_id = $food_id");
        }
        let sql = format!(
            "UPDATE order_item SET {} WHERE order_item_id = $order_item_id RETURN AFTER",
            sets.join(", ")
        );
        let order_item_id = order_item_id.to_string();

        self.base
            .run(async {
                let mut query = self
                    .base
                    .db()
                    .query(sql)
                    .bind(("order_item_id", order_item_id))
                    .bind(("now", now_millis()));
                if let Some(quantity) = changes.quantity {
                    query = query.bind(("quantity", quantity));
                }
                if let Some(unit_price) = changes.unit_price {
                    query = query.bind(("unit_price", unit_price));
                }
                if let Some(food_id) = changes.food_id {
                    query = query.bind(("food_id", food_id));
                }
                let updated: Option<OrderItem> = query.await?.take(0)?;
                Ok(updated)
            })
            .await
    }

    /// Delete an item and, in the same transaction, its order if it was the
    /// last item
    ///
    /// Returns `None` when the transaction removed no item, including when a
    /// concurrent delete got there first. A write conflict surfaces as
    /// [`RepoError::Database`].
    pub async fn delete_cascade(&self, order_item_id: &str) -> RepoResult<Option<DeleteOutcome>> {
        let order_item_id = order_item_id.to_string();

        self.base
            .run(async {
                let mut response = self
                    .base
                    .db()
                    .query(DELETE_CASCADE)
                    .bind(("order_item_id", order_item_id))
                    .bind(("now", now_millis()))
                    .bind(("missing", ITEM_MISSING))
                    .await?;

                let errors = response.take_errors();
                if errors.values().any(|e| e.to_string().contains(ITEM_MISSING)) {
                    return Ok(None);
                }
                if let Some(err) = errors.into_values().next() {
                    return Err(err.into());
                }

                let last = response.num_statements().saturating_sub(1);
                let row: Option<CascadeRow> = response.take(last)?;
                let row = row.ok_or_else(|| RepoError::Database("delete transaction returned no outcome".into()))?;
                Ok(Some(row.into_outcome()))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::DbService;
    use crate::db::repository::Repositories;
    use shared::util::new_id;

    async fn repos() -> Repositories {
        let service = DbService::memory().await.unwrap();
        Repositories::new(service.db, Duration::from_secs(5))
    }

    fn item(order_id: &str) -> OrderItem {
        OrderItem {
            order_item_id: new_id(),
            quantity: 1,
            unit_price: 2.5,
            food_id: "f1".into(),
            order_id: order_id.into(),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_batch_into_vanished_order_is_not_found() {
        let repos = repos().await;
        let order = repos.orders.create(None, 0).await.unwrap();
        assert!(repos.orders.delete_if_empty(&order.order_id).await.unwrap());

        let err = repos
            .order_items
            .insert_batch(&order.order_id, vec![item(&order.order_id), item(&order.order_id)])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)), "got {err:?}");

        assert_eq!(repos.order_items.count_by_order(&order.order_id).await.unwrap(), 0);
        assert!(repos.orders.find_by_id(&order.order_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_batch_bumps_item_count() {
        let repos = repos().await;
        let order = repos.orders.create(None, 0).await.unwrap();

        let inserted = repos
            .order_items
            .insert_batch(&order.order_id, vec![item(&order.order_id), item(&order.order_id)])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);

        let order = repos.orders.find_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(order.item_count, 2);
    }

    #[tokio::test]
    async fn test_delete_cascade_twice_second_is_none() {
        let repos = repos().await;
        let order = repos.orders.create(None, 0).await.unwrap();
        let items = repos
            .order_items
            .insert_batch(&order.order_id, vec![item(&order.order_id), item(&order.order_id)])
            .await
            .unwrap();
        let first = &items[0].order_item_id;

        let outcome = repos.order_items.delete_cascade(first).await.unwrap();
        assert_eq!(outcome, Some(DeleteOutcome::item_deleted(order.order_id.clone(), 1)));

        assert_eq!(repos.order_items.delete_cascade(first).await.unwrap(), None);
        let order = repos.orders.find_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(order.item_count, 1);
    }

    #[tokio::test]
    async fn test_delete_cascade_last_item_removes_order() {
        let repos = repos().await;
        let order = repos.orders.create(None, 0).await.unwrap();
        let items = repos
            .order_items
            .insert_batch(&order.order_id, vec![item(&order.order_id)])
            .await
            .unwrap();

        let outcome = repos
            .order_items
            .delete_cascade(&items[0].order_item_id)
            .await
            .unwrap();
        assert_eq!(outcome, Some(DeleteOutcome::order_deleted(order.order_id.clone())));
        assert!(repos.orders.find_by_id(&order.order_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascade_item_without_order() {
        let repos = repos().await;
        let orphan = item("never-existed");
        let orphan_id = orphan.order_item_id.clone();
        let _: Option<OrderItem> = repos
            .order_items
            .base
            .db()
            .create("order_item")
            .content(orphan)
            .await
            .unwrap();

        let outcome = repos.order_items.delete_cascade(&orphan_id).await.unwrap();
        assert_eq!(outcome, Some(DeleteOutcome::item_deleted("never-existed", 0)));
    }
}
