//! Order Lifecycle
//!
//! Keeps the rule that an order exists only while at least one order item
//! references it:
//!
//! - a new order is opened only together with its first batch of items
//! - deleting the last item of an order deletes the order in the same
//!   store transaction
//!
//! Every batch is fully validated before the first write.

use std::collections::{HashMap, HashSet};

use shared::models::{
    DeleteOutcome, Food, Order, OrderCreate, OrderItem, OrderItemBatch, OrderItemEntry,
    OrderItemPack, OrderItemUpdate, OrderUpdate,
};
use shared::util::{new_id, now_millis};

use super::error::{OrderError, OrderResult};
use super::money::{round2, validate_price};
use crate::db::repository::order_item::OrderItemChanges;
use crate::db::repository::{RepoError, Repositories};

/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

/// A validated batch entry, not yet bound to an order
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedItem {
    pub food_id: String,
    pub quantity: i32,
    /// Food price at preparation time, rounded to 2 dp
    pub unit_price: f64,
}

impl PreparedItem {
    fn into_order_item(self, order_id: &str, now: i64) -> OrderItem {
        OrderItem {
            order_item_id: new_id(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            food_id: self.food_id,
            order_id: order_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn check_quantity(quantity: i32) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("quantity must be positive, got {}", quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        ));
    }
    Ok(())
}

/// Order lifecycle manager
#[derive(Clone)]
pub struct OrderLifecycle {
    repos: Repositories,
}

impl OrderLifecycle {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Open a new (still empty) order and return its identifier
    pub async fn create_order_for_batch(
        &self,
        table_id: Option<String>,
        order_date: i64,
    ) -> OrderResult<String> {
        let order = self.repos.orders.create(table_id, order_date).await?;
        tracing::info!(order_id = %order.order_id, table_id = ?order.table_id, "Order created");
        Ok(order.order_id)
    }

    /// `POST /orders`: standalone order, awaiting items
    pub async fn create_order(&self, data: OrderCreate) -> OrderResult<Order> {
        if let Some(table_id) = &data.table_id {
            self.require_table(table_id).await?;
        }
        let order_date = data.order_date.unwrap_or_else(now_millis);
        let order_id = self.create_order_for_batch(data.table_id, order_date).await?;
        self.repos
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    /// `PATCH /orders/{order_id}`: only the table reference can change
    ///
    /// A body without `table_id` is rejected rather than clearing the table.
    pub async fn update_order(&self, order_id: &str, data: OrderUpdate) -> OrderResult<Order> {
        let Some(table_id) = data.table_id else {
            return Err(OrderError::InvalidOperation("no fields to update".into()));
        };
        if self.repos.orders.find_by_id(order_id).await?.is_none() {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        self.require_table(&table_id).await?;
        self.repos
            .orders
            .update_table(order_id, table_id)
            .await
            .map_err(|e| not_found_as(e, || OrderError::OrderNotFound(order_id.to_string())))
    }

    /// Validate a batch and resolve each entry's unit price
    ///
    /// Nothing is written. The first invalid entry aborts with its
    /// zero-based index.
    pub async fn prepare_items(&self, entries: &[OrderItemEntry]) -> OrderResult<Vec<PreparedItem>> {
        if entries.is_empty() {
            return Err(OrderError::InvalidOperation(
                "order_items must contain at least one entry".into(),
            ));
        }

        let mut checked = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let food_id = match entry.food_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    return Err(OrderError::InvalidEntry {
                        index,
                        reason: "food_id is required".into(),
                    });
                }
            };
            let quantity = entry.quantity.ok_or_else(|| OrderError::InvalidEntry {
                index,
                reason: "quantity is required".into(),
            })?;
            check_quantity(quantity).map_err(|reason| OrderError::InvalidEntry { index, reason })?;
            checked.push((food_id, quantity));
        }

        let wanted: HashSet<&String> = checked.iter().map(|(id, _)| id).collect();
        let foods: HashMap<String, Food> = self
            .repos
            .foods
            .find_by_ids(wanted.into_iter().cloned().collect())
            .await?
            .into_iter()
            .map(|food| (food.food_id.clone(), food))
            .collect();

        checked
            .into_iter()
            .enumerate()
            .map(|(index, (food_id, quantity))| {
                let food = foods.get(&food_id).ok_or_else(|| OrderError::InvalidEntry {
                    index,
                    reason: format!("food {} not found", food_id),
                })?;
                Ok(PreparedItem {
                    unit_price: round2(food.price),
                    food_id,
                    quantity,
                })
            })
            .collect()
    }

    /// Append a batch of items to an existing order
    pub async fn create_order_item_batch(
        &self,
        order_id: &str,
        entries: &[OrderItemEntry],
    ) -> OrderResult<OrderItemBatch> {
        if self.repos.orders.find_by_id(order_id).await?.is_none() {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        let prepared = self.prepare_items(entries).await?;
        self.insert_prepared(order_id, prepared).await
    }

    /// `POST /orderItems`
    ///
    /// Without `order_id` a new order is opened for `table_id`; otherwise
    /// the entries are appended to the given order.
    pub async fn submit_batch(&self, pack: OrderItemPack) -> OrderResult<OrderItemBatch> {
        if let Some(order_id) = pack.order_id.as_deref() {
            return self.create_order_item_batch(order_id, &pack.order_items).await;
        }

        if let Some(table_id) = &pack.table_id {
            self.require_table(table_id).await?;
        }
        let prepared = self.prepare_items(&pack.order_items).await?;

        let order_id = self
            .create_order_for_batch(pack.table_id, now_millis())
            .await?;

        match self.insert_prepared(&order_id, prepared).await {
            Ok(batch) => Ok(batch),
            Err(e) => {
                // 新订单不能以空订单形式留下
                match self.repos.orders.delete_if_empty(&order_id).await {
                    Ok(_) => tracing::warn!(order_id = %order_id, error = %e, "Batch insert failed, empty order removed"),
                    Err(cleanup) => tracing::error!(
                        order_id = %order_id,
                        error = %e,
                        cleanup_error = %cleanup,
                        "Batch insert failed and empty order could not be removed"
                    ),
                }
                Err(e)
            }
        }
    }

    async fn insert_prepared(
        &self,
        order_id: &str,
        prepared: Vec<PreparedItem>,
    ) -> OrderResult<OrderItemBatch> {
        let now = now_millis();
        let items: Vec<OrderItem> = prepared
            .into_iter()
            .map(|p| p.into_order_item(order_id, now))
            .collect();

        let order_items = self
            .repos
            .order_items
            .insert_batch(order_id, items)
            .await
            .map_err(|e| not_found_as(e, || OrderError::OrderNotFound(order_id.to_string())))?;

        tracing::info!(order_id = %order_id, count = order_items.len(), "Order items created");
        Ok(OrderItemBatch {
            order_id: order_id.to_string(),
            order_items,
        })
    }

    /// Delete an item; the order goes with its last item
    pub async fn delete_order_item(&self, order_item_id: &str) -> OrderResult<DeleteOutcome> {
        let outcome = self
            .repos
            .order_items
            .delete_cascade(order_item_id)
            .await?
            .ok_or_else(|| OrderError::ItemNotFound(order_item_id.to_string()))?;

        match &outcome {
            DeleteOutcome::OrderDeleted { order_id, .. } => {
                tracing::info!(order_item_id = %order_item_id, order_id = %order_id, "Last item deleted, order removed");
            }
            DeleteOutcome::ItemDeleted {
                order_id,
                remaining_count,
                ..
            } => {
                tracing::info!(
                    order_item_id = %order_item_id,
                    order_id = %order_id,
                    remaining = remaining_count,
                    "Order item deleted"
                );
            }
        }
        Ok(outcome)
    }

    /// Patch an item from the request body
    ///
    /// `unit_price` is normalized; `food_id` must resolve. The parent order
    /// never changes.
    pub async fn update_order_item(
        &self,
        order_item_id: &str,
        patch: OrderItemUpdate,
    ) -> OrderResult<OrderItem> {
        if patch.is_empty() {
            return Err(OrderError::InvalidOperation("no fields to update".into()));
        }
        if let Some(quantity) = patch.quantity {
            check_quantity(quantity).map_err(OrderError::InvalidOperation)?;
        }
        let unit_price = match patch.unit_price {
            Some(price) => Some(
                validate_price(price)
                    .map_err(|e| OrderError::InvalidOperation(format!("unit_price: {}", e)))?,
            ),
            None => None,
        };
        if let Some(food_id) = &patch.food_id {
            if self.repos.foods.find_by_id(food_id).await?.is_none() {
                return Err(OrderError::FoodNotFound(food_id.clone()));
            }
        }

        let changes = OrderItemChanges {
            quantity: patch.quantity,
            unit_price,
            food_id: patch.food_id,
        };
        self.repos
            .order_items
            .update(order_item_id, changes)
            .await?
            .ok_or_else(|| OrderError::ItemNotFound(order_item_id.to_string()))
    }

    async fn require_table(&self, table_id: &str) -> OrderResult<()> {
        match self.repos.tables.find_by_id(table_id).await? {
            Some(_) => Ok(()),
            None => Err(OrderError::TableNotFound(table_id.to_string())),
        }
    }
}

fn not_found_as(err: RepoError, f: impl FnOnce() -> OrderError) -> OrderError {
    match err {
        RepoError::NotFound(_) => f(),
        other => other.into(),
    }
}
