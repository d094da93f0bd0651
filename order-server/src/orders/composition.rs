//! Order Composition
//!
//! Builds the billing view of one order (or of every order):
//!
//! ```text
//! order_item ─┬─ join_food  ──> FoodJoined
//!             ├─ join_order ──> OrderJoined
//!             ├─ join_table ──> OrderItemRow
//!             └─ group_by_order ──> OrderSummary
//! ```
//!
//! All joins are left joins: a missing food, order or table keeps the
//! item row and leaves the projected fields empty. Nothing is written.

use std::collections::{HashMap, HashSet};

use shared::models::{DiningTable, Food, Order, OrderItem, OrderItemRow, OrderSummary};

use super::error::{OrderError, OrderResult};
use super::money::{line_total, sum_money, to_f64};
use crate::core::config::BillingMode;
use crate::db::repository::Repositories;

/// Item row after the food join
#[derive(Debug, Clone, PartialEq)]
pub struct FoodJoined {
    pub item: OrderItem,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub price: Option<f64>,
}

/// Item row after the order join
#[derive(Debug, Clone, PartialEq)]
pub struct OrderJoined {
    pub row: FoodJoined,
    pub order_id: Option<String>,
    /// The order's table reference, resolved by [`join_table`]
    pub table_ref: Option<String>,
}

/// Left-join items with their food
pub fn join_food(items: Vec<OrderItem>, foods: &HashMap<String, Food>) -> Vec<FoodJoined> {
    items
        .into_iter()
        .map(|item| {
            let food = foods.get(&item.food_id);
            FoodJoined {
                food_name: food.map(|f| f.name.clone()),
                food_image: food.map(|f| f.food_image.clone()),
                price: food.map(|f| f.price),
                item,
            }
        })
        .collect()
}

/// Left-join rows with their parent order
pub fn join_order(rows: Vec<FoodJoined>, orders: &HashMap<String, Order>) -> Vec<OrderJoined> {
    rows.into_iter()
        .map(|row| {
            let order = orders.get(&row.item.order_id);
            OrderJoined {
                order_id: order.map(|o| o.order_id.clone()),
                table_ref: order.and_then(|o| o.table_id.clone()),
                row,
            }
        })
        .collect()
}

/// Left-join rows with the table of their order
pub fn join_table(rows: Vec<OrderJoined>, tables: &HashMap<String, DiningTable>) -> Vec<OrderItemRow> {
    rows.into_iter()
        .map(|joined| {
            let table = joined.table_ref.as_ref().and_then(|id| tables.get(id));
            let FoodJoined {
                item,
                food_name,
                food_image,
                price,
            } = joined.row;
            OrderItemRow {
                order_item_id: item.order_item_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                food_id: item.food_id,
                food_name,
                food_image,
                price,
                amount: None,
                order_id: joined.order_id,
                table_id: table.map(|t| t.table_id.clone()),
                table_number: table.map(|t| t.table_number),
            }
        })
        .collect()
}

/// Amount a row adds to `payment_due`; `Ok(None)` when the food is missing
fn row_amount(row: &OrderItemRow, mode: BillingMode) -> OrderResult<Option<f64>> {
    let Some(price) = row.price else {
        return Ok(None);
    };
    match mode {
        BillingMode::PerRow => Ok(Some(price)),
        BillingMode::PriceTimesQuantity => line_total(price, i64::from(row.quantity))
            .map(|total| Some(to_f64(total)))
            .ok_or_else(|| OrderError::AmountOverflow(row.order_id.clone())),
    }
}

/// Group joined rows by order id
///
/// Groups keep the order in which their key first appears. Table fields
/// come from the first row of the group. Fails with
/// [`OrderError::AmountOverflow`] when a total leaves `Decimal`'s range.
pub fn group_by_order(rows: Vec<OrderItemRow>, mode: BillingMode) -> OrderResult<Vec<OrderSummary>> {
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut groups: Vec<OrderSummary> = Vec::new();

    for mut row in rows {
        row.amount = row_amount(&row, mode)?;
        let slot = *index.entry(row.order_id.clone()).or_insert_with(|| {
            groups.push(OrderSummary {
                order_id: row.order_id.clone(),
                table_id: row.table_id.clone(),
                table_number: row.table_number,
                payment_due: 0.0,
                total_count: 0,
                order_items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].order_items.push(row);
    }

    for group in &mut groups {
        group.total_count = group.order_items.len();
        group.payment_due = sum_money(group.order_items.iter().map(|r| r.amount.unwrap_or(0.0)))
            .ok_or_else(|| OrderError::AmountOverflow(group.order_id.clone()))?;
    }
    Ok(groups)
}

/// Order composition aggregator
#[derive(Clone)]
pub struct OrderComposer {
    repos: Repositories,
    billing_mode: BillingMode,
}

impl OrderComposer {
    pub fn new(repos: Repositories, billing_mode: BillingMode) -> Self {
        Self {
            repos,
            billing_mode,
        }
    }

    pub fn billing_mode(&self) -> BillingMode {
        self.billing_mode
    }

    /// Compose the billing view of `order_id`, or of every order when `None`
    ///
    /// An order without items yields an empty list.
    pub async fn compose(&self, order_id: Option<&str>) -> OrderResult<Vec<OrderSummary>> {
        let items = self.repos.order_items.find_by_order(order_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let food_ids = distinct(items.iter().map(|i| &i.food_id));
        let order_ids = distinct(items.iter().map(|i| &i.order_id));

        let (foods, orders) = futures::try_join!(
            self.repos.foods.find_by_ids(food_ids),
            self.repos.orders.find_by_ids(order_ids),
        )?;
        let foods: HashMap<String, Food> =
            foods.into_iter().map(|f| (f.food_id.clone(), f)).collect();
        let orders: HashMap<String, Order> =
            orders.into_iter().map(|o| (o.order_id.clone(), o)).collect();

        let table_ids = distinct(orders.values().filter_map(|o| o.table_id.as_ref()));
        let tables: HashMap<String, DiningTable> = self
            .repos
            .tables
            .find_by_ids(table_ids)
            .await?
            .into_iter()
            .map(|t| (t.table_id.clone(), t))
            .collect();

        let rows = join_table(join_order(join_food(items, &foods), &orders), &tables);
        let summaries = group_by_order(rows, self.billing_mode)?;

        tracing::debug!(
            order_id = ?order_id,
            groups = summaries.len(),
            "Order view composed"
        );
        Ok(summaries)
    }
}

fn distinct<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, order_id: &str, food_id: &str, quantity: i32) -> OrderItem {
        OrderItem {
            order_item_id: id.into(),
            quantity,
            unit_price: 0.0,
            food_id: food_id.into(),
            order_id: order_id.into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn food(id: &str, price: f64) -> Food {
        Food {
            food_id: id.into(),
            name: format!("food-{id}"),
            price,
            food_image: format!("{id}.png"),
            menu_id: "m1".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn order(id: &str, table_id: Option<&str>) -> Order {
        Order {
            order_id: id.into(),
            order_date: 0,
            table_id: table_id.map(Into::into),
            item_count: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn table(id: &str, number: i32) -> DiningTable {
        DiningTable {
            table_id: id.into(),
            number_of_guests: 4,
            table_number: number,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn by_id<T, F: Fn(&T) -> String>(values: Vec<T>, key: F) -> HashMap<String, T> {
        values.into_iter().map(|v| (key(&v), v)).collect()
    }

    fn compose_snapshot(
        items: Vec<OrderItem>,
        foods: Vec<Food>,
        orders: Vec<Order>,
        tables: Vec<DiningTable>,
        mode: BillingMode,
    ) -> OrderResult<Vec<OrderSummary>> {
        let foods = by_id(foods, |f| f.food_id.clone());
        let orders = by_id(orders, |o| o.order_id.clone());
        let tables = by_id(tables, |t| t.table_id.clone());
        group_by_order(
            join_table(join_order(join_food(items, &foods), &orders), &tables),
            mode,
        )
    }

    #[test]
    fn test_join_food_keeps_unmatched_rows() {
        let foods = by_id(vec![food("f1", 5.0)], |f| f.food_id.clone());
        let rows = join_food(vec![item("i1", "o1", "f1", 1), item("i2", "o1", "gone", 1)], &foods);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].food_name.as_deref(), Some("food-f1"));
        assert_eq!(rows[0].price, Some(5.0));
        assert_eq!(rows[1].food_name, None);
        assert_eq!(rows[1].price, None);
    }

    #[test]
    fn test_single_order_summary() {
        let summaries = compose_snapshot(
            vec![item("i1", "o1", "f1", 2), item("i2", "o1", "f2", 3)],
            vec![food("f1", 10.0), food("f2", 3.0)],
            vec![order("o1", Some("t1"))],
            vec![table("t1", 7)],
            BillingMode::PerRow,
        )
        .unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.order_id.as_deref(), Some("o1"));
        assert_eq!(s.table_id.as_deref(), Some("t1"));
        assert_eq!(s.table_number, Some(7));
        assert_eq!(s.total_count, 2);
        // per-row: quantities are ignored
        assert_eq!(s.payment_due, 13.0);
        assert_eq!(s.order_items[0].amount, Some(10.0));
    }

    #[test]
    fn test_price_times_quantity_mode() {
        let summaries = compose_snapshot(
            vec![item("i1", "o1", "f1", 2), item("i2", "o1", "f2", 3)],
            vec![food("f1", 10.0), food("f2", 0.1)],
            vec![order("o1", None)],
            vec![],
            BillingMode::PriceTimesQuantity,
        )
        .unwrap();

        assert_eq!(summaries[0].payment_due, 20.3);
        assert_eq!(summaries[0].order_items[1].amount, Some(0.3));
    }

    #[test]
    fn test_missing_table_keeps_items() {
        let summaries = compose_snapshot(
            vec![item("i1", "o1", "f1", 1)],
            vec![food("f1", 4.5)],
            vec![order("o1", Some("deleted-table"))],
            vec![],
            BillingMode::PerRow,
        )
        .unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.total_count, 1);
        assert_eq!(s.table_id, None);
        assert_eq!(s.table_number, None);
        assert_eq!(s.order_items[0].table_id, None);
        assert_eq!(s.payment_due, 4.5);
    }

    #[test]
    fn test_missing_food_contributes_zero() {
        let summaries = compose_snapshot(
            vec![item("i1", "o1", "f1", 1), item("i2", "o1", "gone", 1)],
            vec![food("f1", 2.25)],
            vec![order("o1", None)],
            vec![],
            BillingMode::PerRow,
        )
        .unwrap();

        assert_eq!(summaries[0].total_count, 2);
        assert_eq!(summaries[0].payment_due, 2.25);
        assert_eq!(summaries[0].order_items[1].amount, None);
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let summaries = compose_snapshot(
            vec![
                item("i1", "o2", "f1", 1),
                item("i2", "o1", "f1", 1),
                item("i3", "o2", "f1", 1),
                item("i4", "orphan", "f1", 1),
            ],
            vec![food("f1", 1.0)],
            vec![order("o1", Some("t1")), order("o2", Some("t2"))],
            vec![table("t1", 1), table("t2", 2)],
            BillingMode::PerRow,
        )
        .unwrap();

        let keys: Vec<_> = summaries.iter().map(|s| s.order_id.clone()).collect();
        assert_eq!(keys, vec![Some("o2".to_string()), Some("o1".to_string()), None]);
        assert_eq!(summaries[0].total_count, 2);
        assert_eq!(summaries[0].table_number, Some(2));
        assert_eq!(summaries[1].total_count, 1);
        // item whose order is gone still shows up, without order fields
        assert_eq!(summaries[2].total_count, 1);
        assert_eq!(summaries[2].order_items[0].order_id, None);
    }

    #[test]
    fn test_huge_prices_fail_instead_of_panicking() {
        // legacy rows written before the price bound existed
        let err = compose_snapshot(
            vec![item("i1", "o1", "f1", 9999)],
            vec![food("f1", 5e28)],
            vec![order("o1", None)],
            vec![],
            BillingMode::PriceTimesQuantity,
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::AmountOverflow(Some(ref id)) if id == "o1"));

        let err = compose_snapshot(
            vec![item("i1", "o1", "f1", 1), item("i2", "o1", "f1", 1)],
            vec![food("f1", 5e28)],
            vec![order("o1", None)],
            vec![],
            BillingMode::PerRow,
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::AmountOverflow(Some(_))));
    }

    #[test]
    fn test_max_price_times_max_quantity_fits() {
        let summaries = compose_snapshot(
            vec![item("i1", "o1", "f1", 9999), item("i2", "o1", "f1", 9999)],
            vec![food("f1", crate::orders::money::MAX_PRICE)],
            vec![order("o1", None)],
            vec![],
            BillingMode::PriceTimesQuantity,
        )
        .unwrap();
        assert_eq!(summaries[0].payment_due, 19_998_000_000.0);
    }

    #[test]
    fn test_distinct_preserves_first_seen() {
        let ids = ["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(distinct(ids.iter()), vec!["b".to_string(), "a".to_string()]);
    }
}
