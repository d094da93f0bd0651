//! End-to-end order flows through the HTTP router

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn batch_creates_order_with_rounded_prices() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(1).await;
    let f1 = app.create_food("Dumplings", 9.995).await;
    let f2 = app.create_food("Green tea", 3.001).await;

    let (order_id, item_ids) = app.submit_order(&table_id, &[(&f1, 1), (&f2, 2)]).await;
    assert_eq!(item_ids.len(), 2);

    let (status, order) = app.send("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["table_id"], json!(table_id));
    assert_eq!(order["item_count"], json!(2));

    let (status, items) = app.send("GET", "/orderItems", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let price_of = |food_id: &str| {
        items
            .iter()
            .find(|i| i["food_id"] == json!(food_id))
            .map(|i| i["unit_price"].as_f64().unwrap())
            .unwrap()
    };
    assert_eq!(price_of(&f1), 10.0);
    assert_eq!(price_of(&f2), 3.0);
    assert!(items.iter().all(|i| i["order_id"] == json!(order_id)));
}

#[tokio::test]
async fn deleting_only_item_deletes_order() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(2).await;
    let food = app.create_food("Noodles", 12.5).await;
    let (order_id, item_ids) = app.submit_order(&table_id, &[(&food, 1)]).await;

    let (status, outcome) = app
        .send("DELETE", &format!("/orderItems/{}", item_ids[0]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], json!("order_deleted"));
    assert_eq!(outcome["order_id"], json!(order_id));
    assert_eq!(outcome["message"], json!("Order and all items deleted"));

    let (status, body) = app.send("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!(4001));
}

#[tokio::test]
async fn deleting_one_of_two_items_keeps_order() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(3).await;
    let a = app.create_food("Rice", 2.0).await;
    let b = app.create_food("Soup", 4.0).await;
    let (order_id, item_ids) = app.submit_order(&table_id, &[(&a, 1), (&b, 1)]).await;

    let (status, outcome) = app
        .send("DELETE", &format!("/orderItems/{}", item_ids[0]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], json!("item_deleted"));
    assert_eq!(outcome["remaining_count"], json!(1));

    let (status, _) = app.send("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = app
        .send("GET", &format!("/orderItems-order/{order_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let groups = view.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["total_count"], json!(1));
    assert_eq!(groups[0]["order_items"][0]["order_item_id"], json!(item_ids[1]));
}

#[tokio::test]
async fn concurrent_deletes_leave_no_order_behind() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(4).await;
    let food = app.create_food("Bao", 1.5).await;
    let (order_id, item_ids) = app.submit_order(&table_id, &[(&food, 1), (&food, 1)]).await;

    let lifecycle = app.state.lifecycle.clone();
    let deletes = item_ids.iter().map(|id| {
        let lifecycle = lifecycle.clone();
        let id = id.clone();
        tokio::spawn(async move {
            // 写冲突时事务整体回滚，可安全重试
            let mut last = None;
            for _ in 0..10 {
                match lifecycle.delete_order_item(&id).await {
                    Ok(outcome) => return Some(outcome),
                    Err(e) => last = Some(e.to_string()),
                }
                tokio::task::yield_now().await;
            }
            panic!("delete kept failing: {last:?}");
        })
    });
    let outcomes = futures::future::join_all(deletes).await;
    assert!(outcomes.iter().all(|o| matches!(o, Ok(Some(_)))));

    let repos = &app.state.repos;
    assert_eq!(repos.order_items.count_by_order(&order_id).await.unwrap(), 0);
    assert!(repos.orders.find_by_id(&order_id).await.unwrap().is_none());
}

#[tokio::test]
async fn composed_view_survives_deleted_table() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(5).await;
    let food = app.create_food("Tofu", 6.25).await;
    let (order_id, _) = app.submit_order(&table_id, &[(&food, 3)]).await;

    let (status, view) = app
        .send("GET", &format!("/orderItems-order/{order_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view[0]["table_id"], json!(table_id));
    assert_eq!(view[0]["table_number"], json!(5));

    let (status, _) = app.send("DELETE", &format!("/tables/{table_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = app
        .send("GET", &format!("/orderItems-order/{order_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let group = &view[0];
    assert_eq!(group["order_id"], json!(order_id));
    assert_eq!(group["total_count"], json!(1));
    assert!(group.get("table_id").is_none());
    assert!(group.get("table_number").is_none());
    assert_eq!(group["order_items"][0]["food_name"], json!("Tofu"));
    // per-row billing: quantity is not applied
    assert_eq!(group["payment_due"], json!(6.25));
}

#[tokio::test]
async fn invalid_entry_aborts_batch_without_writes() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(6).await;
    let food = app.create_food("Curry", 8.0).await;

    let (status, body) = app
        .send(
            "POST",
            "/orderItems",
            Some(json!({
                "table_id": table_id,
                "order_items": [
                    { "food_id": food, "quantity": 1 },
                    { "food_id": food }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(4003));
    assert_eq!(body["details"]["index"], json!(1));

    let (_, orders) = app.send("GET", "/orders", None).await;
    assert_eq!(orders, json!([]));
    let (_, items) = app.send("GET", "/orderItems", None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn unknown_food_is_reported_by_index() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(7).await;

    let (status, body) = app
        .send(
            "POST",
            "/orderItems",
            Some(json!({
                "table_id": table_id,
                "order_items": [{ "food_id": "missing", "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("order_items[0]: food missing not found"));
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(8).await;

    let (status, _) = app
        .send(
            "POST",
            "/orderItems",
            Some(json!({ "table_id": table_id, "order_items": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, orders) = app.send("GET", "/orders", None).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn batch_appends_to_existing_order() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(9).await;
    let food = app.create_food("Wonton", 5.0).await;
    let (order_id, _) = app.submit_order(&table_id, &[(&food, 1)]).await;

    let (status, body) = app
        .send(
            "POST",
            "/orderItems",
            Some(json!({
                "order_id": order_id,
                "order_items": [{ "food_id": food, "quantity": 2 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], json!(order_id));

    let (_, order) = app.send("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(order["item_count"], json!(2));

    let (status, _) = app
        .send(
            "POST",
            "/orderItems",
            Some(json!({
                "order_id": "no-such-order",
                "order_items": [{ "food_id": food, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_order_item_uses_request_body() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(10).await;
    let a = app.create_food("Fish", 20.0).await;
    let b = app.create_food("Crab", 30.0).await;
    let (order_id, item_ids) = app.submit_order(&table_id, &[(&a, 1)]).await;

    let (status, item) = app
        .send(
            "PATCH",
            &format!("/orderItems/{}", item_ids[0]),
            Some(json!({ "quantity": 4, "unit_price": 18.005, "food_id": b })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"], json!(4));
    assert_eq!(item["unit_price"], json!(18.01));
    assert_eq!(item["food_id"], json!(b));
    assert_eq!(item["order_id"], json!(order_id));

    let (status, _) = app
        .send("PATCH", "/orderItems/missing", Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/orderItems/{}", item_ids[0]),
            Some(json!({ "food_id": "missing" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_order_requires_existing_table_and_order() {
    let app = TestApp::spawn().await;
    let t1 = app.create_table(11).await;
    let t2 = app.create_table(12).await;

    let (status, order) = app
        .send("POST", "/orders", Some(json!({ "table_id": t1 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = order["order_id"].as_str().unwrap().to_string();

    let (status, order) = app
        .send("PATCH", &format!("/orders/{order_id}"), Some(json!({ "table_id": t2 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["table_id"], json!(t2));

    let (status, body) = app
        .send("PATCH", &format!("/orders/{order_id}"), Some(json!({ "table_id": "nope" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!(7001));

    let (status, _) = app
        .send("PATCH", "/orders/nope", Some(json!({ "table_id": t2 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_order_patch_keeps_table() {
    let app = TestApp::spawn().await;
    let table_id = app.create_table(15).await;
    let (status, order) = app
        .send("POST", "/orders", Some(json!({ "table_id": table_id })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = order["order_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("PATCH", &format!("/orders/{order_id}"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(2));

    let (status, order) = app.send("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["table_id"], json!(table_id));
}

#[tokio::test]
async fn food_price_over_limit_is_rejected() {
    let app = TestApp::spawn().await;
    let payload = |price: f64| {
        json!({
            "name": "Caviar",
            "price": price,
            "food_image": "caviar.png",
            "menu_id": "menu-1"
        })
    };

    let (status, body) = app.send("POST", "/foods", Some(payload(1e30))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let (status, foods) = app.send("GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(foods, json!([]));

    let food_id = app.create_food("Caviar", 1_000_000.0).await;
    let (status, _) = app
        .send("PATCH", &format!("/foods/{food_id}"), Some(json!({ "price": 1_000_000.01 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, food) = app.send("GET", &format!("/foods/{food_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(food["price"], json!(1_000_000.0));
}

#[tokio::test]
async fn compose_all_groups_every_order() {
    let app = TestApp::spawn().await;
    let t1 = app.create_table(13).await;
    let t2 = app.create_table(14).await;
    let food = app.create_food("Pho", 9.0).await;
    let (o1, _) = app.submit_order(&t1, &[(&food, 1), (&food, 1)]).await;
    let (o2, _) = app.submit_order(&t2, &[(&food, 1)]).await;

    let (status, view) = app.send("GET", "/orderItems-order", None).await;
    assert_eq!(status, StatusCode::OK);
    let groups = view.as_array().unwrap();
    assert_eq!(groups.len(), 2);

    let group = |id: &str| groups.iter().find(|g| g["order_id"] == json!(id)).unwrap();
    assert_eq!(group(&o1)["total_count"], json!(2));
    assert_eq!(group(&o1)["payment_due"], json!(18.0));
    assert_eq!(group(&o2)["total_count"], json!(1));
    assert_eq!(group(&o2)["table_number"], json!(14));
}
