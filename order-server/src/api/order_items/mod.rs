//! Order Item API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /orderItems | GET | 所有订单明细 |
//! | /orderItems | POST | 批量下单 (必要时新建订单) |
//! | /orderItems/{orderItem_id} | GET / PATCH / DELETE | 单条明细; 删除最后一条时订单一并删除 |
//! | /orderItems-order/{order_id} | GET | 订单账单视图 |
//! | /orderItems-order | GET | 所有订单的账单视图 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orderItems", get(handler::list).post(handler::create))
        .route(
            "/orderItems/{order_item_id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/orderItems-order", get(handler::compose_all))
        .route("/orderItems-order/{order_id}", get(handler::compose_by_order))
}
