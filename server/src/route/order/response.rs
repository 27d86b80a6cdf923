use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{OrderDetailDto, OrderDto};
use kernel::prelude::entity::OrderStatus;

use crate::controller::Exhaust;
use crate::response::ProductResponse;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    end_date: Option<OffsetDateTime>,
    total_amount: Decimal,
    security_amount: Decimal,
    status: OrderStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    product: Option<ProductResponse>,
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            user_id: value.user_id,
            start_date: value.start_date,
            end_date: value.end_date,
            total_amount: value.total_amount,
            security_amount: value.security_amount,
            status: value.status,
            created_at: value.created_at,
            product: None,
        }
    }
}

impl From<OrderDetailDto> for OrderResponse {
    fn from(value: OrderDetailDto) -> Self {
        let OrderDetailDto { order, product } = value;
        Self {
            product: product.map(ProductResponse::from),
            ..Self::from(order)
        }
    }
}

pub struct OrderPresenter;

impl Exhaust<()> for OrderPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Vec<OrderDetailDto>> for OrderPresenter {
    type To = Json<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<OrderDetailDto>) -> Self::To {
        Json(input.into_iter().map(OrderResponse::from).collect())
    }
}
