use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructOrder, Order, OrderStatus};

use crate::transfer::ProductDto;

#[derive(Debug, Clone)]
pub struct OrderDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub start_date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub total_amount: Decimal,
    pub security_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: OffsetDateTime,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            product_id,
            user_id,
            start_date,
            end_date,
            total_amount,
            security_amount,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            product_id: product_id.into(),
            user_id: user_id.into(),
            start_date: start_date.into(),
            end_date: end_date.map(Into::into),
            total_amount: total_amount.into(),
            security_amount: security_amount.into(),
            status,
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderDetailDto {
    pub order: OrderDto,
    pub product: Option<ProductDto>,
}

pub struct UpdateOrderStatusDto {
    pub id: Uuid,
    pub status: String,
}

pub struct MarkOrderReturnedDto {
    pub id: Uuid,
}

/// Any-of filter; empty means every status.
#[derive(Default)]
pub struct GetOrderHistoryDto {
    pub statuses: Vec<String>,
}
