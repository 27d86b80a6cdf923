use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{BuyRequest, BuyRequestStatus, DestructBuyRequest};

use crate::transfer::ProductDto;

#[derive(Debug, Clone)]
pub struct BuyRequestDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub requested_by: Uuid,
    pub status: BuyRequestStatus,
    pub created_at: OffsetDateTime,
}

impl From<BuyRequest> for BuyRequestDto {
    fn from(value: BuyRequest) -> Self {
        let DestructBuyRequest {
            id,
            product_id,
            requested_by,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            product_id: product_id.into(),
            requested_by: requested_by.into(),
            status,
            created_at: created_at.into(),
        }
    }
}

/// Buy request together with the product it targets. `product` is `None`
/// when the catalog no longer knows the product.
#[derive(Debug, Clone)]
pub struct BuyRequestDetailDto {
    pub request: BuyRequestDto,
    pub product: Option<ProductDto>,
}

pub struct CreateBuyRequestDto {
    pub product_id: Uuid,
}

pub struct ResolveBuyRequestDto {
    pub id: Uuid,
    pub status: String,
}

pub struct GetBuyRequestDto {
    pub id: Uuid,
}

#[derive(Default)]
pub struct GetAllBuyRequestDto {
    pub product_id: Option<Uuid>,
    pub status: Option<String>,
}
