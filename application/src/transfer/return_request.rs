use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructReturnRequest, ReturnRequest, ReturnRequestStatus};

#[derive(Debug, Clone)]
pub struct ReturnRequestDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub requested_by: Uuid,
    pub status: ReturnRequestStatus,
    pub created_at: OffsetDateTime,
}

impl From<ReturnRequest> for ReturnRequestDto {
    fn from(value: ReturnRequest) -> Self {
        let DestructReturnRequest {
            id,
            order_id,
            requested_by,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            order_id: order_id.into(),
            requested_by: requested_by.into(),
            status,
            created_at: created_at.into(),
        }
    }
}

pub struct CreateReturnRequestDto {
    pub order_id: Uuid,
}

pub struct ResolveReturnRequestDto {
    pub id: Uuid,
    pub status: String,
}
