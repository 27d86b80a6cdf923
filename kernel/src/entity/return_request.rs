mod id;
mod status;

pub use self::{id::*, status::*};
use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::{CreatedAt, OrderId, UserId};

/// Handshake filed by the lender when taking a product back.
/// `requested_by` is the lender; resolution belongs to the order's borrower.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct ReturnRequest {
    id: ReturnRequestId,
    order_id: OrderId,
    requested_by: UserId,
    status: ReturnRequestStatus,
    created_at: CreatedAt<ReturnRequest>,
}

impl ReturnRequest {
    pub fn new(
        id: ReturnRequestId,
        order_id: OrderId,
        requested_by: UserId,
        status: ReturnRequestStatus,
        created_at: CreatedAt<ReturnRequest>,
    ) -> Self {
        Self {
            id,
            order_id,
            requested_by,
            status,
            created_at,
        }
    }
}
