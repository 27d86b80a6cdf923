mod id;
mod status;

pub use self::{id::*, status::*};
use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::{CreatedAt, ProductId, UserId};

/// A prospective borrower's request to start a loan on a product.
/// Only `status` changes after creation.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct BuyRequest {
    id: BuyRequestId,
    product_id: ProductId,
    requested_by: UserId,
    status: BuyRequestStatus,
    created_at: CreatedAt<BuyRequest>,
}

impl BuyRequest {
    pub fn new(
        id: BuyRequestId,
        product_id: ProductId,
        requested_by: UserId,
        status: BuyRequestStatus,
        created_at: CreatedAt<BuyRequest>,
    ) -> Self {
        Self {
            id,
            product_id,
            requested_by,
            status,
            created_at,
        }
    }
}
