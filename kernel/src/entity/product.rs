mod id;
mod name;

pub use self::{id::*, name::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::{CategoryId, UserId};

/// Catalog record consumed read-only by the lending lifecycle.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Product {
    id: ProductId,
    lender_id: UserId,
    category_id: CategoryId,
    is_available: bool,
    name: ProductName,
    description: ProductDescription,
}

impl Product {
    pub fn new(
        id: ProductId,
        lender_id: UserId,
        category_id: CategoryId,
        is_available: bool,
        name: ProductName,
        description: ProductDescription,
    ) -> Self {
        Self {
            id,
            lender_id,
            category_id,
            is_available,
            name,
            description,
        }
    }

    pub fn is_lent_by(&self, user_id: &UserId) -> bool {
        &self.lender_id == user_id
    }
}
