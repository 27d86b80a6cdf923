mod amount;
mod date;
mod id;
mod status;

pub use self::{amount::*, date::*, id::*, status::*};
use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::{CreatedAt, ProductId, UserId};

/// An active or finished loan. `user_id` is the borrower.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Order {
    id: OrderId,
    product_id: ProductId,
    user_id: UserId,
    start_date: StartDate,
    end_date: Option<EndDate>,
    total_amount: TotalAmount,
    security_amount: SecurityAmount,
    status: OrderStatus,
    created_at: CreatedAt<Order>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        product_id: ProductId,
        user_id: UserId,
        start_date: StartDate,
        end_date: Option<EndDate>,
        total_amount: TotalAmount,
        security_amount: SecurityAmount,
        status: OrderStatus,
        created_at: CreatedAt<Order>,
    ) -> Self {
        Self {
            id,
            product_id,
            user_id,
            start_date,
            end_date,
            total_amount,
            security_amount,
            status,
            created_at,
        }
    }

    pub fn is_borrowed_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
