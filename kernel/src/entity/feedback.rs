mod id;
mod rating;
mod text;

pub use self::{id::*, rating::*, text::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::{CreatedAt, OrderId, UserId};

/// Rating left by a borrower for the lender of an order.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Feedback {
    id: FeedbackId,
    order_id: OrderId,
    given_by: UserId,
    given_to: UserId,
    rating: FeedbackRating,
    text: FeedbackText,
    created_at: CreatedAt<Feedback>,
}

impl Feedback {
    pub fn new(
        id: FeedbackId,
        order_id: OrderId,
        given_by: UserId,
        given_to: UserId,
        rating: FeedbackRating,
        text: FeedbackText,
        created_at: CreatedAt<Feedback>,
    ) -> Self {
        Self {
            id,
            order_id,
            given_by,
            given_to,
            rating,
            text,
            created_at,
        }
    }
}
