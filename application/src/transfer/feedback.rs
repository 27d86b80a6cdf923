use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructFeedback, Feedback};

#[derive(Debug, Clone)]
pub struct FeedbackDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub given_by: Uuid,
    pub given_to: Uuid,
    pub rating: i16,
    pub text: String,
    pub created_at: OffsetDateTime,
}

impl From<Feedback> for FeedbackDto {
    fn from(value: Feedback) -> Self {
        let DestructFeedback {
            id,
            order_id,
            given_by,
            given_to,
            rating,
            text,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            order_id: order_id.into(),
            given_by: given_by.into(),
            given_to: given_to.into(),
            rating: rating.into(),
            text: text.into(),
            created_at: created_at.into(),
        }
    }
}

pub struct GiveFeedbackDto {
    pub order_id: Uuid,
    pub rating: i16,
    pub text: String,
}
