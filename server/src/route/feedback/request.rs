use serde::Deserialize;
use uuid::Uuid;

use application::transfer::GiveFeedbackDto;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GiveFeedbackRequest {
    order_id: Uuid,
    rating: i16,
    text: String,
}

pub struct FeedbackTransformer;

impl Intake<GiveFeedbackRequest> for FeedbackTransformer {
    type To = GiveFeedbackDto;
    fn emit(&self, input: GiveFeedbackRequest) -> Self::To {
        GiveFeedbackDto {
            order_id: input.order_id,
            rating: input.rating,
            text: input.text,
        }
    }
}
