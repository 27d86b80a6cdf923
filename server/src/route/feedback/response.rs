use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::FeedbackDto;

use crate::controller::Exhaust;
use crate::response::CreatedResponse;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    id: Uuid,
    order_id: Uuid,
    given_by: Uuid,
    given_to: Uuid,
    rating: i16,
    text: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<FeedbackDto> for FeedbackResponse {
    fn from(value: FeedbackDto) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            given_by: value.given_by,
            given_to: value.given_to,
            rating: value.rating,
            text: value.text,
            created_at: value.created_at,
        }
    }
}

pub struct FeedbackPresenter;

impl Exhaust<Uuid> for FeedbackPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Vec<FeedbackDto>> for FeedbackPresenter {
    type To = Json<Vec<FeedbackResponse>>;
    fn emit(&self, input: Vec<FeedbackDto>) -> Self::To {
        Json(input.into_iter().map(FeedbackResponse::from).collect())
    }
}
