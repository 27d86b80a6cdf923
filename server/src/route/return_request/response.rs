use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::ReturnRequestDto;
use kernel::prelude::entity::ReturnRequestStatus;

use crate::controller::Exhaust;
use crate::response::CreatedResponse;

#[derive(Debug, Serialize)]
pub struct ReturnRequestResponse {
    id: Uuid,
    order_id: Uuid,
    requested_by: Uuid,
    status: ReturnRequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<ReturnRequestDto> for ReturnRequestResponse {
    fn from(value: ReturnRequestDto) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            requested_by: value.requested_by,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

pub struct ReturnRequestPresenter;

impl Exhaust<()> for ReturnRequestPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<Uuid> for ReturnRequestPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Vec<ReturnRequestDto>> for ReturnRequestPresenter {
    type To = Json<Vec<ReturnRequestResponse>>;
    fn emit(&self, input: Vec<ReturnRequestDto>) -> Self::To {
        Json(input.into_iter().map(ReturnRequestResponse::from).collect())
    }
}
