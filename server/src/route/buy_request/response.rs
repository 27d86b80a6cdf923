use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::BuyRequestDetailDto;
use kernel::prelude::entity::BuyRequestStatus;

use crate::controller::Exhaust;
use crate::response::{CreatedResponse, ProductResponse};

#[derive(Debug, Serialize)]
pub struct BuyRequestResponse {
    id: Uuid,
    product_id: Uuid,
    requested_by: Uuid,
    status: BuyRequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    product: Option<ProductResponse>,
}

impl From<BuyRequestDetailDto> for BuyRequestResponse {
    fn from(value: BuyRequestDetailDto) -> Self {
        let BuyRequestDetailDto { request, product } = value;
        Self {
            id: request.id,
            product_id: request.product_id,
            requested_by: request.requested_by,
            status: request.status,
            created_at: request.created_at,
            product: product.map(ProductResponse::from),
        }
    }
}

impl IntoResponse for BuyRequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `order_id` is set when the request was approved.
#[derive(Debug, Serialize)]
pub struct ResolvedBuyRequestResponse {
    order_id: Option<Uuid>,
}

impl IntoResponse for ResolvedBuyRequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct BuyRequestPresenter;

impl Exhaust<Uuid> for BuyRequestPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: Uuid) -> Self::To {
        CreatedResponse::new(input)
    }
}

impl Exhaust<Option<Uuid>> for BuyRequestPresenter {
    type To = ResolvedBuyRequestResponse;
    fn emit(&self, input: Option<Uuid>) -> Self::To {
        ResolvedBuyRequestResponse { order_id: input }
    }
}

impl Exhaust<BuyRequestDetailDto> for BuyRequestPresenter {
    type To = BuyRequestResponse;
    fn emit(&self, input: BuyRequestDetailDto) -> Self::To {
        BuyRequestResponse::from(input)
    }
}

impl Exhaust<Vec<BuyRequestDetailDto>> for BuyRequestPresenter {
    type To = Json<Vec<BuyRequestResponse>>;
    fn emit(&self, input: Vec<BuyRequestDetailDto>) -> Self::To {
        Json(input.into_iter().map(BuyRequestResponse::from).collect())
    }
}
