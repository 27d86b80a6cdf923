use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::ProductDto;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: Uuid,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    id: Uuid,
    lender_id: Uuid,
    category_id: Uuid,
    is_available: bool,
    name: String,
    description: String,
}

impl From<ProductDto> for ProductResponse {
    fn from(value: ProductDto) -> Self {
        Self {
            id: value.id,
            lender_id: value.lender_id,
            category_id: value.category_id,
            is_available: value.is_available,
            name: value.name,
            description: value.description,
        }
    }
}
