use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{CreateReturnRequestDto, ResolveReturnRequestDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateReturnRequestRequest {
    order_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ResolveReturnRequestRequest {
    status: String,
}

pub struct ReturnRequestTransformer;

impl Intake<CreateReturnRequestRequest> for ReturnRequestTransformer {
    type To = CreateReturnRequestDto;
    fn emit(&self, input: CreateReturnRequestRequest) -> Self::To {
        CreateReturnRequestDto {
            order_id: input.order_id,
        }
    }
}

impl Intake<(Uuid, ResolveReturnRequestRequest)> for ReturnRequestTransformer {
    type To = ResolveReturnRequestDto;
    fn emit(&self, input: (Uuid, ResolveReturnRequestRequest)) -> Self::To {
        let (id, input) = input;
        ResolveReturnRequestDto {
            id,
            status: input.status,
        }
    }
}
