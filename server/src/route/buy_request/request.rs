use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateBuyRequestDto, GetAllBuyRequestDto, GetBuyRequestDto, ResolveBuyRequestDto,
};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateBuyRequestRequest {
    product_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ResolveBuyRequestRequest {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListBuyRequestsRequest {
    product_id: Option<Uuid>,
    status: Option<String>,
}

#[derive(Debug)]
pub struct GetBuyRequestRequest {
    id: Uuid,
}

impl GetBuyRequestRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct BuyRequestTransformer;

impl Intake<CreateBuyRequestRequest> for BuyRequestTransformer {
    type To = CreateBuyRequestDto;
    fn emit(&self, input: CreateBuyRequestRequest) -> Self::To {
        CreateBuyRequestDto {
            product_id: input.product_id,
        }
    }
}

impl Intake<(Uuid, ResolveBuyRequestRequest)> for BuyRequestTransformer {
    type To = ResolveBuyRequestDto;
    fn emit(&self, input: (Uuid, ResolveBuyRequestRequest)) -> Self::To {
        let (id, input) = input;
        ResolveBuyRequestDto {
            id,
            status: input.status,
        }
    }
}

impl Intake<ListBuyRequestsRequest> for BuyRequestTransformer {
    type To = GetAllBuyRequestDto;
    fn emit(&self, input: ListBuyRequestsRequest) -> Self::To {
        GetAllBuyRequestDto {
            product_id: input.product_id,
            status: input.status,
        }
    }
}

impl Intake<GetBuyRequestRequest> for BuyRequestTransformer {
    type To = GetBuyRequestDto;
    fn emit(&self, input: GetBuyRequestRequest) -> Self::To {
        GetBuyRequestDto { id: input.id }
    }
}
