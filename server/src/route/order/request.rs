use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{GetOrderHistoryDto, MarkOrderReturnedDto, UpdateOrderStatusDto};

use crate::controller::Intake;

/// `?status=in_use&status=returned`; no `status` lists everything.
#[derive(Debug, Deserialize)]
pub struct OrderHistoryRequest {
    #[serde(default)]
    status: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    status: String,
}

#[derive(Debug)]
pub struct MarkOrderReturnedRequest {
    id: Uuid,
}

impl MarkOrderReturnedRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct OrderTransformer;

impl Intake<OrderHistoryRequest> for OrderTransformer {
    type To = GetOrderHistoryDto;
    fn emit(&self, input: OrderHistoryRequest) -> Self::To {
        GetOrderHistoryDto {
            statuses: input.status,
        }
    }
}

impl Intake<(Uuid, UpdateOrderStatusRequest)> for OrderTransformer {
    type To = UpdateOrderStatusDto;
    fn emit(&self, input: (Uuid, UpdateOrderStatusRequest)) -> Self::To {
        let (id, input) = input;
        UpdateOrderStatusDto {
            id,
            status: input.status,
        }
    }
}

impl Intake<MarkOrderReturnedRequest> for OrderTransformer {
    type To = MarkOrderReturnedDto;
    fn emit(&self, input: MarkOrderReturnedRequest) -> Self::To {
        MarkOrderReturnedDto { id: input.id }
    }
}
