use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{CategoryPrice, CategorySecurity};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct TotalAmount(Decimal);

impl TotalAmount {
    pub fn new(amount: impl Into<Decimal>) -> Self {
        Self(amount.into())
    }
}

impl From<&CategoryPrice> for TotalAmount {
    fn from(price: &CategoryPrice) -> Self {
        Self(*price.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct SecurityAmount(Decimal);

impl SecurityAmount {
    pub fn new(amount: impl Into<Decimal>) -> Self {
        Self(amount.into())
    }
}

impl From<&CategorySecurity> for SecurityAmount {
    fn from(security: &CategorySecurity) -> Self {
        Self(*security.as_ref())
    }
}
