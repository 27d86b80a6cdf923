use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Loan price charged for products of the category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CategoryPrice(Decimal);

impl CategoryPrice {
    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }
}

/// Refundable deposit held for products of the category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CategorySecurity(Decimal);

impl CategorySecurity {
    pub fn new(security: impl Into<Decimal>) -> Self {
        Self(security.into())
    }
}
