use uuid::Uuid;

use kernel::prelude::entity::{DestructProduct, Product};

#[derive(Debug, Clone)]
pub struct ProductDto {
    pub id: Uuid,
    pub lender_id: Uuid,
    pub category_id: Uuid,
    pub is_available: bool,
    pub name: String,
    pub description: String,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        let DestructProduct {
            id,
            lender_id,
            category_id,
            is_available,
            name,
            description,
        } = value.into_destruct();
        Self {
            id: id.into(),
            lender_id: lender_id.into(),
            category_id: category_id.into(),
            is_available,
            name: name.into(),
            description: description.into(),
        }
    }
}
