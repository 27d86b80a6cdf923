mod id;
mod price;

pub use self::{id::*, price::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    price: CategoryPrice,
    security: CategorySecurity,
}

impl Category {
    pub fn new(
        id: CategoryId,
        name: CategoryName,
        price: CategoryPrice,
        security: CategorySecurity,
    ) -> Self {
        Self {
            id,
            name,
            price,
            security,
        }
    }
}
