use kernel::interface::query::{CategoryQuery, ProductQuery};
use kernel::prelude::entity::{Category, CategoryId, Product, ProductId};
use kernel::KernelError;

use crate::database::memory::table::Tables;
use crate::database::memory::MemoryTransaction;

/// Read access to the catalog rows seeded through
/// [`InMemoryDatabase`](crate::database::InMemoryDatabase).
pub struct InMemoryCatalogRepository;

#[async_trait::async_trait]
impl ProductQuery for InMemoryCatalogRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ProductId,
    ) -> error_stack::Result<Option<Product>, KernelError> {
        Ok(con.tables().products.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl CategoryQuery for InMemoryCatalogRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        Ok(con.tables().categories.get(id).cloned())
    }
}

impl Tables {
    pub(super) fn put_product(&mut self, product: Product) {
        self.products.insert(product.id().clone(), product);
    }

    pub(super) fn put_category(&mut self, category: Category) {
        self.categories.insert(category.id().clone(), category);
    }
}
