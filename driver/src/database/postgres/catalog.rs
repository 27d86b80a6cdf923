use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{CategoryQuery, ProductQuery};
use kernel::prelude::entity::{
    Category, CategoryId, CategoryName, CategoryPrice, CategorySecurity, Product,
    ProductDescription, ProductId, ProductName, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::database::timed;
use crate::error::ConvertError;

pub struct PostgresCatalogRepository;

#[async_trait::async_trait]
impl ProductQuery for PostgresCatalogRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ProductId,
    ) -> error_stack::Result<Option<Product>, KernelError> {
        timed(con.timeout(), PgCatalogInternal::find_product(con, id)).await
    }
}

#[async_trait::async_trait]
impl CategoryQuery for PostgresCatalogRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        timed(con.timeout(), PgCatalogInternal::find_category(con, id)).await
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    lender_id: Uuid,
    category_id: Uuid,
    is_available: bool,
    name: String,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(
            ProductId::new(row.id),
            UserId::new(row.lender_id),
            CategoryId::new(row.category_id),
            row.is_available,
            ProductName::new(row.name),
            ProductDescription::new(row.description),
        )
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    price: Decimal,
    security: Decimal,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::new(
            CategoryId::new(row.id),
            CategoryName::new(row.name),
            CategoryPrice::new(row.price),
            CategorySecurity::new(row.security),
        )
    }
}

pub(in crate::database) struct PgCatalogInternal;

impl PgCatalogInternal {
    async fn find_product(
        con: &mut PgConnection,
        id: &ProductId,
    ) -> error_stack::Result<Option<Product>, KernelError> {
        let row = sqlx::query_as::<_, ProductRow>(
            // language=postgresql
            r#"
            SELECT id, lender_id, category_id, is_available, name, description
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Product::from))
    }

    async fn find_category(
        con: &mut PgConnection,
        id: &CategoryId,
    ) -> error_stack::Result<Option<Category>, KernelError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            // language=postgresql
            r#"
            SELECT id, name, price, security
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Category::from))
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{CategoryQuery, ProductQuery};
    use kernel::prelude::entity::{ProductId, UserId};
    use kernel::KernelError;

    use crate::database::postgres::fixture;
    use crate::database::PostgresCatalogRepository;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_by_id() -> error_stack::Result<(), KernelError> {
        let db = fixture::database().await?;
        let mut connection = db.transact().await?;
        let (category, product) =
            fixture::seed(&mut connection, &UserId::new(Uuid::new_v4())).await?;

        let found = ProductQuery::find_by_id(&PostgresCatalogRepository, &mut connection, product.id())
            .await?;
        assert_eq!(found, Some(product));
        let found =
            CategoryQuery::find_by_id(&PostgresCatalogRepository, &mut connection, category.id())
                .await?;
        assert_eq!(found, Some(category));

        let missing = ProductQuery::find_by_id(
            &PostgresCatalogRepository,
            &mut connection,
            &ProductId::new(Uuid::new_v4()),
        )
        .await?;
        assert!(missing.is_none());
        Ok(())
    }
}
