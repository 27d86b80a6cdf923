use std::ops::{Deref, DerefMut};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBuyRequestQuery, DependOnCategoryQuery, DependOnFeedbackQuery, DependOnOrderQuery,
    DependOnProductQuery, DependOnReturnRequestQuery,
};
use kernel::interface::update::{
    DependOnBuyRequestModifier, DependOnFeedbackModifier, DependOnOrderModifier,
    DependOnReturnRequestModifier,
};
use kernel::KernelError;

use crate::config::DatabaseConfig;
use crate::database::timed;
use crate::error::ConvertError;

pub use self::{buy_request::*, catalog::*, feedback::*, order::*, return_request::*};

mod buy_request;
mod catalog;
mod feedback;
mod order;
mod return_request;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl PostgresDatabase {
    pub async fn new(config: &DatabaseConfig) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(config.operation_timeout())
            .connect(config.url())
            .await
            .convert_error()?;
        Ok(Self {
            pool,
            timeout: config.operation_timeout(),
        })
    }

    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .convert_error()?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

/// Open PostgreSQL transaction. Dropping it without commit rolls back.
pub struct PostgresTransaction {
    inner: sqlx::Transaction<'static, Postgres>,
    timeout: Duration,
}

impl PostgresTransaction {
    pub(in crate::database) fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let inner = timed(self.timeout, async { self.pool.begin().await.convert_error() }).await?;
        Ok(PostgresTransaction {
            inner,
            timeout: self.timeout,
        })
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let PostgresTransaction { inner, timeout } = self;
        timed(timeout, async move { inner.commit().await.convert_error() }).await
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        let PostgresTransaction { inner, timeout } = self;
        timed(timeout, async move { inner.rollback().await.convert_error() }).await
    }
}

impl DependOnProductQuery for PostgresDatabase {
    type ProductQuery = PostgresCatalogRepository;
    fn product_query(&self) -> &Self::ProductQuery {
        &PostgresCatalogRepository
    }
}

impl DependOnCategoryQuery for PostgresDatabase {
    type CategoryQuery = PostgresCatalogRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &PostgresCatalogRepository
    }
}

impl DependOnBuyRequestQuery for PostgresDatabase {
    type BuyRequestQuery = PostgresBuyRequestRepository;
    fn buy_request_query(&self) -> &Self::BuyRequestQuery {
        &PostgresBuyRequestRepository
    }
}

impl DependOnBuyRequestModifier for PostgresDatabase {
    type BuyRequestModifier = PostgresBuyRequestRepository;
    fn buy_request_modifier(&self) -> &Self::BuyRequestModifier {
        &PostgresBuyRequestRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnReturnRequestQuery for PostgresDatabase {
    type ReturnRequestQuery = PostgresReturnRequestRepository;
    fn return_request_query(&self) -> &Self::ReturnRequestQuery {
        &PostgresReturnRequestRepository
    }
}

impl DependOnReturnRequestModifier for PostgresDatabase {
    type ReturnRequestModifier = PostgresReturnRequestRepository;
    fn return_request_modifier(&self) -> &Self::ReturnRequestModifier {
        &PostgresReturnRequestRepository
    }
}

impl DependOnFeedbackQuery for PostgresDatabase {
    type FeedbackQuery = PostgresFeedbackRepository;
    fn feedback_query(&self) -> &Self::FeedbackQuery {
        &PostgresFeedbackRepository
    }
}

impl DependOnFeedbackModifier for PostgresDatabase {
    type FeedbackModifier = PostgresFeedbackRepository;
    fn feedback_modifier(&self) -> &Self::FeedbackModifier {
        &PostgresFeedbackRepository
    }
}

/// Catalog rows for repository tests. The lending lifecycle never writes them.
#[cfg(test)]
pub(in crate::database) mod fixture {
    use rust_decimal::Decimal;
    use sqlx::PgConnection;
    use uuid::Uuid;

    use kernel::prelude::entity::{
        Category, CategoryId, CategoryName, CategoryPrice, CategorySecurity, Product,
        ProductDescription, ProductId, ProductName, UserId,
    };
    use kernel::KernelError;

    use crate::config::DatabaseConfig;
    use crate::database::PostgresDatabase;
    use crate::error::ConvertError;

    pub async fn database() -> error_stack::Result<PostgresDatabase, KernelError> {
        let db = PostgresDatabase::new(&DatabaseConfig::from_env()?).await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn seed(
        con: &mut PgConnection,
        lender: &UserId,
    ) -> error_stack::Result<(Category, Product), KernelError> {
        let category = Category::new(
            CategoryId::new(Uuid::new_v4()),
            CategoryName::new("tools"),
            CategoryPrice::new(Decimal::new(1250, 2)),
            CategorySecurity::new(Decimal::new(4000, 2)),
        );
        let product = Product::new(
            ProductId::new(Uuid::new_v4()),
            lender.clone(),
            category.id().clone(),
            true,
            ProductName::new("ladder"),
            ProductDescription::new("aluminium, 3m"),
        );
        // language=postgresql
        sqlx::query("INSERT INTO categories (id, name, price, security) VALUES ($1, $2, $3, $4)")
            .bind(category.id().as_ref())
            .bind(category.name().as_ref())
            .bind(category.price().as_ref())
            .bind(category.security().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO products (id, lender_id, category_id, is_available, name, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id().as_ref())
        .bind(product.lender_id().as_ref())
        .bind(product.category_id().as_ref())
        .bind(product.is_available())
        .bind(product.name().as_ref())
        .bind(product.description().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        Ok((category, product))
    }
}
