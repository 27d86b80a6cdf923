//! Process-local entity store.
//!
//! Every transaction stages writes on a private copy of the tables. Commit
//! swaps the copy in under a revision check, so a transaction that raced with
//! another committed writer fails with `Concurrency` instead of overwriting it.
//! Secondary indexes live in the same tables and are maintained by the write
//! routines in [`table`], which keeps them consistent with the primary maps.
//!
//! The revision is global, not per record: two overlapping writers conflict
//! even when they touch unrelated rows, and every transaction clones all
//! tables. Fine for tests, not a production store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBuyRequestQuery, DependOnCategoryQuery, DependOnFeedbackQuery, DependOnOrderQuery,
    DependOnProductQuery, DependOnReturnRequestQuery,
};
use kernel::interface::update::{
    DependOnBuyRequestModifier, DependOnFeedbackModifier, DependOnOrderModifier,
    DependOnReturnRequestModifier,
};
use kernel::prelude::entity::{
    Category, CategoryId, CategoryName, CategoryPrice, CategorySecurity, Product,
    ProductDescription, ProductId, ProductName, UserId,
};
use kernel::KernelError;

use crate::config::DatabaseConfig;
use crate::database::timed;

pub use self::{buy_request::*, catalog::*, feedback::*, order::*, return_request::*};
use self::table::Tables;

mod buy_request;
mod catalog;
mod feedback;
mod order;
mod return_request;
mod table;

const DISARMED: usize = usize::MAX;

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    revision: u64,
}

#[derive(Clone)]
pub struct InMemoryDatabase {
    shared: Arc<RwLock<Shared>>,
    writes_left: Arc<AtomicUsize>,
    timeout: Duration,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::with_timeout(DatabaseConfig::DEFAULT_TIMEOUT)
    }
}

impl InMemoryDatabase {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Shared::default())),
            writes_left: Arc::new(AtomicUsize::new(DISARMED)),
            timeout,
        }
    }

    /// Lets the next `writes` staged writes through, then fails every later one
    /// with `StorageUnavailable` until [`InMemoryDatabase::disarm_faults`].
    pub fn fail_after_writes(&self, writes: usize) {
        self.writes_left.store(writes, Ordering::SeqCst);
    }

    pub fn disarm_faults(&self) {
        self.writes_left.store(DISARMED, Ordering::SeqCst);
    }

    pub async fn seed_category(&self, name: &str, price: Decimal, security: Decimal) -> Uuid {
        let id = Uuid::new_v4();
        let category = Category::new(
            CategoryId::new(id),
            CategoryName::new(name),
            CategoryPrice::new(price),
            CategorySecurity::new(security),
        );
        let mut shared = self.shared.write().await;
        shared.tables.put_category(category);
        shared.revision += 1;
        id
    }

    pub async fn seed_product(
        &self,
        lender: &Uuid,
        category: &Uuid,
        name: &str,
        is_available: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let product = Product::new(
            ProductId::new(id),
            UserId::new(*lender),
            CategoryId::new(*category),
            is_available,
            ProductName::new(name),
            ProductDescription::new(format!("{name} for rent")),
        );
        let mut shared = self.shared.write().await;
        shared.tables.put_product(product);
        shared.revision += 1;
        id
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = MemoryTransaction;
    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        let (tables, revision) = timed(self.timeout, async {
            let shared = self.shared.read().await;
            Ok((shared.tables.clone(), shared.revision))
        })
        .await?;
        Ok(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            writes_left: Arc::clone(&self.writes_left),
            timeout: self.timeout,
            base_revision: revision,
            staged: tables,
            dirty: false,
        })
    }
}

pub struct MemoryTransaction {
    shared: Arc<RwLock<Shared>>,
    writes_left: Arc<AtomicUsize>,
    timeout: Duration,
    base_revision: u64,
    staged: Tables,
    dirty: bool,
}

impl MemoryTransaction {
    pub(in crate::database) fn tables(&self) -> &Tables {
        &self.staged
    }

    pub(in crate::database) fn tables_mut(
        &mut self,
    ) -> error_stack::Result<&mut Tables, KernelError> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                DISARMED => Some(DISARMED),
                0 => None,
                left => Some(left - 1),
            })
            .map_err(|_| {
                Report::new(KernelError::StorageUnavailable)
                    .attach_printable("injected write fault")
            })?;
        self.dirty = true;
        Ok(&mut self.staged)
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        if !self.dirty {
            return Ok(());
        }
        let MemoryTransaction {
            shared,
            timeout,
            base_revision,
            staged,
            ..
        } = self;
        timed(timeout, async move {
            let mut shared = shared.write().await;
            if shared.revision != base_revision {
                return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                    "store moved from revision {base_revision} to {}",
                    shared.revision
                )));
            }
            shared.tables = staged;
            shared.revision += 1;
            Ok(())
        })
        .await
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnProductQuery for InMemoryDatabase {
    type ProductQuery = InMemoryCatalogRepository;
    fn product_query(&self) -> &Self::ProductQuery {
        &InMemoryCatalogRepository
    }
}

impl DependOnCategoryQuery for InMemoryDatabase {
    type CategoryQuery = InMemoryCatalogRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &InMemoryCatalogRepository
    }
}

impl DependOnBuyRequestQuery for InMemoryDatabase {
    type BuyRequestQuery = InMemoryBuyRequestRepository;
    fn buy_request_query(&self) -> &Self::BuyRequestQuery {
        &InMemoryBuyRequestRepository
    }
}

impl DependOnBuyRequestModifier for InMemoryDatabase {
    type BuyRequestModifier = InMemoryBuyRequestRepository;
    fn buy_request_modifier(&self) -> &Self::BuyRequestModifier {
        &InMemoryBuyRequestRepository
    }
}

impl DependOnOrderQuery for InMemoryDatabase {
    type OrderQuery = InMemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &InMemoryOrderRepository
    }
}

impl DependOnOrderModifier for InMemoryDatabase {
    type OrderModifier = InMemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &InMemoryOrderRepository
    }
}

impl DependOnReturnRequestQuery for InMemoryDatabase {
    type ReturnRequestQuery = InMemoryReturnRequestRepository;
    fn return_request_query(&self) -> &Self::ReturnRequestQuery {
        &InMemoryReturnRequestRepository
    }
}

impl DependOnReturnRequestModifier for InMemoryDatabase {
    type ReturnRequestModifier = InMemoryReturnRequestRepository;
    fn return_request_modifier(&self) -> &Self::ReturnRequestModifier {
        &InMemoryReturnRequestRepository
    }
}

impl DependOnFeedbackQuery for InMemoryDatabase {
    type FeedbackQuery = InMemoryFeedbackRepository;
    fn feedback_query(&self) -> &Self::FeedbackQuery {
        &InMemoryFeedbackRepository
    }
}

impl DependOnFeedbackModifier for InMemoryDatabase {
    type FeedbackModifier = InMemoryFeedbackRepository;
    fn feedback_modifier(&self) -> &Self::FeedbackModifier {
        &InMemoryFeedbackRepository
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::ProductQuery;
    use kernel::prelude::entity::ProductId;
    use kernel::KernelError;

    use crate::database::{InMemoryCatalogRepository, InMemoryDatabase};

    #[tokio::test]
    async fn later_commit_loses_race() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let category = db.seed_category("games", Decimal::ONE, Decimal::TEN).await;

        let mut first = db.transact().await?;
        let mut second = db.transact().await?;
        first.tables_mut()?;
        second.tables_mut()?;

        first.commit().await?;
        let report = second.commit().await.unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Concurrency);

        let product = db
            .seed_product(&Uuid::new_v4(), &category, "chess", true)
            .await;
        let mut connection = db.transact().await?;
        let found = InMemoryCatalogRepository
            .find_by_id(&mut connection, &ProductId::new(product))
            .await?;
        assert!(found.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn held_lock_times_out_as_unavailable() {
        let db = InMemoryDatabase::with_timeout(Duration::from_millis(10));
        let guard = db.shared.write().await;
        let report = db.transact().await.err().unwrap();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);
        drop(guard);
        assert!(db.transact().await.is_ok());
    }

    #[tokio::test]
    async fn read_only_commit_never_conflicts() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let reader = db.transact().await?;
        let mut writer = db.transact().await?;
        writer.tables_mut()?;
        writer.commit().await?;
        reader.commit().await?;
        Ok(())
    }

    #[tokio::test]
    async fn fault_budget_counts_writes() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        db.fail_after_writes(1);
        let mut connection = db.transact().await?;
        connection.tables_mut()?;
        let report = connection.tables_mut().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);

        db.disarm_faults();
        connection.tables_mut()?;
        Ok(())
    }
}
