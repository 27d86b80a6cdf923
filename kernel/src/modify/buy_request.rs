use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BuyRequest, BuyRequestStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BuyRequestModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        request: &BuyRequest,
    ) -> error_stack::Result<(), KernelError>;

    /// Persists `request.status()` only if the stored status is still `expected`.
    /// A missing record or a different stored status fails with `Concurrency`.
    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        request: &BuyRequest,
        expected: &BuyRequestStatus,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBuyRequestModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BuyRequestModifier: BuyRequestModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn buy_request_modifier(&self) -> &Self::BuyRequestModifier;
}
