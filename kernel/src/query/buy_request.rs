use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BuyRequest, BuyRequestId, BuyRequestStatus, ProductId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BuyRequestQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BuyRequestId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError>;

    /// Both filters are conjunctive; `None` matches everything.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        product_id: Option<&ProductId>,
        status: Option<&BuyRequestStatus>,
    ) -> error_stack::Result<Vec<BuyRequest>, KernelError>;

    async fn find_pending(
        &self,
        con: &mut Self::Transaction,
        product_id: &ProductId,
        requested_by: &UserId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError>;
}

pub trait DependOnBuyRequestQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BuyRequestQuery: BuyRequestQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn buy_request_query(&self) -> &Self::BuyRequestQuery;
}
