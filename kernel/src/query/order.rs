use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Order, OrderId, OrderStatus, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError>;

    /// Orders borrowed by `user_id`. An empty `statuses` slice matches every status.
    async fn find_by_borrower(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<Order>, KernelError>;

    /// Orders on products lent by `lender_id`.
    async fn find_by_lender(
        &self,
        con: &mut Self::Transaction,
        lender_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError>;
}

pub trait DependOnOrderQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderQuery: OrderQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_query(&self) -> &Self::OrderQuery;
}
