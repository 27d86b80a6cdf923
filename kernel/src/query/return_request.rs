use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ReturnRequest, ReturnRequestId, ReturnRequestStatus, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReturnRequestQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ReturnRequestId,
    ) -> error_stack::Result<Option<ReturnRequest>, KernelError>;

    async fn find_by_status(
        &self,
        con: &mut Self::Transaction,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError>;

    /// Requests in `status` whose underlying order is borrowed by `borrower_id`.
    async fn find_by_borrower(
        &self,
        con: &mut Self::Transaction,
        borrower_id: &UserId,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError>;
}

pub trait DependOnReturnRequestQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReturnRequestQuery: ReturnRequestQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn return_request_query(&self) -> &Self::ReturnRequestQuery;
}
