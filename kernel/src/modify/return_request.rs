use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ReturnRequest, ReturnRequestStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReturnRequestModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        request: &ReturnRequest,
    ) -> error_stack::Result<(), KernelError>;

    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        request: &ReturnRequest,
        expected: &ReturnRequestStatus,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReturnRequestModifier:
    'static + Sync + Send + DependOnDatabaseConnection
{
    type ReturnRequestModifier: ReturnRequestModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn return_request_modifier(&self) -> &Self::ReturnRequestModifier;
}
