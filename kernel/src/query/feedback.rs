use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Feedback, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait FeedbackQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_given_by(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError>;

    async fn find_given_to(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError>;
}

pub trait DependOnFeedbackQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type FeedbackQuery: FeedbackQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn feedback_query(&self) -> &Self::FeedbackQuery;
}
