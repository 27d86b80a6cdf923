use error_stack::Report;

use kernel::interface::query::FeedbackQuery;
use kernel::interface::update::FeedbackModifier;
use kernel::prelude::entity::{Feedback, FeedbackId, UserId};
use kernel::KernelError;

use crate::database::memory::table::{Index, Tables};
use crate::database::memory::MemoryTransaction;

pub struct InMemoryFeedbackRepository;

impl Tables {
    fn feedbacks_in(&self, index: &Index<UserId, FeedbackId>, user_id: &UserId) -> Vec<Feedback> {
        let mut found: Vec<Feedback> = index
            .get(user_id)
            .filter_map(|id| self.feedbacks.get(id))
            .cloned()
            .collect();
        found.sort_by_key(|feedback| *feedback.created_at().as_ref());
        found
    }

    fn insert_feedback(&mut self, feedback: Feedback) -> error_stack::Result<(), KernelError> {
        let id = feedback.id().clone();
        if self.feedbacks.contains_key(&id) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("feedback {} already exists", id.as_ref())));
        }
        self.feedbacks_by_giver
            .insert(feedback.given_by().clone(), id.clone());
        self.feedbacks_by_receiver
            .insert(feedback.given_to().clone(), id.clone());
        self.feedbacks.insert(id, feedback);
        Ok(())
    }
}

#[async_trait::async_trait]
impl FeedbackQuery for InMemoryFeedbackRepository {
    type Transaction = MemoryTransaction;
    async fn find_given_by(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        let tables = con.tables();
        Ok(tables.feedbacks_in(&tables.feedbacks_by_giver, user_id))
    }

    async fn find_given_to(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        let tables = con.tables();
        Ok(tables.feedbacks_in(&tables.feedbacks_by_receiver, user_id))
    }
}

#[async_trait::async_trait]
impl FeedbackModifier for InMemoryFeedbackRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?.insert_feedback(feedback.clone())
    }
}
