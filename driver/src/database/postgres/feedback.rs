use error_stack::{Report, ResultExt};
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::FeedbackQuery;
use kernel::interface::update::FeedbackModifier;
use kernel::prelude::entity::{
    CreatedAt, Feedback, FeedbackId, FeedbackRating, FeedbackText, OrderId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::database::timed;
use crate::error::ConvertError;

pub struct PostgresFeedbackRepository;

#[async_trait::async_trait]
impl FeedbackQuery for PostgresFeedbackRepository {
    type Transaction = PostgresTransaction;
    async fn find_given_by(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        timed(con.timeout(), PgFeedbackInternal::find_given_by(con, user_id)).await
    }

    async fn find_given_to(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        timed(con.timeout(), PgFeedbackInternal::find_given_to(con, user_id)).await
    }
}

#[async_trait::async_trait]
impl FeedbackModifier for PostgresFeedbackRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        timed(con.timeout(), PgFeedbackInternal::create(con, feedback)).await
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    order_id: Uuid,
    given_by: Uuid,
    given_to: Uuid,
    rating: i16,
    text: String,
    created_at: OffsetDateTime,
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = Report<KernelError>;
    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let rating = FeedbackRating::new(row.rating).change_context(KernelError::Internal)?;
        let text = FeedbackText::new(row.text).change_context(KernelError::Internal)?;
        Ok(Feedback::new(
            FeedbackId::new(row.id),
            OrderId::new(row.order_id),
            UserId::new(row.given_by),
            UserId::new(row.given_to),
            rating,
            text,
            CreatedAt::new(row.created_at),
        ))
    }
}

pub(in crate::database) struct PgFeedbackInternal;

impl PgFeedbackInternal {
    async fn find_given_by(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, given_by, given_to, rating, text, created_at
            FROM feedbacks
            WHERE given_by = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Feedback::try_from).collect()
    }

    async fn find_given_to(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Feedback>, KernelError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, given_by, given_to, rating, text, created_at
            FROM feedbacks
            WHERE given_to = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Feedback::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        feedback: &Feedback,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO feedbacks (id, order_id, given_by, given_to, rating, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(feedback.id().as_ref())
        .bind(feedback.order_id().as_ref())
        .bind(feedback.given_by().as_ref())
        .bind(feedback.given_to().as_ref())
        .bind(feedback.rating().as_ref())
        .bind(feedback.text().as_ref())
        .bind(feedback.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
