use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnFeedbackQuery, DependOnOrderQuery, DependOnProductQuery, FeedbackQuery, OrderQuery,
    ProductQuery,
};
use kernel::interface::update::{DependOnFeedbackModifier, FeedbackModifier};
use kernel::prelude::entity::{
    Actor, CreatedAt, Feedback, FeedbackId, FeedbackRating, FeedbackText, OrderId,
};
use kernel::KernelError;

use crate::rule::{missing, require_borrower};
use crate::transfer::{FeedbackDto, GiveFeedbackDto};

#[async_trait::async_trait]
pub trait GiveFeedbackService:
    'static
    + Sync
    + Send
    + DependOnOrderQuery
    + DependOnProductQuery
    + DependOnFeedbackModifier
{
    /// Borrower rates the lender of an order they took part in.
    async fn give_feedback(
        &self,
        actor: &Actor,
        dto: GiveFeedbackDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let rating = FeedbackRating::new(dto.rating)?;
        let text = FeedbackText::new(dto.text)?;

        let mut connection = self.database_connection().transact().await?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, &OrderId::new(dto.order_id))
            .await?
            .ok_or_else(|| missing("order", dto.order_id))?;
        let product = self
            .product_query()
            .find_by_id(&mut connection, order.product_id())
            .await?
            .ok_or_else(|| missing("product", order.product_id().as_ref()))?;
        require_borrower(actor, &order)?;
        if product.is_lent_by(actor.user_id()) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable("feedback cannot be given to oneself"));
        }

        let uuid = Uuid::new_v4();
        let feedback = Feedback::new(
            FeedbackId::new(uuid),
            order.id().clone(),
            actor.user_id().clone(),
            product.lender_id().clone(),
            rating,
            text,
            CreatedAt::now(),
        );
        self.feedback_modifier()
            .create(&mut connection, &feedback)
            .await?;
        connection.commit().await?;

        tracing::info!(feedback = %uuid, order = %dto.order_id, "feedback given");
        Ok(uuid)
    }
}

impl<T> GiveFeedbackService for T where
    T: DependOnOrderQuery + DependOnProductQuery + DependOnFeedbackModifier
{
}

#[async_trait::async_trait]
pub trait GetFeedbackService: 'static + Sync + Send + DependOnFeedbackQuery {
    async fn get_given_feedback(
        &self,
        actor: &Actor,
    ) -> error_stack::Result<Vec<FeedbackDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let feedbacks = self
            .feedback_query()
            .find_given_by(&mut connection, actor.user_id())
            .await?;
        Ok(feedbacks.into_iter().map(FeedbackDto::from).collect())
    }

    async fn get_received_feedback(
        &self,
        actor: &Actor,
    ) -> error_stack::Result<Vec<FeedbackDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let feedbacks = self
            .feedback_query()
            .find_given_to(&mut connection, actor.user_id())
            .await?;
        Ok(feedbacks.into_iter().map(FeedbackDto::from).collect())
    }
}

impl<T> GetFeedbackService for T where T: DependOnFeedbackQuery {}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::{Actor, Role, UserId};
    use kernel::KernelError;

    use crate::service::{
        CreateBuyRequestService, GetFeedbackService, GiveFeedbackService,
        ResolveBuyRequestService,
    };
    use crate::transfer::{CreateBuyRequestDto, GiveFeedbackDto, ResolveBuyRequestDto};

    async fn open_loan(
        db: &InMemoryDatabase,
        lender: &Actor,
        borrower: &Actor,
    ) -> error_stack::Result<Uuid, KernelError> {
        let category = db
            .seed_category("music", Decimal::new(12, 0), Decimal::new(40, 0))
            .await;
        let product = db
            .seed_product(lender.user_id().as_ref(), &category, "guitar", true)
            .await;
        let request = db
            .create_buy_request(borrower, CreateBuyRequestDto { product_id: product })
            .await?;
        db.resolve_buy_request(
            lender,
            ResolveBuyRequestDto {
                id: request,
                status: "approved".to_string(),
            },
        )
        .await?
        .ok_or_else(|| error_stack::Report::new(KernelError::Internal))
    }

    fn feedback(order_id: Uuid, rating: i16, text: &str) -> GiveFeedbackDto {
        GiveFeedbackDto {
            order_id,
            rating,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn borrower_rates_lender() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let lender = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        let borrower = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let order = open_loan(&db, &lender, &borrower).await?;

        db.give_feedback(&borrower, feedback(order, 5, "  great amp  "))
            .await?;

        let given = db.get_given_feedback(&borrower).await?;
        assert_eq!(given.len(), 1);
        assert_eq!(given[0].given_to, *lender.user_id().as_ref());
        assert_eq!(given[0].text, "great amp");

        let received = db.get_received_feedback(&lender).await?;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].rating, 5);
        assert!(db.get_received_feedback(&borrower).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_feedback_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let lender = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        let borrower = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let order = open_loan(&db, &lender, &borrower).await?;

        let report = db
            .give_feedback(&borrower, feedback(order, 6, "too good"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
        let report = db
            .give_feedback(&borrower, feedback(order, 3, "   "))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
        let report = db
            .give_feedback(&lender, feedback(order, 1, "not mine"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Authorization);
        let report = db
            .give_feedback(&borrower, feedback(Uuid::new_v4(), 4, "ghost"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);
        assert!(db.get_given_feedback(&borrower).await?.is_empty());
        Ok(())
    }
}
