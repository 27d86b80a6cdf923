use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnProductQuery, DependOnReturnRequestQuery, OrderQuery,
    ProductQuery, ReturnRequestQuery,
};
use kernel::interface::update::{DependOnReturnRequestModifier, ReturnRequestModifier};
use kernel::prelude::entity::{
    Actor, CreatedAt, OrderId, OrderStatus, ReturnRequest, ReturnRequestId, ReturnRequestStatus,
};
use kernel::KernelError;

use crate::rule::{missing, require_borrower, require_product_lender};
use crate::service::RequestReturnService;
use crate::transfer::{CreateReturnRequestDto, ResolveReturnRequestDto, ReturnRequestDto};

#[async_trait::async_trait]
pub trait CreateReturnRequestService:
    'static
    + Sync
    + Send
    + DependOnOrderQuery
    + DependOnProductQuery
    + DependOnReturnRequestModifier
    + RequestReturnService
{
    /// Lender asks for the product back. The order moves to `ReturnRequested`
    /// and the pending request is recorded in one transaction.
    async fn create_return_request(
        &self,
        actor: &Actor,
        dto: CreateReturnRequestDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let order_id = OrderId::new(dto.order_id);
        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?
            .ok_or_else(|| missing("order", dto.order_id))?;
        if *order.status() != OrderStatus::InUse {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "order {} is {}, not in use",
                dto.order_id,
                order.status()
            )));
        }
        let product = self
            .product_query()
            .find_by_id(&mut connection, order.product_id())
            .await?
            .ok_or_else(|| missing("product", order.product_id().as_ref()))?;
        require_product_lender(actor, &product)?;

        self.request_return(&mut connection, order).await?;

        let uuid = Uuid::new_v4();
        let request = ReturnRequest::new(
            ReturnRequestId::new(uuid),
            order_id,
            actor.user_id().clone(),
            ReturnRequestStatus::Pending,
            CreatedAt::now(),
        );
        self.return_request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!(return_request = %uuid, order = %dto.order_id, "return requested");
        Ok(uuid)
    }
}

impl<T> CreateReturnRequestService for T where
    T: DependOnOrderQuery
        + DependOnProductQuery
        + DependOnReturnRequestModifier
        + RequestReturnService
{
}

#[async_trait::async_trait]
pub trait ResolveReturnRequestService:
    'static
    + Sync
    + Send
    + DependOnReturnRequestQuery
    + DependOnReturnRequestModifier
    + DependOnOrderQuery
{
    /// Borrower approves or rejects a pending return request. Only the request's
    /// status changes; the order is left for the lender to mark returned.
    async fn resolve_return_request(
        &self,
        actor: &Actor,
        dto: ResolveReturnRequestDto,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let request = self
            .return_request_query()
            .find_by_id(&mut connection, &ReturnRequestId::new(dto.id))
            .await?
            .ok_or_else(|| missing("return request", dto.id))?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, request.order_id())
            .await?
            .ok_or_else(|| missing("order", request.order_id().as_ref()))?;
        require_borrower(actor, &order)?;

        let status = dto.status.parse::<ReturnRequestStatus>()?;
        if !status.is_terminal() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("return requests can only be approved or rejected"));
        }
        if request.status().is_terminal() {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "return request {} is already {}",
                dto.id,
                request.status()
            )));
        }

        let mut request = request;
        request.substitute(|request| *request.status = status);
        self.return_request_modifier()
            .update_status(&mut connection, &request, &ReturnRequestStatus::Pending)
            .await?;
        connection.commit().await?;

        tracing::info!(return_request = %dto.id, %status, "return request resolved");
        Ok(())
    }
}

impl<T> ResolveReturnRequestService for T where
    T: DependOnReturnRequestQuery + DependOnReturnRequestModifier + DependOnOrderQuery
{
}

#[async_trait::async_trait]
pub trait GetReturnRequestService: 'static + Sync + Send + DependOnReturnRequestQuery {
    /// Pending return requests on orders the actor borrowed.
    async fn get_pending_return_requests(
        &self,
        actor: &Actor,
    ) -> error_stack::Result<Vec<ReturnRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .return_request_query()
            .find_by_borrower(
                &mut connection,
                actor.user_id(),
                &ReturnRequestStatus::Pending,
            )
            .await?;
        Ok(requests.into_iter().map(ReturnRequestDto::from).collect())
    }
}

impl<T> GetReturnRequestService for T where T: DependOnReturnRequestQuery {}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::{Actor, OrderStatus, ReturnRequestStatus, Role, UserId};
    use kernel::KernelError;

    use crate::service::{
        CreateBuyRequestService, CreateReturnRequestService, GetOrderService,
        GetReturnRequestService, ResolveBuyRequestService, ResolveReturnRequestService,
    };
    use crate::transfer::{
        CreateBuyRequestDto, CreateReturnRequestDto, GetOrderHistoryDto, ResolveBuyRequestDto,
        ResolveReturnRequestDto,
    };

    struct Loan {
        db: InMemoryDatabase,
        lender: Actor,
        borrower: Actor,
        order: Uuid,
    }

    async fn open_loan() -> error_stack::Result<Loan, KernelError> {
        let db = InMemoryDatabase::default();
        let lender = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        let borrower = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let category = db
            .seed_category("camping", Decimal::new(20, 0), Decimal::new(80, 0))
            .await;
        let product = db
            .seed_product(lender.user_id().as_ref(), &category, "tent", true)
            .await;
        let request = db
            .create_buy_request(&borrower, CreateBuyRequestDto { product_id: product })
            .await?;
        let order = db
            .resolve_buy_request(
                &lender,
                ResolveBuyRequestDto {
                    id: request,
                    status: "approved".to_string(),
                },
            )
            .await?
            .ok_or_else(|| error_stack::Report::new(KernelError::Internal))?;
        Ok(Loan {
            db,
            lender,
            borrower,
            order,
        })
    }

    async fn order_status(loan: &Loan) -> error_stack::Result<OrderStatus, KernelError> {
        let history = loan
            .db
            .get_order_history(&loan.borrower, GetOrderHistoryDto::default())
            .await?;
        Ok(history[0].order.status)
    }

    fn resolve(id: Uuid, status: &str) -> ResolveReturnRequestDto {
        ResolveReturnRequestDto {
            id,
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn create_moves_order_and_files_pending() -> error_stack::Result<(), KernelError> {
        let loan = open_loan().await?;
        let id = loan
            .db
            .create_return_request(&loan.lender, CreateReturnRequestDto { order_id: loan.order })
            .await?;
        assert_eq!(order_status(&loan).await?, OrderStatus::ReturnRequested);

        let pending = loan.db.get_pending_return_requests(&loan.borrower).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
        assert_eq!(pending[0].status, ReturnRequestStatus::Pending);
        assert_eq!(pending[0].requested_by, *loan.lender.user_id().as_ref());

        // Only one open request per order.
        let report = loan
            .db
            .create_return_request(&loan.lender, CreateReturnRequestDto { order_id: loan.order })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidState);
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_product_lender() -> error_stack::Result<(), KernelError> {
        let loan = open_loan().await?;
        let stranger = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        let report = loan
            .db
            .create_return_request(&stranger, CreateReturnRequestDto { order_id: loan.order })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Authorization);

        let report = loan
            .db
            .create_return_request(
                &loan.lender,
                CreateReturnRequestDto {
                    order_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);
        assert_eq!(order_status(&loan).await?, OrderStatus::InUse);
        Ok(())
    }

    #[tokio::test]
    async fn failed_request_write_keeps_order_in_use() -> error_stack::Result<(), KernelError> {
        let loan = open_loan().await?;
        // Order status update succeeds, the return request insert fails.
        loan.db.fail_after_writes(1);
        let report = loan
            .db
            .create_return_request(&loan.lender, CreateReturnRequestDto { order_id: loan.order })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);
        loan.db.disarm_faults();

        assert_eq!(order_status(&loan).await?, OrderStatus::InUse);
        assert!(loan
            .db
            .get_pending_return_requests(&loan.borrower)
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn resolve_is_borrower_only() -> error_stack::Result<(), KernelError> {
        let loan = open_loan().await?;
        let id = loan
            .db
            .create_return_request(&loan.lender, CreateReturnRequestDto { order_id: loan.order })
            .await?;

        // Authorization is checked before the status is even parsed.
        let report = loan
            .db
            .resolve_return_request(&loan.lender, resolve(id, "nonsense"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Authorization);

        let report = loan
            .db
            .resolve_return_request(&loan.borrower, resolve(id, "nonsense"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);

        let report = loan
            .db
            .resolve_return_request(&loan.borrower, resolve(Uuid::new_v4(), "approved"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);

        loan.db
            .resolve_return_request(&loan.borrower, resolve(id, "Rejected"))
            .await?;
        assert!(loan
            .db
            .get_pending_return_requests(&loan.borrower)
            .await?
            .is_empty());
        // Resolution never drives the order.
        assert_eq!(order_status(&loan).await?, OrderStatus::ReturnRequested);

        let report = loan
            .db
            .resolve_return_request(&loan.borrower, resolve(id, "approved"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidState);
        Ok(())
    }
}
