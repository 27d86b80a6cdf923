use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BuyRequestQuery, CategoryQuery, DependOnBuyRequestQuery, DependOnCategoryQuery,
    DependOnProductQuery, ProductQuery,
};
use kernel::interface::update::{BuyRequestModifier, DependOnBuyRequestModifier};
use kernel::prelude::entity::{
    Actor, BuyRequest, BuyRequestId, BuyRequestStatus, CreatedAt, ProductId,
};
use kernel::KernelError;

use crate::rule::{missing, require_lender_role, require_requestable};
use crate::service::OpenOrderService;
use crate::transfer::{
    BuyRequestDetailDto, BuyRequestDto, CreateBuyRequestDto, GetAllBuyRequestDto,
    GetBuyRequestDto, ResolveBuyRequestDto,
};

#[async_trait::async_trait]
pub trait CreateBuyRequestService:
    'static
    + Sync
    + Send
    + DependOnProductQuery
    + DependOnBuyRequestQuery
    + DependOnBuyRequestModifier
{
    /// Files a pending request on behalf of `actor`. At most one pending request
    /// per (product, requester) exists at any time.
    async fn create_buy_request(
        &self,
        actor: &Actor,
        dto: CreateBuyRequestDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let product_id = ProductId::new(dto.product_id);
        let product = self
            .product_query()
            .find_by_id(&mut connection, &product_id)
            .await?
            .ok_or_else(|| missing("product", dto.product_id))?;
        require_requestable(actor, &product)?;

        let pending = self
            .buy_request_query()
            .find_pending(&mut connection, &product_id, actor.user_id())
            .await?;
        if pending.is_some() {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable("a pending buy request for this product already exists"));
        }

        let uuid = Uuid::new_v4();
        let request = BuyRequest::new(
            BuyRequestId::new(uuid),
            product_id,
            actor.user_id().clone(),
            BuyRequestStatus::Pending,
            CreatedAt::now(),
        );
        self.buy_request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;

        tracing::info!(buy_request = %uuid, product = %dto.product_id, "buy request created");
        Ok(uuid)
    }
}

impl<T> CreateBuyRequestService for T where
    T: DependOnProductQuery + DependOnBuyRequestQuery + DependOnBuyRequestModifier
{
}

#[async_trait::async_trait]
pub trait ResolveBuyRequestService:
    'static
    + Sync
    + Send
    + DependOnBuyRequestQuery
    + DependOnBuyRequestModifier
    + DependOnProductQuery
    + DependOnCategoryQuery
    + OpenOrderService
{
    /// Approves or rejects a pending request. Approval opens an order priced from
    /// the product's category in the same transaction and returns its id.
    async fn resolve_buy_request(
        &self,
        actor: &Actor,
        dto: ResolveBuyRequestDto,
    ) -> error_stack::Result<Option<Uuid>, KernelError> {
        require_lender_role(actor)?;
        let status = dto.status.parse::<BuyRequestStatus>()?;
        if !status.is_terminal() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("buy requests can only be approved or rejected"));
        }

        let mut connection = self.database_connection().transact().await?;

        let id = BuyRequestId::new(dto.id);
        let request = self
            .buy_request_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| missing("buy request", dto.id))?;
        if request.status().is_terminal() {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "buy request {} is already {}",
                dto.id,
                request.status()
            )));
        }

        let order = match status {
            BuyRequestStatus::Approved => {
                let product = self
                    .product_query()
                    .find_by_id(&mut connection, request.product_id())
                    .await?
                    .ok_or_else(|| missing("product", request.product_id().as_ref()))?;
                let category = self
                    .category_query()
                    .find_by_id(&mut connection, product.category_id())
                    .await?
                    .ok_or_else(|| missing("category", product.category_id().as_ref()))?;
                let order = self
                    .open_order(&mut connection, &request, &category)
                    .await?;
                Some(*order.id().as_ref())
            }
            _ => None,
        };

        let mut request = request;
        request.substitute(|request| *request.status = status);
        self.buy_request_modifier()
            .update_status(&mut connection, &request, &BuyRequestStatus::Pending)
            .await?;
        connection.commit().await?;

        tracing::info!(buy_request = %dto.id, %status, "buy request resolved");
        Ok(order)
    }
}

impl<T> ResolveBuyRequestService for T where
    T: DependOnBuyRequestQuery
        + DependOnBuyRequestModifier
        + DependOnProductQuery
        + DependOnCategoryQuery
        + OpenOrderService
{
}

#[async_trait::async_trait]
pub trait GetBuyRequestService:
    'static + Sync + Send + DependOnBuyRequestQuery + DependOnProductQuery
{
    async fn get_buy_request(
        &self,
        dto: GetBuyRequestDto,
    ) -> error_stack::Result<BuyRequestDetailDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let request = self
            .buy_request_query()
            .find_by_id(&mut connection, &BuyRequestId::new(dto.id))
            .await?
            .ok_or_else(|| missing("buy request", dto.id))?;
        let product = self
            .product_query()
            .find_by_id(&mut connection, request.product_id())
            .await?;
        Ok(BuyRequestDetailDto {
            request: BuyRequestDto::from(request),
            product: product.map(Into::into),
        })
    }

    /// Lists requests matching every given filter, each joined with its product.
    async fn get_all_buy_requests(
        &self,
        dto: GetAllBuyRequestDto,
    ) -> error_stack::Result<Vec<BuyRequestDetailDto>, KernelError> {
        let status = dto
            .status
            .as_deref()
            .map(str::parse::<BuyRequestStatus>)
            .transpose()?;
        let product_id = dto.product_id.map(ProductId::new);

        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .buy_request_query()
            .find_all(&mut connection, product_id.as_ref(), status.as_ref())
            .await?;

        let mut details = Vec::with_capacity(requests.len());
        for request in requests {
            let product = self
                .product_query()
                .find_by_id(&mut connection, request.product_id())
                .await?;
            details.push(BuyRequestDetailDto {
                request: BuyRequestDto::from(request),
                product: product.map(Into::into),
            });
        }
        Ok(details)
    }
}

impl<T> GetBuyRequestService for T where T: DependOnBuyRequestQuery + DependOnProductQuery {}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::{Actor, BuyRequestStatus, OrderStatus, Role, UserId};
    use kernel::KernelError;

    use crate::service::{
        CreateBuyRequestService, GetBuyRequestService, GetOrderService,
        ResolveBuyRequestService,
    };
    use crate::transfer::{
        CreateBuyRequestDto, GetAllBuyRequestDto, GetBuyRequestDto, GetOrderHistoryDto,
        ResolveBuyRequestDto,
    };

    struct Fixture {
        db: InMemoryDatabase,
        lender: Actor,
        borrower: Actor,
        product: Uuid,
    }

    async fn fixture(is_available: bool) -> Fixture {
        let db = InMemoryDatabase::default();
        let lender = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        let borrower = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let category = db
            .seed_category("tools", Decimal::new(1500, 2), Decimal::new(5000, 2))
            .await;
        let product = db
            .seed_product(lender.user_id().as_ref(), &category, "drill", is_available)
            .await;
        Fixture {
            db,
            lender,
            borrower,
            product,
        }
    }

    fn resolve(id: Uuid, status: &str) -> ResolveBuyRequestDto {
        ResolveBuyRequestDto {
            id,
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn approval_opens_order_from_category() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;

        let order = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "Approved"))
            .await?;
        assert!(order.is_some());

        let detail = f.db.get_buy_request(GetBuyRequestDto { id: request }).await?;
        assert_eq!(detail.request.status, BuyRequestStatus::Approved);
        assert_eq!(detail.product.map(|p| p.id), Some(f.product));

        let history = f
            .db
            .get_order_history(&f.borrower, GetOrderHistoryDto::default())
            .await?;
        assert_eq!(history.len(), 1);
        let opened = &history[0].order;
        assert_eq!(Some(opened.id), order);
        assert_eq!(opened.status, OrderStatus::InUse);
        assert_eq!(opened.total_amount, Decimal::new(1500, 2));
        assert_eq!(opened.security_amount, Decimal::new(5000, 2));
        assert_eq!(opened.end_date, None);
        Ok(())
    }

    #[tokio::test]
    async fn rejection_opens_nothing() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;

        let order = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "rejected"))
            .await?;
        assert_eq!(order, None);
        let history = f
            .db
            .get_order_history(&f.borrower, GetOrderHistoryDto::default())
            .await?;
        assert!(history.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_pending_request_conflicts() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;
        let report = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);

        // Once resolved, a new request may be filed.
        f.db
            .resolve_buy_request(&f.lender, resolve(request, "rejected"))
            .await?;
        f.db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_unusable_products() {
        let f = fixture(false).await;
        let report = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);

        let report = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);

        let f = fixture(true).await;
        let report = f
            .db
            .create_buy_request(&f.lender, CreateBuyRequestDto { product_id: f.product })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
    }

    #[tokio::test]
    async fn resolve_checks_role_status_and_state() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;

        let report = f
            .db
            .resolve_buy_request(&f.borrower, resolve(request, "approved"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Authorization);

        let report = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "maybe"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);

        let report = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "pending"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);

        let report = f
            .db
            .resolve_buy_request(&f.lender, resolve(Uuid::new_v4(), "approved"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);

        f.db
            .resolve_buy_request(&f.lender, resolve(request, "approved"))
            .await?;
        let report = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "rejected"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidState);
        Ok(())
    }

    #[tokio::test]
    async fn failed_approval_leaves_no_trace() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;

        // Order insert succeeds, the status update fails.
        f.db.fail_after_writes(1);
        let report = f
            .db
            .resolve_buy_request(&f.lender, resolve(request, "approved"))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);
        f.db.disarm_faults();

        let detail = f.db.get_buy_request(GetBuyRequestDto { id: request }).await?;
        assert_eq!(detail.request.status, BuyRequestStatus::Pending);
        let history = f
            .db
            .get_order_history(&f.borrower, GetOrderHistoryDto::default())
            .await?;
        assert!(history.is_empty());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_approvals_open_one_order() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let request = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;

        let approve = move |db: InMemoryDatabase, lender: Actor| {
            tokio::spawn(async move {
                db.resolve_buy_request(&lender, resolve(request, "approved"))
                    .await
            })
        };
        let first = approve(f.db.clone(), f.lender.clone());
        let second = approve(f.db.clone(), f.lender.clone());
        let results = [first.await.unwrap(), second.await.unwrap()];

        let opened = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(opened, 1);
        for report in results.iter().filter_map(|result| result.as_ref().err()) {
            assert!(matches!(
                report.current_context(),
                KernelError::Concurrency | KernelError::InvalidState
            ));
        }

        let history = f
            .db
            .get_order_history(&f.borrower, GetOrderHistoryDto::default())
            .await?;
        assert_eq!(history.len(), 1);
        let detail = f.db.get_buy_request(GetBuyRequestDto { id: request }).await?;
        assert_eq!(detail.request.status, BuyRequestStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_conjunctively() -> error_stack::Result<(), KernelError> {
        let f = fixture(true).await;
        let other = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let first = f
            .db
            .create_buy_request(&f.borrower, CreateBuyRequestDto { product_id: f.product })
            .await?;
        f.db
            .create_buy_request(&other, CreateBuyRequestDto { product_id: f.product })
            .await?;
        f.db
            .resolve_buy_request(&f.lender, resolve(first, "rejected"))
            .await?;

        let all = f.db.get_all_buy_requests(GetAllBuyRequestDto::default()).await?;
        assert_eq!(all.len(), 2);

        let pending = f
            .db
            .get_all_buy_requests(GetAllBuyRequestDto {
                product_id: Some(f.product),
                status: Some("pending".to_string()),
            })
            .await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request.requested_by, *other.user_id().as_ref());

        let none = f
            .db
            .get_all_buy_requests(GetAllBuyRequestDto {
                product_id: Some(Uuid::new_v4()),
                status: None,
            })
            .await?;
        assert!(none.is_empty());
        Ok(())
    }
}
