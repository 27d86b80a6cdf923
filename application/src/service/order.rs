use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnProductQuery, DependOnReturnRequestQuery, OrderQuery,
    ProductQuery, ReturnRequestQuery,
};
use kernel::interface::update::{DependOnOrderModifier, OrderModifier};
use kernel::prelude::entity::{
    Actor, BuyRequest, Category, CreatedAt, EndDate, Order, OrderId, OrderStatus,
    ReturnRequestStatus, SecurityAmount, StartDate, TotalAmount,
};
use kernel::KernelError;

use crate::rule::{missing, require_lender_role, require_product_lender};
use crate::transfer::{
    GetOrderHistoryDto, MarkOrderReturnedDto, OrderDetailDto, OrderDto, UpdateOrderStatusDto,
};

/// Moves `order` one step forward, stamping `end_date` when it reaches `Returned`.
fn advance(mut order: Order, next: OrderStatus) -> error_stack::Result<Order, KernelError> {
    let current = *order.status();
    if !current.can_transition_to(&next) {
        return Err(Report::new(KernelError::InvalidTransition).attach_printable(format!(
            "order {} cannot move from {current} to {next}",
            order.id().as_ref()
        )));
    }
    order.substitute(|order| {
        *order.status = next;
        if next == OrderStatus::Returned {
            *order.end_date = Some(EndDate::new(time::OffsetDateTime::now_utc()));
        }
    });
    Ok(order)
}

type TransactionOf<T> =
    <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction;

/// Opens an `InUse` order for an approved buy request inside the caller's transaction.
#[async_trait::async_trait]
pub trait OpenOrderService: 'static + Sync + Send + DependOnOrderModifier {
    async fn open_order(
        &self,
        connection: &mut TransactionOf<Self>,
        request: &BuyRequest,
        category: &Category,
    ) -> error_stack::Result<Order, KernelError> {
        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            request.product_id().clone(),
            request.requested_by().clone(),
            StartDate::new(time::OffsetDateTime::now_utc()),
            None,
            TotalAmount::from(category.price()),
            SecurityAmount::from(category.security()),
            OrderStatus::InUse,
            CreatedAt::now(),
        );
        self.order_modifier().create(connection, &order).await?;
        tracing::info!(order = %order.id().as_ref(), "order opened");
        Ok(order)
    }
}

impl<T> OpenOrderService for T where T: DependOnOrderModifier {}

/// Moves an `InUse` order to `ReturnRequested` inside the caller's transaction.
#[async_trait::async_trait]
pub trait RequestReturnService: 'static + Sync + Send + DependOnOrderModifier {
    async fn request_return(
        &self,
        connection: &mut TransactionOf<Self>,
        order: Order,
    ) -> error_stack::Result<Order, KernelError> {
        let expected = *order.status();
        let order = advance(order, OrderStatus::ReturnRequested)?;
        self.order_modifier()
            .update_status(connection, &order, &expected)
            .await?;
        Ok(order)
    }
}

impl<T> RequestReturnService for T where T: DependOnOrderModifier {}

#[async_trait::async_trait]
pub trait UpdateOrderStatusService:
    'static + Sync + Send + DependOnOrderQuery + DependOnOrderModifier + DependOnProductQuery
{
    /// Explicit status transition by the product's lender. Only the single
    /// forward step `ReturnRequested -> Returned` is reachable from here.
    async fn update_order_status(
        &self,
        actor: &Actor,
        dto: UpdateOrderStatusDto,
    ) -> error_stack::Result<(), KernelError> {
        let next = dto.status.parse::<OrderStatus>()?;

        let mut connection = self.database_connection().transact().await?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, &OrderId::new(dto.id))
            .await?
            .ok_or_else(|| missing("order", dto.id))?;
        let product = self
            .product_query()
            .find_by_id(&mut connection, order.product_id())
            .await?
            .ok_or_else(|| missing("product", order.product_id().as_ref()))?;
        require_product_lender(actor, &product)?;

        let current = *order.status();
        if current != OrderStatus::ReturnRequested || next != OrderStatus::Returned {
            return Err(Report::new(KernelError::InvalidTransition).attach_printable(format!(
                "order {} cannot move from {current} to {next}",
                dto.id
            )));
        }

        let order = advance(order, next)?;
        self.order_modifier()
            .update_status(&mut connection, &order, &current)
            .await?;
        connection.commit().await?;

        tracing::info!(order = %dto.id, %next, "order status updated");
        Ok(())
    }
}

impl<T> UpdateOrderStatusService for T where
    T: DependOnOrderQuery + DependOnOrderModifier + DependOnProductQuery
{
}

#[async_trait::async_trait]
pub trait MarkOrderReturnedService:
    'static + Sync + Send + DependOnOrderQuery + DependOnOrderModifier + DependOnProductQuery
{
    /// Lender confirms the product came back. Gated only on the order sitting in
    /// `ReturnRequested`; the return request's own status is not consulted.
    async fn mark_order_returned(
        &self,
        actor: &Actor,
        dto: MarkOrderReturnedDto,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, &OrderId::new(dto.id))
            .await?
            .ok_or_else(|| missing("order", dto.id))?;
        let product = self
            .product_query()
            .find_by_id(&mut connection, order.product_id())
            .await?
            .ok_or_else(|| missing("product", order.product_id().as_ref()))?;
        require_product_lender(actor, &product)?;

        let current = *order.status();
        let order = advance(order, OrderStatus::Returned)?;
        self.order_modifier()
            .update_status(&mut connection, &order, &current)
            .await?;
        connection.commit().await?;

        tracing::info!(order = %dto.id, "order returned");
        Ok(())
    }
}

impl<T> MarkOrderReturnedService for T where
    T: DependOnOrderQuery + DependOnOrderModifier + DependOnProductQuery
{
}

#[async_trait::async_trait]
pub trait GetOrderService:
    'static
    + Sync
    + Send
    + DependOnOrderQuery
    + DependOnProductQuery
    + DependOnReturnRequestQuery
{
    /// Borrower's orders whose status is any of `dto.statuses`, each joined with
    /// its product.
    async fn get_order_history(
        &self,
        actor: &Actor,
        dto: GetOrderHistoryDto,
    ) -> error_stack::Result<Vec<OrderDetailDto>, KernelError> {
        let statuses = dto
            .statuses
            .iter()
            .map(|status| status.parse::<OrderStatus>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut connection = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_by_borrower(&mut connection, actor.user_id(), &statuses)
            .await?;
        self.join_products(&mut connection, orders).await
    }

    async fn get_lender_orders(
        &self,
        actor: &Actor,
    ) -> error_stack::Result<Vec<OrderDetailDto>, KernelError> {
        require_lender_role(actor)?;
        let mut connection = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_by_lender(&mut connection, actor.user_id())
            .await?;
        self.join_products(&mut connection, orders).await
    }

    /// Orders whose return the borrower approved on a request this lender filed,
    /// still waiting for the lender to mark them returned.
    async fn get_approved_awaiting_orders(
        &self,
        actor: &Actor,
    ) -> error_stack::Result<Vec<OrderDetailDto>, KernelError> {
        require_lender_role(actor)?;
        let mut connection = self.database_connection().transact().await?;
        let approved = self
            .return_request_query()
            .find_by_status(&mut connection, &ReturnRequestStatus::Approved)
            .await?;

        let mut orders: Vec<Order> = Vec::new();
        for request in approved
            .iter()
            .filter(|request| request.requested_by() == actor.user_id())
        {
            if orders.iter().any(|o| o.id() == request.order_id()) {
                continue;
            }
            let order = self
                .order_query()
                .find_by_id(&mut connection, request.order_id())
                .await?;
            if let Some(order) = order {
                if *order.status() == OrderStatus::ReturnRequested {
                    orders.push(order);
                }
            }
        }
        self.join_products(&mut connection, orders).await
    }

    /// Pairs each order with its product. Orders whose product vanished are
    /// kept with `product: None`.
    async fn join_products(
        &self,
        connection: &mut TransactionOf<Self>,
        orders: Vec<Order>,
    ) -> error_stack::Result<Vec<OrderDetailDto>, KernelError> {
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let product = self
                .product_query()
                .find_by_id(connection, order.product_id())
                .await?;
            details.push(OrderDetailDto {
                order: OrderDto::from(order),
                product: product.map(Into::into),
            });
        }
        Ok(details)
    }
}

impl<T> GetOrderService for T where
    T: DependOnOrderQuery + DependOnProductQuery + DependOnReturnRequestQuery
{
}
