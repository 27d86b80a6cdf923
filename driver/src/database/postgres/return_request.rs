use error_stack::{Report, ResultExt};
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::ReturnRequestQuery;
use kernel::interface::update::ReturnRequestModifier;
use kernel::prelude::entity::{
    CreatedAt, OrderId, ReturnRequest, ReturnRequestId, ReturnRequestStatus, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::database::timed;
use crate::error::ConvertError;

pub struct PostgresReturnRequestRepository;

#[async_trait::async_trait]
impl ReturnRequestQuery for PostgresReturnRequestRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ReturnRequestId,
    ) -> error_stack::Result<Option<ReturnRequest>, KernelError> {
        timed(con.timeout(), PgReturnRequestInternal::find_by_id(con, id)).await
    }

    async fn find_by_status(
        &self,
        con: &mut PostgresTransaction,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        timed(
            con.timeout(),
            PgReturnRequestInternal::find_by_status(con, status),
        )
        .await
    }

    async fn find_by_borrower(
        &self,
        con: &mut PostgresTransaction,
        borrower_id: &UserId,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        timed(
            con.timeout(),
            PgReturnRequestInternal::find_by_borrower(con, borrower_id, status),
        )
        .await
    }
}

#[async_trait::async_trait]
impl ReturnRequestModifier for PostgresReturnRequestRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &ReturnRequest,
    ) -> error_stack::Result<(), KernelError> {
        timed(con.timeout(), PgReturnRequestInternal::create(con, request)).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        request: &ReturnRequest,
        expected: &ReturnRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        timed(
            con.timeout(),
            PgReturnRequestInternal::update_status(con, request, expected),
        )
        .await
    }
}

#[derive(sqlx::FromRow)]
struct ReturnRequestRow {
    id: Uuid,
    order_id: Uuid,
    requested_by: Uuid,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<ReturnRequestRow> for ReturnRequest {
    type Error = Report<KernelError>;
    fn try_from(row: ReturnRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ReturnRequestStatus>()
            .change_context(KernelError::Internal)?;
        Ok(ReturnRequest::new(
            ReturnRequestId::new(row.id),
            OrderId::new(row.order_id),
            UserId::new(row.requested_by),
            status,
            CreatedAt::new(row.created_at),
        ))
    }
}

pub(in crate::database) struct PgReturnRequestInternal;

impl PgReturnRequestInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ReturnRequestId,
    ) -> error_stack::Result<Option<ReturnRequest>, KernelError> {
        let row = sqlx::query_as::<_, ReturnRequestRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, requested_by, status, created_at
            FROM return_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(ReturnRequest::try_from).transpose()
    }

    async fn find_by_status(
        con: &mut PgConnection,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        let rows = sqlx::query_as::<_, ReturnRequestRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, requested_by, status, created_at
            FROM return_requests
            WHERE status = $1
            ORDER BY created_at
            "#,
        )
        .bind(status.as_str())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(ReturnRequest::try_from).collect()
    }

    async fn find_by_borrower(
        con: &mut PgConnection,
        borrower_id: &UserId,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        let rows = sqlx::query_as::<_, ReturnRequestRow>(
            // language=postgresql
            r#"
            SELECT r.id, r.order_id, r.requested_by, r.status, r.created_at
            FROM return_requests r
            JOIN orders o ON o.id = r.order_id
            WHERE o.user_id = $1 AND r.status = $2
            ORDER BY r.created_at
            "#,
        )
        .bind(borrower_id.as_ref())
        .bind(status.as_str())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(ReturnRequest::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        request: &ReturnRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO return_requests (id, order_id, requested_by, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.order_id().as_ref())
        .bind(request.requested_by().as_ref())
        .bind(request.status().as_str())
        .bind(request.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_status(
        con: &mut PgConnection,
        request: &ReturnRequest,
        expected: &ReturnRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE return_requests
            SET status = $2
            WHERE id = $1 AND status = $3
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.status().as_str())
        .bind(expected.as_str())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "return request {} is no longer {expected}",
                request.id().as_ref()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::ReturnRequestQuery;
    use kernel::interface::update::{OrderModifier, ReturnRequestModifier};
    use kernel::prelude::entity::{
        CreatedAt, Order, OrderId, OrderStatus, ReturnRequest, ReturnRequestId,
        ReturnRequestStatus, SecurityAmount, StartDate, TotalAmount, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::fixture;
    use crate::database::{PostgresOrderRepository, PostgresReturnRequestRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn pending_request_is_found_through_borrower() -> error_stack::Result<(), KernelError> {
        let db = fixture::database().await?;
        let mut connection = db.transact().await?;
        let lender = UserId::new(Uuid::new_v4());
        let borrower = UserId::new(Uuid::new_v4());
        let (_, product) = fixture::seed(&mut connection, &lender).await?;
        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            product.id().clone(),
            borrower.clone(),
            StartDate::new(OffsetDateTime::now_utc()),
            None,
            TotalAmount::new(Decimal::ONE),
            SecurityAmount::new(Decimal::TEN),
            OrderStatus::ReturnRequested,
            CreatedAt::now(),
        );
        PostgresOrderRepository.create(&mut connection, &order).await?;

        let request = ReturnRequest::new(
            ReturnRequestId::new(Uuid::new_v4()),
            order.id().clone(),
            lender.clone(),
            ReturnRequestStatus::Pending,
            CreatedAt::now(),
        );
        PostgresReturnRequestRepository
            .create(&mut connection, &request)
            .await?;

        let pending = PostgresReturnRequestRepository
            .find_by_borrower(&mut connection, &borrower, &ReturnRequestStatus::Pending)
            .await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), request.id());

        let of_lender = PostgresReturnRequestRepository
            .find_by_borrower(&mut connection, &lender, &ReturnRequestStatus::Pending)
            .await?;
        assert!(of_lender.is_empty());

        let mut approved = request.clone();
        approved.substitute(|r| *r.status = ReturnRequestStatus::Approved);
        PostgresReturnRequestRepository
            .update_status(&mut connection, &approved, &ReturnRequestStatus::Pending)
            .await?;
        let found = PostgresReturnRequestRepository
            .find_by_status(&mut connection, &ReturnRequestStatus::Approved)
            .await?;
        assert!(found.iter().any(|r| r.id() == request.id()));
        Ok(())
    }
}
