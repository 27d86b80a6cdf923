use error_stack::{Report, ResultExt};
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BuyRequestQuery;
use kernel::interface::update::BuyRequestModifier;
use kernel::prelude::entity::{
    BuyRequest, BuyRequestId, BuyRequestStatus, CreatedAt, ProductId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::database::timed;
use crate::error::ConvertError;

pub struct PostgresBuyRequestRepository;

#[async_trait::async_trait]
impl BuyRequestQuery for PostgresBuyRequestRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BuyRequestId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        timed(con.timeout(), PgBuyRequestInternal::find_by_id(con, id)).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        product_id: Option<&ProductId>,
        status: Option<&BuyRequestStatus>,
    ) -> error_stack::Result<Vec<BuyRequest>, KernelError> {
        timed(
            con.timeout(),
            PgBuyRequestInternal::find_all(con, product_id, status),
        )
        .await
    }

    async fn find_pending(
        &self,
        con: &mut PostgresTransaction,
        product_id: &ProductId,
        requested_by: &UserId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        timed(
            con.timeout(),
            PgBuyRequestInternal::find_pending(con, product_id, requested_by),
        )
        .await
    }
}

#[async_trait::async_trait]
impl BuyRequestModifier for PostgresBuyRequestRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &BuyRequest,
    ) -> error_stack::Result<(), KernelError> {
        timed(con.timeout(), PgBuyRequestInternal::create(con, request)).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        request: &BuyRequest,
        expected: &BuyRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        timed(
            con.timeout(),
            PgBuyRequestInternal::update_status(con, request, expected),
        )
        .await
    }
}

#[derive(sqlx::FromRow)]
struct BuyRequestRow {
    id: Uuid,
    product_id: Uuid,
    requested_by: Uuid,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<BuyRequestRow> for BuyRequest {
    type Error = Report<KernelError>;
    fn try_from(row: BuyRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BuyRequestStatus>()
            .change_context(KernelError::Internal)?;
        Ok(BuyRequest::new(
            BuyRequestId::new(row.id),
            ProductId::new(row.product_id),
            UserId::new(row.requested_by),
            status,
            CreatedAt::new(row.created_at),
        ))
    }
}

pub(in crate::database) struct PgBuyRequestInternal;

impl PgBuyRequestInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BuyRequestId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        let row = sqlx::query_as::<_, BuyRequestRow>(
            // language=postgresql
            r#"
            SELECT id, product_id, requested_by, status, created_at
            FROM buy_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(BuyRequest::try_from).transpose()
    }

    async fn find_all(
        con: &mut PgConnection,
        product_id: Option<&ProductId>,
        status: Option<&BuyRequestStatus>,
    ) -> error_stack::Result<Vec<BuyRequest>, KernelError> {
        let rows = sqlx::query_as::<_, BuyRequestRow>(
            // language=postgresql
            r#"
            SELECT id, product_id, requested_by, status, created_at
            FROM buy_requests
            WHERE ($1::uuid IS NULL OR product_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at
            "#,
        )
        .bind(product_id.map(AsRef::<Uuid>::as_ref))
        .bind(status.map(BuyRequestStatus::as_str))
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(BuyRequest::try_from).collect()
    }

    async fn find_pending(
        con: &mut PgConnection,
        product_id: &ProductId,
        requested_by: &UserId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        let row = sqlx::query_as::<_, BuyRequestRow>(
            // language=postgresql
            r#"
            SELECT id, product_id, requested_by, status, created_at
            FROM buy_requests
            WHERE product_id = $1 AND requested_by = $2 AND status = 'pending'
            "#,
        )
        .bind(product_id.as_ref())
        .bind(requested_by.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(BuyRequest::try_from).transpose()
    }

    async fn create(
        con: &mut PgConnection,
        request: &BuyRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO buy_requests (id, product_id, requested_by, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.product_id().as_ref())
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
        request: &BuyRequest,
        expected: &BuyRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE buy_requests
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
                "buy request {} is no longer {expected}",
                request.id().as_ref()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BuyRequestQuery;
    use kernel::interface::update::BuyRequestModifier;
    use kernel::prelude::entity::{BuyRequest, BuyRequestId, BuyRequestStatus, CreatedAt, UserId};
    use kernel::KernelError;

    use crate::database::postgres::fixture;
    use crate::database::PostgresBuyRequestRepository;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn pending_is_unique_and_status_update_is_conditional(
    ) -> error_stack::Result<(), KernelError> {
        let db = fixture::database().await?;
        let mut connection = db.transact().await?;
        let (_, product) = fixture::seed(&mut connection, &UserId::new(Uuid::new_v4())).await?;
        let borrower = UserId::new(Uuid::new_v4());

        let request = BuyRequest::new(
            BuyRequestId::new(Uuid::new_v4()),
            product.id().clone(),
            borrower.clone(),
            BuyRequestStatus::Pending,
            CreatedAt::now(),
        );
        PostgresBuyRequestRepository
            .create(&mut connection, &request)
            .await?;

        let pending = PostgresBuyRequestRepository
            .find_pending(&mut connection, product.id(), &borrower)
            .await?;
        assert_eq!(pending.as_ref().map(|r| r.id()), Some(request.id()));

        let mut approved = request.clone();
        approved.substitute(|r| *r.status = BuyRequestStatus::Approved);
        PostgresBuyRequestRepository
            .update_status(&mut connection, &approved, &BuyRequestStatus::Pending)
            .await?;
        let report = PostgresBuyRequestRepository
            .update_status(&mut connection, &approved, &BuyRequestStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Concurrency);

        let found = PostgresBuyRequestRepository
            .find_all(
                &mut connection,
                Some(product.id()),
                Some(&BuyRequestStatus::Approved),
            )
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status(), &BuyRequestStatus::Approved);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn second_pending_request_conflicts() -> error_stack::Result<(), KernelError> {
        let db = fixture::database().await?;
        let mut connection = db.transact().await?;
        let (_, product) = fixture::seed(&mut connection, &UserId::new(Uuid::new_v4())).await?;
        let borrower = UserId::new(Uuid::new_v4());
        let request = |id| {
            BuyRequest::new(
                BuyRequestId::new(id),
                product.id().clone(),
                borrower.clone(),
                BuyRequestStatus::Pending,
                CreatedAt::now(),
            )
        };

        PostgresBuyRequestRepository
            .create(&mut connection, &request(Uuid::new_v4()))
            .await?;
        let report = PostgresBuyRequestRepository
            .create(&mut connection, &request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
        Ok(())
    }
}
