use error_stack::{Report, ResultExt};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    CreatedAt, EndDate, Order, OrderId, OrderStatus, ProductId, SecurityAmount, StartDate,
    TotalAmount, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::database::timed;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        timed(con.timeout(), PgOrderInternal::find_by_id(con, id)).await
    }

    async fn find_by_borrower(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        timed(
            con.timeout(),
            PgOrderInternal::find_by_borrower(con, user_id, statuses),
        )
        .await
    }

    async fn find_by_lender(
        &self,
        con: &mut PostgresTransaction,
        lender_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        timed(con.timeout(), PgOrderInternal::find_by_lender(con, lender_id)).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        timed(con.timeout(), PgOrderInternal::create(con, order)).await
    }

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
        expected: &OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        timed(
            con.timeout(),
            PgOrderInternal::update_status(con, order, expected),
        )
        .await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    start_date: OffsetDateTime,
    end_date: Option<OffsetDateTime>,
    total_amount: Decimal,
    security_amount: Decimal,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<OrderRow> for Order {
    type Error = Report<KernelError>;
    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .change_context(KernelError::Internal)?;
        Ok(Order::new(
            OrderId::new(row.id),
            ProductId::new(row.product_id),
            UserId::new(row.user_id),
            StartDate::new(row.start_date),
            row.end_date.map(EndDate::new),
            TotalAmount::new(row.total_amount),
            SecurityAmount::new(row.security_amount),
            status,
            CreatedAt::new(row.created_at),
        ))
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, product_id, user_id, start_date, end_date,
                   total_amount, security_amount, status, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Order::try_from).transpose()
    }

    async fn find_by_borrower(
        con: &mut PgConnection,
        user_id: &UserId,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let statuses = statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect::<Vec<String>>();
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, product_id, user_id, start_date, end_date,
                   total_amount, security_amount, status, created_at
            FROM orders
            WHERE user_id = $1
              AND (cardinality($2::text[]) = 0 OR status = ANY($2))
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .bind(statuses)
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_by_lender(
        con: &mut PgConnection,
        lender_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT o.id, o.product_id, o.user_id, o.start_date, o.end_date,
                   o.total_amount, o.security_amount, o.status, o.created_at
            FROM orders o
            JOIN products p ON p.id = o.product_id
            WHERE p.lender_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(lender_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO orders (id, product_id, user_id, start_date, end_date,
                                total_amount, security_amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.product_id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(order.start_date().as_ref())
        .bind(order.end_date().as_ref().map(AsRef::<OffsetDateTime>::as_ref))
        .bind(order.total_amount().as_ref())
        .bind(order.security_amount().as_ref())
        .bind(order.status().as_str())
        .bind(order.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_status(
        con: &mut PgConnection,
        order: &Order,
        expected: &OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE orders
            SET status = $2, end_date = $3
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.status().as_str())
        .bind(order.end_date().as_ref().map(AsRef::<OffsetDateTime>::as_ref))
        .bind(expected.as_str())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "order {} is no longer {expected}",
                order.id().as_ref()
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
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::OrderModifier;
    use kernel::prelude::entity::{
        CreatedAt, EndDate, Order, OrderId, OrderStatus, SecurityAmount, StartDate, TotalAmount,
        UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::fixture;
    use crate::database::PostgresOrderRepository;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn indexed_lookups_and_conditional_update() -> error_stack::Result<(), KernelError> {
        let db = fixture::database().await?;
        let mut connection = db.transact().await?;
        let lender = UserId::new(Uuid::new_v4());
        let (_, product) = fixture::seed(&mut connection, &lender).await?;
        let borrower = UserId::new(Uuid::new_v4());

        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            product.id().clone(),
            borrower.clone(),
            StartDate::new(OffsetDateTime::now_utc()),
            None,
            TotalAmount::new(Decimal::new(1250, 2)),
            SecurityAmount::new(Decimal::new(4000, 2)),
            OrderStatus::InUse,
            CreatedAt::now(),
        );
        PostgresOrderRepository.create(&mut connection, &order).await?;

        let by_lender = PostgresOrderRepository
            .find_by_lender(&mut connection, &lender)
            .await?;
        assert_eq!(by_lender.len(), 1);
        assert_eq!(by_lender[0].total_amount(), order.total_amount());

        let returned = PostgresOrderRepository
            .find_by_borrower(&mut connection, &borrower, &[OrderStatus::Returned])
            .await?;
        assert!(returned.is_empty());

        let mut requested = order.clone();
        requested.substitute(|o| *o.status = OrderStatus::ReturnRequested);
        PostgresOrderRepository
            .update_status(&mut connection, &requested, &OrderStatus::InUse)
            .await?;

        let mut finished = requested.clone();
        finished.substitute(|o| {
            *o.status = OrderStatus::Returned;
            *o.end_date = Some(EndDate::new(OffsetDateTime::now_utc()));
        });
        let report = PostgresOrderRepository
            .update_status(&mut connection, &finished, &OrderStatus::InUse)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Concurrency);
        PostgresOrderRepository
            .update_status(&mut connection, &finished, &OrderStatus::ReturnRequested)
            .await?;

        let all = PostgresOrderRepository
            .find_by_borrower(&mut connection, &borrower, &[])
            .await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status(), &OrderStatus::Returned);
        assert!(all[0].end_date().is_some());
        Ok(())
    }
}
