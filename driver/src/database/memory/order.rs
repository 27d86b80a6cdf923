use error_stack::Report;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{Order, OrderId, OrderStatus, UserId};
use kernel::KernelError;

use crate::database::memory::table::Tables;
use crate::database::memory::MemoryTransaction;

pub struct InMemoryOrderRepository;

fn sorted(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by_key(|order| *order.created_at().as_ref());
    orders
}

#[async_trait::async_trait]
impl OrderQuery for InMemoryOrderRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con.tables().orders.get(id).cloned())
    }

    async fn find_by_borrower(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let tables = con.tables();
        let orders = tables
            .orders_by_borrower
            .get(user_id)
            .filter_map(|id| tables.orders.get(id))
            .filter(|order| statuses.is_empty() || statuses.contains(order.status()))
            .cloned()
            .collect();
        Ok(sorted(orders))
    }

    async fn find_by_lender(
        &self,
        con: &mut MemoryTransaction,
        lender_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let tables = con.tables();
        let orders = tables
            .orders_by_lender
            .get(lender_id)
            .filter_map(|id| tables.orders.get(id))
            .cloned()
            .collect();
        Ok(sorted(orders))
    }
}

#[async_trait::async_trait]
impl OrderModifier for InMemoryOrderRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?.insert_order(order.clone())
    }

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
        expected: &OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?.update_order_status(order, expected)
    }
}

impl Tables {
    fn insert_order(&mut self, order: Order) -> error_stack::Result<(), KernelError> {
        let id = order.id().clone();
        if self.orders.contains_key(&id) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("order {} already exists", id.as_ref())));
        }
        // Lender is denormalised from the catalog at write time.
        let lender = self
            .products
            .get(order.product_id())
            .map(|product| product.lender_id().clone())
            .ok_or_else(|| {
                Report::new(KernelError::Internal).attach_printable(format!(
                    "order references unknown product {}",
                    order.product_id().as_ref()
                ))
            })?;
        self.orders_by_borrower
            .insert(order.user_id().clone(), id.clone());
        self.orders_by_lender.insert(lender, id.clone());
        self.orders.insert(id, order);
        Ok(())
    }

    fn update_order_status(
        &mut self,
        order: &Order,
        expected: &OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        let stored = self
            .orders
            .get_mut(order.id())
            .filter(|stored| stored.status() == expected)
            .ok_or_else(|| {
                Report::new(KernelError::Concurrency).attach_printable(format!(
                    "order {} is no longer {expected}",
                    order.id().as_ref()
                ))
            })?;
        stored.substitute(|stored| {
            *stored.status = *order.status();
            *stored.end_date = order.end_date().clone();
        });
        Ok(())
    }
}
