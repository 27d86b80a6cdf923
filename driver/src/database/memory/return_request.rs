use error_stack::Report;

use kernel::interface::query::ReturnRequestQuery;
use kernel::interface::update::ReturnRequestModifier;
use kernel::prelude::entity::{ReturnRequest, ReturnRequestId, ReturnRequestStatus, UserId};
use kernel::KernelError;

use crate::database::memory::table::Tables;
use crate::database::memory::MemoryTransaction;

pub struct InMemoryReturnRequestRepository;

impl Tables {
    fn return_requests_with(&self, status: &ReturnRequestStatus) -> Vec<&ReturnRequest> {
        let mut found: Vec<&ReturnRequest> = self
            .return_requests_by_status
            .get(status)
            .filter_map(|id| self.return_requests.get(id))
            .collect();
        found.sort_by_key(|request| *request.created_at().as_ref());
        found
    }

    fn insert_return_request(
        &mut self,
        request: ReturnRequest,
    ) -> error_stack::Result<(), KernelError> {
        let id = request.id().clone();
        if self.return_requests.contains_key(&id) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("return request {} already exists", id.as_ref())));
        }
        if *request.status() == ReturnRequestStatus::Pending {
            if self.pending_return_requests.contains_key(request.order_id()) {
                return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                    "order {} already has a pending return request",
                    request.order_id().as_ref()
                )));
            }
            self.pending_return_requests
                .insert(request.order_id().clone(), id.clone());
        }
        self.return_requests_by_status
            .insert(*request.status(), id.clone());
        self.return_requests.insert(id, request);
        Ok(())
    }

    fn update_return_request_status(
        &mut self,
        id: &ReturnRequestId,
        status: ReturnRequestStatus,
        expected: &ReturnRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        let stored = self
            .return_requests
            .get_mut(id)
            .filter(|stored| stored.status() == expected)
            .ok_or_else(|| {
                Report::new(KernelError::Concurrency).attach_printable(format!(
                    "return request {} is no longer {expected}",
                    id.as_ref()
                ))
            })?;
        stored.substitute(|stored| *stored.status = status);

        let order_id = stored.order_id().clone();
        self.return_requests_by_status.remove(expected, id);
        self.return_requests_by_status.insert(status, id.clone());
        if *expected == ReturnRequestStatus::Pending {
            self.pending_return_requests.remove(&order_id);
        }
        if status == ReturnRequestStatus::Pending {
            self.pending_return_requests.insert(order_id, id.clone());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReturnRequestQuery for InMemoryReturnRequestRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ReturnRequestId,
    ) -> error_stack::Result<Option<ReturnRequest>, KernelError> {
        Ok(con.tables().return_requests.get(id).cloned())
    }

    async fn find_by_status(
        &self,
        con: &mut MemoryTransaction,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        Ok(con
            .tables()
            .return_requests_with(status)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn find_by_borrower(
        &self,
        con: &mut MemoryTransaction,
        borrower_id: &UserId,
        status: &ReturnRequestStatus,
    ) -> error_stack::Result<Vec<ReturnRequest>, KernelError> {
        let tables = con.tables();
        Ok(tables
            .return_requests_with(status)
            .into_iter()
            .filter(|request| {
                tables
                    .orders
                    .get(request.order_id())
                    .is_some_and(|order| order.user_id() == borrower_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ReturnRequestModifier for InMemoryReturnRequestRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        request: &ReturnRequest,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?.insert_return_request(request.clone())
    }

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        request: &ReturnRequest,
        expected: &ReturnRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?
            .update_return_request_status(request.id(), *request.status(), expected)
    }
}
