use error_stack::Report;

use kernel::interface::query::BuyRequestQuery;
use kernel::interface::update::BuyRequestModifier;
use kernel::prelude::entity::{BuyRequest, BuyRequestId, BuyRequestStatus, ProductId, UserId};
use kernel::KernelError;

use crate::database::memory::table::Tables;
use crate::database::memory::MemoryTransaction;

pub struct InMemoryBuyRequestRepository;

#[async_trait::async_trait]
impl BuyRequestQuery for InMemoryBuyRequestRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BuyRequestId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        Ok(con.tables().buy_requests.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
        product_id: Option<&ProductId>,
        status: Option<&BuyRequestStatus>,
    ) -> error_stack::Result<Vec<BuyRequest>, KernelError> {
        let tables = con.tables();
        let candidates: Vec<&BuyRequest> = match status {
            Some(status) => tables
                .buy_requests_by_status
                .get(status)
                .filter_map(|id| tables.buy_requests.get(id))
                .collect(),
            None => tables.buy_requests.values().collect(),
        };
        let mut found: Vec<BuyRequest> = candidates
            .into_iter()
            .filter(|request| product_id.map_or(true, |id| request.product_id() == id))
            .cloned()
            .collect();
        found.sort_by_key(|request| *request.created_at().as_ref());
        Ok(found)
    }

    async fn find_pending(
        &self,
        con: &mut MemoryTransaction,
        product_id: &ProductId,
        requested_by: &UserId,
    ) -> error_stack::Result<Option<BuyRequest>, KernelError> {
        let tables = con.tables();
        let key = (product_id.clone(), requested_by.clone());
        Ok(tables
            .pending_buy_requests
            .get(&key)
            .and_then(|id| tables.buy_requests.get(id))
            .cloned())
    }
}

#[async_trait::async_trait]
impl BuyRequestModifier for InMemoryBuyRequestRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        request: &BuyRequest,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?.insert_buy_request(request.clone())
    }

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        request: &BuyRequest,
        expected: &BuyRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        con.tables_mut()?
            .update_buy_request_status(request.id(), *request.status(), expected)
    }
}

impl Tables {
    fn insert_buy_request(&mut self, request: BuyRequest) -> error_stack::Result<(), KernelError> {
        let id = request.id().clone();
        if self.buy_requests.contains_key(&id) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("buy request {} already exists", id.as_ref())));
        }
        let key = (request.product_id().clone(), request.requested_by().clone());
        if *request.status() == BuyRequestStatus::Pending {
            if self.pending_buy_requests.contains_key(&key) {
                return Err(Report::new(KernelError::Conflict)
                    .attach_printable("pending buy request already exists for requester"));
            }
            self.pending_buy_requests.insert(key, id.clone());
        }
        self.buy_requests_by_status
            .insert(*request.status(), id.clone());
        self.buy_requests.insert(id, request);
        Ok(())
    }

    fn update_buy_request_status(
        &mut self,
        id: &BuyRequestId,
        status: BuyRequestStatus,
        expected: &BuyRequestStatus,
    ) -> error_stack::Result<(), KernelError> {
        let stored = self
            .buy_requests
            .get_mut(id)
            .filter(|stored| stored.status() == expected)
            .ok_or_else(|| {
                Report::new(KernelError::Concurrency).attach_printable(format!(
                    "buy request {} is no longer {expected}",
                    id.as_ref()
                ))
            })?;
        stored.substitute(|stored| *stored.status = status);

        let key = (stored.product_id().clone(), stored.requested_by().clone());
        self.buy_requests_by_status.remove(expected, id);
        self.buy_requests_by_status.insert(status, id.clone());
        if *expected == BuyRequestStatus::Pending {
            self.pending_buy_requests.remove(&key);
        }
        if status == BuyRequestStatus::Pending {
            self.pending_buy_requests.insert(key, id.clone());
        }
        Ok(())
    }
}
