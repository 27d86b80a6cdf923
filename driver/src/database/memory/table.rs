use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use kernel::prelude::entity::{
    BuyRequest, BuyRequestId, BuyRequestStatus, Category, CategoryId, Feedback, FeedbackId,
    Order, OrderId, Product, ProductId, ReturnRequest, ReturnRequestId, ReturnRequestStatus,
    UserId,
};

/// Multi-valued secondary index.
#[derive(Debug, Clone)]
pub(super) struct Index<K, V> {
    entries: HashMap<K, HashSet<V>>,
}

impl<K, V> Default for Index<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Index<K, V> {
    pub(super) fn insert(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().insert(value);
    }

    pub(super) fn remove(&mut self, key: &K, value: &V) {
        if let Some(values) = self.entries.get_mut(key) {
            values.remove(value);
            if values.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    pub(super) fn get(&self, key: &K) -> impl Iterator<Item = &V> {
        self.entries.get(key).into_iter().flatten()
    }
}

/// Primary maps and the indexes derived from them. Only the write routines of
/// the repository modules touch the indexes, and they update them in the same
/// call as the primary map.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(super) products: HashMap<ProductId, Product>,
    pub(super) categories: HashMap<CategoryId, Category>,

    pub(super) buy_requests: HashMap<BuyRequestId, BuyRequest>,
    pub(super) buy_requests_by_status: Index<BuyRequestStatus, BuyRequestId>,
    pub(super) pending_buy_requests: HashMap<(ProductId, UserId), BuyRequestId>,

    pub(super) orders: HashMap<OrderId, Order>,
    pub(super) orders_by_borrower: Index<UserId, OrderId>,
    pub(super) orders_by_lender: Index<UserId, OrderId>,

    pub(super) return_requests: HashMap<ReturnRequestId, ReturnRequest>,
    pub(super) return_requests_by_status: Index<ReturnRequestStatus, ReturnRequestId>,
    pub(super) pending_return_requests: HashMap<OrderId, ReturnRequestId>,

    pub(super) feedbacks: HashMap<FeedbackId, Feedback>,
    pub(super) feedbacks_by_giver: Index<UserId, FeedbackId>,
    pub(super) feedbacks_by_receiver: Index<UserId, FeedbackId>,
}

#[cfg(test)]
mod test {
    use crate::database::memory::table::Index;

    #[test]
    fn removing_last_value_drops_key() {
        let mut index = Index::default();
        index.insert("pending", 1);
        index.insert("pending", 2);
        index.remove(&"pending", &1);
        assert_eq!(index.get(&"pending").collect::<Vec<_>>(), vec![&2]);
        index.remove(&"pending", &2);
        assert_eq!(index.get(&"pending").count(), 0);
        assert!(index.entries.is_empty());
    }
}
