//! Append-only, index-addressed transaction storage.
//!
//! Ids are insertion indices. Index assignment and the push happen under the
//! same write guard, so concurrent creates never share or skip an id and
//! readers only ever see a fully appended prefix.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Transaction, TransactionId};

#[derive(Clone, Default)]
pub struct TransactionStore {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its id. Field contents are not validated.
    pub async fn create(
        &self,
        currency: impl Into<Value>,
        amount: impl Into<Value>,
        product: impl Into<Value>,
    ) -> TransactionId {
        let transaction = Transaction::new(currency, amount, product);

        let mut transactions = self.transactions.write().await;
        let id = transactions.len() as TransactionId;
        transactions.push(transaction);
        id
    }

    /// Stored record for `id`, or the placeholder when `id` is negative or
    /// past the end.
    pub async fn lookup(&self, id: i64) -> Transaction {
        let transactions = self.transactions.read().await;

        usize::try_from(id)
            .ok()
            .and_then(|index| transactions.get(index))
            .cloned()
            .unwrap_or_else(Transaction::placeholder)
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
