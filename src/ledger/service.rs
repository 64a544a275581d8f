//! Session-scoped ledger operations.

use std::sync::Arc;

use tracing::debug;

use super::{LedgerStore, MemoryLedger, NewTransaction, Transaction, TransactionId};
use crate::error::LedgerError;
use crate::session::SessionId;
use crate::Result;

/// The ledger as seen by one request: every operation is scoped to the
/// caller's session.
///
/// Store calls are blocking and run on tokio's blocking pool. Storage
/// failures are propagated unchanged; nothing is retried.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Ledger backed by a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryLedger::new()))
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn LedgerStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| LedgerError::Internal(format!("storage task failed: {}", e)))?
    }

    /// Validate `input`, normalize its sign and insert it under `session`.
    pub async fn append(&self, session: &SessionId, input: NewTransaction) -> Result<Transaction> {
        input.validate()?;
        let transaction = Transaction::create(session.clone(), input);
        let row = transaction.clone();
        self.blocking(move |store| store.append(&row)).await?;
        debug!(id = %transaction.id, amount = transaction.amount, "transaction appended");
        Ok(transaction)
    }

    /// All transactions of `session` in insertion order.
    pub async fn list_by_session(&self, session: &SessionId) -> Result<Vec<Transaction>> {
        let session = session.clone();
        self.blocking(move |store| store.list_by_session(&session)).await
    }

    /// Look up one transaction by its textual id.
    ///
    /// A malformed id is a validation error. An id that does not exist and
    /// an id owned by another session both yield `Ok(None)`.
    pub async fn get_one(&self, session: &SessionId, id: &str) -> Result<Option<Transaction>> {
        let id: TransactionId = id.parse()?;
        let session = session.clone();
        self.blocking(move |store| store.find(&session, &id)).await
    }

    /// Balance of `session`; zero when it has no transactions.
    ///
    /// A balance that overflows `f64` has no JSON number form and is
    /// reported as an internal error.
    pub async fn sum_by_session(&self, session: &SessionId) -> Result<f64> {
        let session = session.clone();
        let total = self
            .blocking(move |store| store.sum_by_session(&session))
            .await?;
        if !total.is_finite() {
            return Err(LedgerError::Internal("balance is not representable".into()));
        }
        Ok(total)
    }
}
