//! Storage backends for the ledger.

use std::sync::RwLock;

use super::{Transaction, TransactionId};
use crate::error::LedgerError;
use crate::session::SessionId;
use crate::Result;

/// Durable table of transactions, partitioned by session.
///
/// Implementations must make `append` a single atomic insert and return
/// rows of one session in insertion order.
pub trait LedgerStore: Send + Sync {
    /// Insert one transaction.
    fn append(&self, transaction: &Transaction) -> Result<()>;

    /// All transactions of a session, oldest first.
    fn list_by_session(&self, session: &SessionId) -> Result<Vec<Transaction>>;

    /// The transaction with `id`, only if it belongs to `session`.
    fn find(&self, session: &SessionId, id: &TransactionId) -> Result<Option<Transaction>>;

    /// Sum of signed amounts of a session; `0.0` when it has none.
    fn sum_by_session(&self, session: &SessionId) -> Result<f64>;
}

/// In-process store keeping rows in insertion order.
pub struct MemoryLedger {
    rows: RwLock<Vec<Transaction>>,
}

impl MemoryLedger {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Storage("ledger lock poisoned".into())
}

impl LedgerStore for MemoryLedger {
    fn append(&self, transaction: &Transaction) -> Result<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.push(transaction.clone());
        Ok(())
    }

    fn list_by_session(&self, session: &SessionId) -> Result<Vec<Transaction>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .iter()
            .filter(|t| &t.session_id == session)
            .cloned()
            .collect())
    }

    fn find(&self, session: &SessionId, id: &TransactionId) -> Result<Option<Transaction>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .iter()
            .find(|t| &t.id == id && &t.session_id == session)
            .cloned())
    }

    fn sum_by_session(&self, session: &SessionId) -> Result<f64> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .iter()
            .filter(|t| &t.session_id == session)
            .fold(0.0, |total, t| total + t.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NewTransaction;

    fn sid(token: &str) -> SessionId {
        SessionId::from_token(token).unwrap()
    }

    #[test]
    fn test_append_and_find() {
        let store = MemoryLedger::new();
        let tx = Transaction::create(sid("a"), NewTransaction::credit("Gift", 20.0));
        store.append(&tx).unwrap();

        assert_eq!(store.list_by_session(&sid("a")).unwrap().len(), 1);
        assert_eq!(store.find(&sid("a"), &tx.id).unwrap(), Some(tx));
    }

    #[test]
    fn test_find_other_session() {
        let store = MemoryLedger::new();
        let tx = Transaction::create(sid("a"), NewTransaction::credit("Gift", 20.0));
        store.append(&tx).unwrap();

        assert!(store.find(&sid("b"), &tx.id).unwrap().is_none());
        assert!(store.find(&sid("a"), &TransactionId::new()).unwrap().is_none());
    }

    #[test]
    fn test_list_is_partitioned_and_ordered() {
        let store = MemoryLedger::new();
        let first = Transaction::create(sid("a"), NewTransaction::credit("one", 1.0));
        let other = Transaction::create(sid("b"), NewTransaction::credit("other", 9.0));
        let second = Transaction::create(sid("a"), NewTransaction::debit("two", 2.0));
        for tx in [&first, &other, &second] {
            store.append(tx).unwrap();
        }

        let listed = store.list_by_session(&sid("a")).unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let store = MemoryLedger::new();
        let total = store.sum_by_session(&sid("nobody")).unwrap();
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
    }

    #[test]
    fn test_concurrent_append() {
        use std::collections::HashSet;
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryLedger::new());
        let mut handles = vec![];

        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let tx = Transaction::create(sid("shared"), NewTransaction::credit("same", 1.0));
                store.append(&tx).unwrap();
                tx.id
            }));
        }

        let ids: HashSet<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(store.sum_by_session(&sid("shared")).unwrap(), 100.0);
    }

    #[test]
    fn test_poisoned_lock_is_storage_error() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryLedger::new());
        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = poisoner.rows.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = store.sum_by_session(&sid("a")).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert!(store.list_by_session(&sid("a")).is_err());
    }
}
