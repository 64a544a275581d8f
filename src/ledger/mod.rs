//! Session-scoped transaction ledger.
//!
//! Transactions are immutable and append-only. The sign of the stored
//! amount is the only record of whether an entry was a credit or a debit.

mod service;
mod sqlite;
mod store;
mod transaction;

pub use service::Ledger;
pub use sqlite::SqliteLedger;
pub use store::{LedgerStore, MemoryLedger};
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionType};
