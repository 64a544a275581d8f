//! # session-ledger
//!
//! Minimal personal finance ledger served over HTTP.
//!
//! Clients record credit and debit entries and read them back. There are no
//! accounts: each browser gets an unguessable session token in a cookie, and
//! that token partitions the ledger. Whoever presents the token owns the
//! partition.
//!
//! ## Features
//!
//! - **Anonymous sessions**: random tokens minted on first write, valid 7 days
//! - **Signed amounts**: credits are stored positive, debits negative
//! - **Append-only**: transactions are never edited or deleted
//! - **SQLite storage**: one `transactions` table indexed by session
//!
//! ## Quick Start
//!
//! ```no_run
//! use session_ledger::{Ledger, NewTransaction, SessionId};
//!
//! #[tokio::main]
//! async fn main() -> session_ledger::Result<()> {
//!     let ledger = Ledger::in_memory();
//!     let session = SessionId::generate();
//!
//!     ledger.append(&session, NewTransaction::credit("Salary", 5000.0)).await?;
//!     ledger.append(&session, NewTransaction::debit("Rent", 1200.0)).await?;
//!
//!     println!("balance: {}", ledger.sum_by_session(&session).await?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use ledger::{
    Ledger, LedgerStore, MemoryLedger, NewTransaction, SqliteLedger, Transaction, TransactionId,
    TransactionType,
};
pub use session::{ResolvedSession, SessionId};
