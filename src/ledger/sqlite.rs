//! SQLite-backed ledger store.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use uuid::Uuid;

use super::{LedgerStore, Transaction, TransactionId};
use crate::session::SessionId;
use crate::Result;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS transactions (
        id          TEXT PRIMARY KEY,
        session_id  TEXT NOT NULL,
        title       TEXT NOT NULL,
        amount      REAL NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_session ON transactions(session_id);";

/// Read-only connections opened next to the writer for file databases.
const READER_CONNECTIONS: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ledger store persisted in a single SQLite `transactions` table.
///
/// Rows are returned in rowid order, which is insertion order. Writes go
/// through one connection; file databases also keep a few read-only WAL
/// connections so reads do not queue behind each other or behind a write.
pub struct SqliteLedger {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl SqliteLedger {
    /// Open (or create) the database at `path`.
    ///
    /// The special path `:memory:` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        let mut ledger = Self::with_connection(conn)?;

        // Opened after the schema exists
        for _ in 0..READER_CONNECTIONS {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            reader.busy_timeout(BUSY_TIMEOUT)?;
            ledger.readers.push(Mutex::new(reader));
        }
        Ok(ledger)
    }

    /// Open a non-durable in-memory database.
    ///
    /// The database is private to one connection, so reads share the writer.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            writer: Mutex::new(conn),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
        })
    }

    /// A connection for queries: an idle reader if there is one, else the
    /// next reader in turn.
    fn reader(&self) -> MutexGuard<'_, Connection> {
        if self.readers.is_empty() {
            return self.writer.lock();
        }
        if let Some(idle) = self.readers.iter().find_map(|r| r.try_lock()) {
            return idle;
        }
        let next = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[next].lock()
    }
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: String = row.get(0)?;
    let session_id: String = row.get(1)?;
    let created_at: String = row.get(4)?;

    Ok(Transaction {
        id: Uuid::parse_str(&id)
            .map(TransactionId::from)
            .map_err(|e| conversion_error(0, e))?,
        session_id: SessionId::from_token(session_id)
            .ok_or_else(|| rusqlite::Error::InvalidColumnType(1, "session_id".into(), Type::Text))?,
        title: row.get(2)?,
        amount: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_error(4, e))?,
    })
}

impl LedgerStore for SqliteLedger {
    fn append(&self, transaction: &Transaction) -> Result<()> {
        let conn = self.writer.lock();
        conn.execute(
            "INSERT INTO transactions (id, session_id, title, amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transaction.id.to_string(),
                transaction.session_id.as_str(),
                transaction.title,
                transaction.amount,
                transaction.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list_by_session(&self, session: &SessionId) -> Result<Vec<Transaction>> {
        let conn = self.reader();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, title, amount, created_at FROM transactions
             WHERE session_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![session.as_str()], row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn find(&self, session: &SessionId, id: &TransactionId) -> Result<Option<Transaction>> {
        let conn = self.reader();
        let found = conn
            .query_row(
                "SELECT id, session_id, title, amount, created_at FROM transactions
                 WHERE id = ?1 AND session_id = ?2",
                params![id.to_string(), session.as_str()],
                row_to_transaction,
            )
            .optional()?;
        Ok(found)
    }

    fn sum_by_session(&self, session: &SessionId) -> Result<f64> {
        let conn = self.reader();
        // Folded in rowid order so the total matches a sum over the listing
        let mut stmt = conn.prepare(
            "SELECT amount FROM transactions WHERE session_id = ?1 ORDER BY rowid ASC",
        )?;
        let mut rows = stmt.query(params![session.as_str()])?;
        let mut total = 0.0;
        while let Some(row) = rows.next()? {
            total += row.get::<_, f64>(0)?;
        }
        Ok(total)
    }
}
