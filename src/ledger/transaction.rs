//! Transaction data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::session::SessionId;

/// Unique identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TransactionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    /// Only the hyphenated form produced by `Display` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::validation(format!("id must be a uuid, got '{}'", s));
        if s.len() != 36 {
            return Err(invalid());
        }
        Uuid::parse_str(s).map(TransactionId).map_err(|_| invalid())
    }
}

/// Whether a transaction adds to or takes from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Apply this type's sign to an unsigned magnitude.
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            Self::Credit => magnitude,
            Self::Debit => -magnitude,
        }
    }
}

/// Caller input for a new transaction, before sign normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub kind: TransactionType,
}

impl NewTransaction {
    pub fn new(title: impl Into<String>, amount: f64, kind: TransactionType) -> Self {
        Self {
            title: title.into(),
            amount,
            kind,
        }
    }

    pub fn credit(title: impl Into<String>, amount: f64) -> Self {
        Self::new(title, amount, TransactionType::Credit)
    }

    pub fn debit(title: impl Into<String>, amount: f64) -> Self {
        Self::new(title, amount, TransactionType::Debit)
    }

    /// Check the input before anything is written.
    ///
    /// The magnitude must be finite and strictly positive so that the
    /// stored sign alone identifies credit or debit.
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.is_empty() {
            return Err(LedgerError::validation("title must not be empty"));
        }
        if !self.amount.is_finite() {
            return Err(LedgerError::validation("amount must be a finite number"));
        }
        if self.amount <= 0.0 {
            return Err(LedgerError::validation("amount must be greater than zero"));
        }
        Ok(())
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    /// Signed amount: positive for credit, negative for debit.
    pub amount: f64,
    #[serde(serialize_with = "serialize_session")]
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build the stored form of `input`, normalizing the sign.
    pub fn create(session_id: SessionId, input: NewTransaction) -> Self {
        Self {
            id: TransactionId::new(),
            amount: input.kind.signed(input.amount),
            title: input.title,
            session_id,
            created_at: Utc::now(),
        }
    }

    /// Type derived from the stored sign.
    pub fn kind(&self) -> TransactionType {
        if self.amount < 0.0 {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        }
    }

    /// Unsigned magnitude of the amount.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

fn serialize_session<S: serde::Serializer>(id: &SessionId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.as_str())
}
