//! Session identifier type.

use std::fmt;

use uuid::Uuid;

/// Opaque partition key that scopes every ledger query to one caller.
///
/// Minted tokens are random v4 UUIDs. Presented tokens are trusted as-is:
/// any non-empty string is a valid partition key, and there is no session
/// table to check it against.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a new unguessable session token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token presented by a caller.
    ///
    /// Returns `None` for an empty token, which counts as no identity.
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Tokens are bearer secrets; keep them out of debug output and logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(..)")
    }
}
