//! Session identity resolution.

use std::time::Duration;

use super::SessionId;

/// Default validity window of a minted session token (7 days).
pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Outcome of resolving the identity of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// The partition key to use for this request.
    pub id: SessionId,
    /// Whether the token was minted for this request. When set, the caller
    /// must be told to carry it on future requests.
    pub is_new: bool,
}

/// Resolve the session identity from the token a request carries.
///
/// A present token is trusted without any existence check. An absent or
/// empty token yields a freshly minted one. This never fails.
pub fn resolve(presented: Option<&str>) -> ResolvedSession {
    match presented.and_then(SessionId::from_token) {
        Some(id) => ResolvedSession { id, is_new: false },
        None => ResolvedSession {
            id: SessionId::generate(),
            is_new: true,
        },
    }
}
