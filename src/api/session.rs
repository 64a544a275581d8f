//! Cookie transport for the session identity.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};

use super::handlers::AppState;
use super::types::{api_error, ApiError};
use crate::error::LedgerError;
use crate::session::{self, ResolvedSession, SessionId, DEFAULT_SESSION_MAX_AGE};

/// Default name of the cookie carrying the session token.
pub const DEFAULT_COOKIE_NAME: &str = "sessionId";

/// How the session token travels between client and server.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    /// Validity window handed to the client for minted tokens.
    pub max_age: Duration,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            max_age,
        }
    }

    /// Read this cookie's value from the request headers.
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value)
    }

    /// `Set-Cookie` value asking the client to carry `id` site-wide.
    pub fn set_cookie_value(&self, id: &SessionId) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name,
            id,
            self.max_age.as_secs()
        )
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME, DEFAULT_SESSION_MAX_AGE)
    }
}

/// An identity the request already carries. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct ActiveSession(pub SessionId);

impl FromRequestParts<AppState> for ActiveSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .cookie
            .read(&parts.headers)
            .and_then(SessionId::from_token)
            .map(ActiveSession)
            .ok_or_else(|| api_error(LedgerError::SessionRequired))
    }
}

/// The carried identity, or a freshly minted one.
#[derive(Debug, Clone)]
pub struct CallerSession(pub ResolvedSession);

impl FromRequestParts<AppState> for CallerSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CallerSession(session::resolve(
            state.cookie.read(&parts.headers),
        )))
    }
}
