//! Session identity module.
//!
//! A session is nothing more than an unguessable token used as a partition
//! key. No session record is stored server-side.

mod id;
mod resolver;

pub use id::SessionId;
pub use resolver::{resolve, ResolvedSession, DEFAULT_SESSION_MAX_AGE};
