//! Per-user sessions of pending clips.
//!
//! A session is the insertion-ordered list of clips a user has sent since
//! the last merge or reset. The [`SessionStore`] is the only piece of state
//! shared between concurrently handled transport events; all mutation goes
//! through its atomic per-user operations.

mod store;
mod types;

pub use store::{DrainOutcome, SessionStore};
pub use types::{ClipRef, UserId};
