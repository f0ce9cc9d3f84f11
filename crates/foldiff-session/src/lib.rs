//! Live diff session for foldiff.
//!
//! A [`DiffSession`] watches two documents and a set of diff options, and
//! keeps a published [`SessionState`] consistent with them: after a burst of
//! edits settles it asks the diff provider for a fresh diff, derives the
//! foldable unchanged regions, carries the user's fold state over from the
//! previous regions, and publishes everything as one update. Superseded
//! computations are cancelled and their results dropped.

pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::DiffSession;
pub use state::{RegionSet, SessionState, Transaction};
