//! Error types for the diff crate.

/// Errors that can occur while computing a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The caller abandoned the computation.
    #[error("diff computation cancelled")]
    Cancelled,

    /// The provider failed for a reason of its own.
    #[error("diff provider failed: {0}")]
    Provider(String),

    /// The blocking worker running the diff panicked or was aborted.
    #[error("diff worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
