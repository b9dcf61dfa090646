//! Error types for repository provider operations.

use thiserror::Error;

/// Errors raised by repository backends.
///
/// A missing file is not an error: [`read_file`](crate::RepositoryProvider::read_file)
/// reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The backend's shared state lock was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// The path cannot be addressed inside the repository.
    #[error("invalid path: {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Transport or storage failure inside a concrete backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
