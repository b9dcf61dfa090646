use quire_repo::RepoError;
use thiserror::Error;

/// Errors that abort a reconciliation cycle.
///
/// Any error means no new snapshot was produced; the caller keeps serving
/// the previous one.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("failed to compile post {path}: {reason}")]
    Compile { path: String, reason: String },

    #[error("invalid configuration in {path}: {reason}")]
    Configuration { path: String, reason: String },
}

pub type UpdateResult<T> = Result<T, UpdateError>;
