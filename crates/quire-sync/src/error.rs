use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("update failed: {0}")]
    Update(#[from] quire_update::UpdateError),

    #[error("invalid sync config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("check interval must be non-zero")]
    ZeroInterval,

    #[error("sync worker stopped")]
    WorkerStopped,

    #[error("sync cycle aborted: {0}")]
    CycleAborted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
