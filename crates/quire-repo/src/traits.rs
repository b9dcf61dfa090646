//! The [`RepositoryProvider`] trait every content backend implements.

use std::path::PathBuf;

use quire_types::FileInfo;

use crate::error::RepoResult;
use crate::types::{FetchResult, RepositoryRef};

/// Capability set a content backend exposes to the updater.
///
/// Implementations must be thread-safe (`Send + Sync`) and give every
/// operation the same meaning regardless of where content lives:
///
/// - `fetch` drains the pending change set. A second call with no mutation
///   in between returns [`FetchResult::NoUpdates`]. Network backends must
///   bound their own fetch time and document their retry policy.
/// - `file_in` answers from current content, not from the change log.
/// - `read_file` reports a missing file as `Ok(None)`, never as an error.
pub trait RepositoryProvider: Send + Sync {
    /// Return and consume the changes recorded since the previous fetch.
    fn fetch(&self, repo: &RepositoryRef) -> RepoResult<FetchResult>;

    /// Whether a post exists at `path` right now.
    fn file_in(&self, path: &str) -> RepoResult<bool>;

    /// All known files under `subpath`, sorted. Pass `""` for the root.
    fn list_files(&self, subpath: &str) -> RepoResult<Vec<String>>;

    /// Read a tracked file. `folder` selects the namespace the path is
    /// relative to: the posts folder, or anything else for repository-root
    /// paths.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    fn read_file(&self, path: &str, folder: &str) -> RepoResult<Option<String>>;

    /// Authorship metadata, or [`FileInfo::placeholder`] when unknown.
    fn file_info(&self, repo: &RepositoryRef, path: &str) -> RepoResult<FileInfo>;

    /// Filesystem location for collaborators that read from disk.
    /// Memory-backed providers return a sentinel.
    fn local_path(&self) -> PathBuf;
}
