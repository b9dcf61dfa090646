//! In-memory repository backend for tests and ephemeral use.
//!
//! [`MemoryProvider`] keeps raw posts, arbitrary files, and a pending change
//! log behind a single `Mutex`. Every operation, reads included, holds that
//! lock for its whole duration, so no caller ever observes a change log that
//! disagrees with the post list.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use quire_types::{ContentLayout, FileInfo, RawPost};
use tracing::{debug, trace};

use crate::error::{RepoError, RepoResult};
use crate::paths::{normalize, qualify, strip_folder};
use crate::traits::RepositoryProvider;
use crate::types::{FetchResult, RepositoryRef};

/// Sentinel returned by [`MemoryProvider::local_path`].
pub const MEMORY_LOCAL_PATH: &str = "memory://";

/// Full contents of a [`MemoryProvider`].
///
/// Mutating operations return a clone of this value as it was *before* the
/// mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryState {
    /// Newest first. Paths are relative to the posts folder.
    pub raw_posts: Vec<RawPost>,
    /// Change log in arrival order, posts-folder qualified.
    pub pending_changes: Vec<String>,
    pub files: BTreeMap<String, String>,
}

impl MemoryState {
    fn post(&self, path: &str) -> Option<&RawPost> {
        self.raw_posts.iter().find(|p| p.path == path)
    }
}

/// An in-memory implementation of [`RepositoryProvider`] with drain-once
/// fetch semantics.
#[derive(Debug)]
pub struct MemoryProvider {
    layout: ContentLayout,
    state: Mutex<MemoryState>,
}

impl MemoryProvider {
    /// Create an empty provider using the default posts folder.
    pub fn new() -> Self {
        Self::with_layout(ContentLayout::default())
    }

    pub fn with_layout(layout: ContentLayout) -> Self {
        Self {
            layout,
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Clone of the current state.
    pub fn state(&self) -> RepoResult<MemoryState> {
        Ok(self.lock()?.clone())
    }

    /// Insert or overwrite a non-post file and record the change.
    pub fn add_file(&self, path: &str, data: impl Into<String>) -> RepoResult<MemoryState> {
        let path = checked(path)?;
        let mut state = self.lock()?;
        let before = state.clone();
        state.files.insert(path.clone(), data.into());
        trace!(%path, "file added");
        state.pending_changes.push(path);
        Ok(before)
    }

    /// Prepend a raw post and record its qualified path.
    ///
    /// Does not deduplicate: adding a path that already exists leaves two
    /// entries. Use [`replace_post`](Self::replace_post) for add-or-replace.
    pub fn add_post(&self, mut raw: RawPost) -> RepoResult<MemoryState> {
        raw.path = checked(&raw.path)?;
        let change = qualify(&self.layout.posts_folder, &raw.path);
        let mut state = self.lock()?;
        let before = state.clone();
        trace!(path = %raw.path, "post added");
        state.raw_posts.insert(0, raw);
        state.pending_changes.push(change);
        Ok(before)
    }

    /// Remove every raw post at `path` and record the change.
    ///
    /// The change is recorded even when nothing was removed.
    pub fn delete_post(&self, path: &str) -> RepoResult<MemoryState> {
        let path = checked(path)?;
        let change = qualify(&self.layout.posts_folder, &path);
        let mut state = self.lock()?;
        let before = state.clone();
        state.raw_posts.retain(|p| p.path != path);
        trace!(%path, removed = before.raw_posts.len() - state.raw_posts.len(), "post deleted");
        state.pending_changes.push(change);
        Ok(before)
    }

    /// Add `raw`, replacing any existing post with the same path.
    pub fn replace_post(&self, mut raw: RawPost) -> RepoResult<MemoryState> {
        raw.path = checked(&raw.path)?;
        let change = qualify(&self.layout.posts_folder, &raw.path);
        let mut state = self.lock()?;
        let before = state.clone();
        state.raw_posts.retain(|p| p.path != raw.path);
        trace!(path = %raw.path, "post replaced");
        state.raw_posts.insert(0, raw);
        state.pending_changes.push(change);
        Ok(before)
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))
    }

    /// Post path relative to the posts folder, tolerating qualified input.
    fn post_path(&self, path: &str) -> String {
        strip_folder(path, &self.layout.posts_folder).unwrap_or_else(|| normalize(path))
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for MemoryProvider {
    fn fetch(&self, repo: &RepositoryRef) -> RepoResult<FetchResult> {
        let mut state = self.lock()?;
        if state.pending_changes.is_empty() {
            return Ok(FetchResult::NoUpdates);
        }
        let drained = std::mem::take(&mut state.pending_changes);
        debug!(repo = %repo, changes = drained.len(), "drained pending changes");
        Ok(FetchResult::from_changes(drained))
    }

    fn file_in(&self, path: &str) -> RepoResult<bool> {
        let path = self.post_path(path);
        Ok(self.lock()?.post(&path).is_some())
    }

    fn list_files(&self, subpath: &str) -> RepoResult<Vec<String>> {
        let prefix = normalize(subpath);
        let state = self.lock()?;
        let mut files: Vec<String> = state
            .raw_posts
            .iter()
            .map(|p| qualify(&self.layout.posts_folder, &p.path))
            .chain(state.files.keys().cloned())
            .filter(|p| is_under(p, &prefix))
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn read_file(&self, path: &str, folder: &str) -> RepoResult<Option<String>> {
        let state = self.lock()?;
        if folder == self.layout.posts_folder {
            // Already relative to the posts folder.
            Ok(state.post(&normalize(path)).map(|p| p.content.clone()))
        } else {
            Ok(state.files.get(&normalize(path)).cloned())
        }
    }

    fn file_info(&self, _repo: &RepositoryRef, path: &str) -> RepoResult<FileInfo> {
        let path = self.post_path(path);
        let state = self.lock()?;
        Ok(state
            .post(&path)
            .map(RawPost::info)
            .unwrap_or_else(FileInfo::placeholder))
    }

    fn local_path(&self) -> PathBuf {
        PathBuf::from(MEMORY_LOCAL_PATH)
    }
}

fn checked(path: &str) -> RepoResult<String> {
    let normalized = normalize(path);
    if normalized.is_empty() {
        return Err(RepoError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".into(),
        });
    }
    Ok(normalized)
}

fn is_under(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
