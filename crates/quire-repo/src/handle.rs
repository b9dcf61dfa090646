use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quire_types::FileInfo;

use crate::error::RepoResult;
use crate::traits::RepositoryProvider;
use crate::types::{FetchResult, RepositoryRef};

/// A provider paired with the repository it should act on.
///
/// Cheap to clone; clones share the same provider.
#[derive(Clone)]
pub struct RepositoryHandle {
    provider: Arc<dyn RepositoryProvider>,
    reference: RepositoryRef,
}

impl RepositoryHandle {
    pub fn new(provider: Arc<dyn RepositoryProvider>, reference: RepositoryRef) -> Self {
        Self {
            provider,
            reference,
        }
    }

    pub fn reference(&self) -> &RepositoryRef {
        &self.reference
    }

    pub fn fetch(&self) -> RepoResult<FetchResult> {
        self.provider.fetch(&self.reference)
    }

    pub fn file_in(&self, path: &str) -> RepoResult<bool> {
        self.provider.file_in(path)
    }

    pub fn list_files(&self, subpath: &str) -> RepoResult<Vec<String>> {
        self.provider.list_files(subpath)
    }

    pub fn read_file(&self, path: &str, folder: &str) -> RepoResult<Option<String>> {
        self.provider.read_file(path, folder)
    }

    pub fn file_info(&self, path: &str) -> RepoResult<FileInfo> {
        self.provider.file_info(&self.reference, path)
    }

    pub fn local_path(&self) -> PathBuf {
        self.provider.local_path()
    }
}

impl fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("reference", &self.reference)
            .field("local_path", &self.provider.local_path())
            .finish()
    }
}
