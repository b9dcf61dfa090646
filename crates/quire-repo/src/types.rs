use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of draining a provider's pending change set.
///
/// Each value is terminal: callers re-invoke `fetch` for a fresh result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchResult {
    #[default]
    NoUpdates,
    /// Paths changed since the previous fetch. Carries no add/delete tag.
    Updates(BTreeSet<String>),
}

impl FetchResult {
    /// Build from an ordered change log, collapsing duplicates.
    ///
    /// An empty log yields [`FetchResult::NoUpdates`].
    pub fn from_changes<I, S>(changes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: BTreeSet<String> = changes.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            Self::NoUpdates
        } else {
            Self::Updates(paths)
        }
    }

    pub fn has_updates(&self) -> bool {
        matches!(self, Self::Updates(_))
    }

    /// Changed paths, or `None` when nothing changed.
    pub fn into_paths(self) -> Option<BTreeSet<String>> {
        match self {
            Self::NoUpdates => None,
            Self::Updates(paths) => Some(paths),
        }
    }
}

/// Provider-specific repository reference: a store name, a working
/// directory, or a remote URL depending on the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryRef(String);

impl RepositoryRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
