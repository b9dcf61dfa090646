//! Collaborator boundaries the [`Updater`](crate::Updater) depends on.
//!
//! Post compilation, name derivation and configuration parsing live outside
//! the reconciliation logic. The crate ships reference implementations
//! ([`SourceCompiler`](crate::SourceCompiler), [`PathNames`](crate::PathNames),
//! [`TomlConfigurations`](crate::TomlConfigurations)); richer ones plug in
//! through these traits.

use std::collections::BTreeSet;

use quire_repo::RepositoryHandle;
use quire_types::{ConfigurationList, PostCache, PostKey};

use crate::error::UpdateResult;

/// Builds posts from source files.
pub trait PostCompiler: Send + Sync {
    /// Compile the given paths (relative to the posts folder) into a
    /// language -> name -> post mapping.
    fn compile_posts(&self, paths: &[String], repo: &RepositoryHandle) -> UpdateResult<PostCache>;
}

/// Maps post source paths to cache keys.
pub trait NameDeriver: Send + Sync {
    /// Keys for the given paths (relative to the posts folder). Paths that
    /// do not name a post are skipped.
    fn names_from_paths(&self, paths: &[String]) -> Vec<PostKey>;
}

/// Detects and loads site configuration.
pub trait ConfigurationSource: Send + Sync {
    /// Whether any of the changed repository paths is a configuration file.
    fn configuration_changed(&self, changed: &BTreeSet<String>) -> bool;

    /// Load the complete configuration list from the repository.
    fn load_configuration(&self, repo: &RepositoryHandle) -> UpdateResult<ConfigurationList>;
}
