//! Update reconciliation for Quire.
//!
//! The [`Updater`] drains a repository's pending changes and derives a new
//! [`CacheSnapshot`](quire_types::CacheSnapshot) from the current one:
//!
//! 1. Changed paths are split by a live existence check (`file_in`).
//! 2. Posts-folder paths that still exist are compiled and merged over the
//!    existing posts; those that do not are removed.
//! 3. Site configuration is reloaded wholesale when a configuration file
//!    changed.
//!
//! Compilation, naming and configuration loading sit behind the traits in
//! [`traits`] so backends and renderers can supply their own.

pub mod compiler;
pub mod configuration;
pub mod error;
pub mod names;
pub mod traits;
pub mod updater;

pub use compiler::SourceCompiler;
pub use configuration::TomlConfigurations;
pub use error::{UpdateError, UpdateResult};
pub use names::PathNames;
pub use traits::{ConfigurationSource, NameDeriver, PostCompiler};
pub use updater::{UpdateOutcome, Updater};
