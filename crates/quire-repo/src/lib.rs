//! Repository provider contract for Quire.
//!
//! A content backend (in-memory, git on disk, remote git) exposes the
//! [`RepositoryProvider`] capability set. The updater only ever talks to a
//! backend through a [`RepositoryHandle`].
//!
//! # Backends
//!
//! - [`MemoryProvider`] -- mutex-serialized store for tests and embedding
//!
//! # Contract
//!
//! 1. `fetch` drains: a batch of changes is delivered to exactly one caller.
//! 2. Change paths carry no operation tag; existence is re-checked with
//!    `file_in` against live content.
//! 3. A missing file is `Ok(None)` from `read_file`, never an error.
//! 4. Backend failures are propagated as [`RepoError`], never masked.

pub mod error;
pub mod handle;
pub mod memory;
pub mod paths;
pub mod traits;
pub mod types;

pub use error::{RepoError, RepoResult};
pub use handle::RepositoryHandle;
pub use memory::{MemoryProvider, MemoryState, MEMORY_LOCAL_PATH};
pub use paths::Partition;
pub use traits::RepositoryProvider;
pub use types::{FetchResult, RepositoryRef};
