//! Foundation types for Quire.
//!
//! Quire keeps an in-memory cache of compiled blog posts and site
//! configuration in sync with a git-like content repository. This crate holds
//! the value types every other crate exchanges:
//!
//! - [`Post`] / [`PostKey`] -- a compiled content unit keyed by language and slug
//! - [`PostCache`] -- language -> name -> post mapping owned by the caller
//! - [`Configuration`] / [`ConfigurationList`] -- site-wide settings
//! - [`CacheSnapshot`] -- the posts and configurations served together
//! - [`RawPost`] / [`FileInfo`] -- uncompiled repository content and metadata
//! - [`ContentLayout`] -- posts-folder and language conventions
//!
//! All types are plain values. Nothing here performs I/O.

pub mod cache;
pub mod config;
pub mod layout;
pub mod post;
pub mod raw;

pub use cache::{CacheSnapshot, PostCache};
pub use config::{Configuration, ConfigurationList};
pub use layout::ContentLayout;
pub use post::{Post, PostKey};
pub use raw::{FileInfo, RawPost};
