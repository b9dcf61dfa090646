//! Change-path normalization and posts-folder classification.
//!
//! Paths are `/`-separated and relative to the repository root. After
//! [`normalize`] two paths name the same file iff they are byte-equal.

use std::collections::BTreeSet;

use crate::error::RepoResult;

/// Canonical form of a repository path.
///
/// Backslashes become `/`, empty and `.` segments are dropped, so
/// `"./posts//a.md"` and `"/posts/a.md"` both become `"posts/a.md"`.
pub fn normalize(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Remainder of `path` below `folder`, or `None` when the first segment
/// is not exactly `folder` or nothing follows it.
pub fn strip_folder(path: &str, folder: &str) -> Option<String> {
    let normalized = normalize(path);
    let (head, rest) = normalized.split_once('/')?;
    (head == folder && !rest.is_empty()).then(|| rest.to_string())
}

/// Prefix `path` with `folder`.
pub fn qualify(folder: &str, path: &str) -> String {
    let path = normalize(path);
    if folder.is_empty() {
        path
    } else {
        format!("{}/{path}", normalize(folder))
    }
}

/// Changed paths split by whether the provider still has them.
///
/// Every input path lands in exactly one of the two sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    /// Paths the provider currently recognizes as existing posts.
    pub present: BTreeSet<String>,
    /// Everything else: deleted posts and non-post files.
    pub absent: BTreeSet<String>,
}

impl Partition {
    /// Present paths under `folder`, with the folder stripped.
    pub fn present_posts(&self, folder: &str) -> Vec<String> {
        posts_under(&self.present, folder)
    }

    /// Absent paths under `folder`, with the folder stripped.
    pub fn absent_posts(&self, folder: &str) -> Vec<String> {
        posts_under(&self.absent, folder)
    }
}

/// Split `paths` using `exists` as the live existence check.
///
/// Errors from `exists` abort the partition.
pub fn partition<F>(paths: &BTreeSet<String>, mut exists: F) -> RepoResult<Partition>
where
    F: FnMut(&str) -> RepoResult<bool>,
{
    let mut out = Partition::default();
    for path in paths {
        if exists(path.as_str())? {
            out.present.insert(path.clone());
        } else {
            out.absent.insert(path.clone());
        }
    }
    Ok(out)
}

fn posts_under(paths: &BTreeSet<String>, folder: &str) -> Vec<String> {
    let stripped: BTreeSet<String> = paths.iter().filter_map(|p| strip_folder(p, folder)).collect();
    stripped.into_iter().collect()
}
