//! Seeding a [`MemoryProvider`] from a directory on disk.

use std::path::Path;

use anyhow::Context;
use quire_repo::paths::{normalize, strip_folder};
use quire_repo::MemoryProvider;
use quire_types::RawPost;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counts of what was loaded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub posts: usize,
    pub files: usize,
    pub skipped: usize,
}

/// Load every file under `dir` into `provider`.
///
/// Files in the posts folder become raw posts; everything else is a plain
/// file. Files that are not valid UTF-8 are skipped.
pub fn seed_from_dir(provider: &MemoryProvider, dir: &Path, author: &str) -> anyhow::Result<SeedSummary> {
    let folder = provider.layout().posts_folder.clone();
    let mut summary = SeedSummary::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("{} is outside {}", entry.path().display(), dir.display()))?;
        let path = normalize(&relative.to_string_lossy());

        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            warn!(%path, "not UTF-8, skipping");
            summary.skipped += 1;
            continue;
        };

        match strip_folder(&path, &folder) {
            Some(post_path) => {
                provider.replace_post(RawPost::new(author, post_path, content))?;
                summary.posts += 1;
            }
            None => {
                provider.add_file(&path, content)?;
                summary.files += 1;
            }
        }
        debug!(%path, "seeded");
    }
    Ok(summary)
}
