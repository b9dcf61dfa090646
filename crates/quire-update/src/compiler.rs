use std::fmt;
use std::sync::Arc;

use quire_repo::paths::qualify;
use quire_repo::RepositoryHandle;
use quire_types::{ContentLayout, Post, PostCache, PostKey};
use tracing::warn;

use crate::error::UpdateResult;
use crate::names::PathNames;
use crate::traits::{NameDeriver, PostCompiler};

/// Reference compiler: reads each source from the posts folder and splits
/// off the first `# ` heading as the title.
///
/// Author and timestamps come from the provider's `file_info`. Sources that
/// vanished after classification are skipped. Keys come from the same
/// [`NameDeriver`] the updater uses for deletions.
#[derive(Clone)]
pub struct SourceCompiler {
    posts_folder: String,
    names: Arc<dyn NameDeriver>,
}

impl SourceCompiler {
    pub fn new(layout: &ContentLayout) -> Self {
        Self::with_names(layout, Arc::new(PathNames::new(layout)))
    }

    pub fn with_names(layout: &ContentLayout, names: Arc<dyn NameDeriver>) -> Self {
        Self {
            posts_folder: layout.posts_folder.clone(),
            names,
        }
    }

    fn compile_one(&self, path: &str, repo: &RepositoryHandle) -> UpdateResult<Option<Post>> {
        let Some(key) = self.names.names_from_paths(&[path.to_string()]).into_iter().next() else {
            warn!(%path, "no post name derivable, skipping");
            return Ok(None);
        };
        let Some(source) = repo.read_file(path, &self.posts_folder)? else {
            warn!(%path, "post source disappeared before compilation, skipping");
            return Ok(None);
        };
        let info = repo.file_info(&qualify(&self.posts_folder, path))?;
        let (title, body) = split_title(&source, &key);

        Ok(Some(Post {
            key,
            title,
            author: info.author,
            body,
            source_path: path.to_string(),
            created_at: info.created_at,
            updated_at: info.updated_at,
        }))
    }
}

impl fmt::Debug for SourceCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCompiler")
            .field("posts_folder", &self.posts_folder)
            .finish_non_exhaustive()
    }
}

impl PostCompiler for SourceCompiler {
    fn compile_posts(&self, paths: &[String], repo: &RepositoryHandle) -> UpdateResult<PostCache> {
        let mut cache = PostCache::new();
        for path in paths {
            if let Some(post) = self.compile_one(path, repo)? {
                cache.insert(post);
            }
        }
        Ok(cache)
    }
}

/// Title from the first `# ` heading, body from everything else.
/// Without a heading the post name doubles as the title.
fn split_title(source: &str, key: &PostKey) -> (String, String) {
    let mut title = None;
    let mut body = Vec::new();
    for line in source.lines() {
        match line.trim_start().strip_prefix("# ") {
            Some(heading) if title.is_none() => title = Some(heading.trim().to_string()),
            _ => body.push(line),
        }
    }
    let title = title.unwrap_or_else(|| key.name.clone());
    (title, body.join("\n").trim().to_string())
}
