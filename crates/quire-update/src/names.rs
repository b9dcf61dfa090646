use quire_repo::paths::normalize;
use quire_types::{ContentLayout, PostKey};

use crate::traits::NameDeriver;

/// Derives keys from the directory layout under the posts folder.
///
/// `"p1.md"` is `(default_language, "p1")`; `"fr/intro.md"` is
/// `("fr", "intro")`; deeper paths join the remaining segments with `-`, so
/// `"fr/2024/intro.md"` is `("fr", "2024-intro")`.
#[derive(Clone, Debug)]
pub struct PathNames {
    default_language: String,
}

impl PathNames {
    pub fn new(layout: &ContentLayout) -> Self {
        Self {
            default_language: layout.default_language.clone(),
        }
    }

    /// Key for one path, or `None` if it has no usable file name.
    pub fn key_for(&self, path: &str) -> Option<PostKey> {
        let normalized = normalize(path);
        let mut segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        let file = segments.pop()?;
        let stem = match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file,
        };

        let (language, dirs) = match segments.split_first() {
            Some((language, rest)) => (language.to_string(), rest),
            None => (self.default_language.clone(), &[][..]),
        };

        let mut parts: Vec<&str> = dirs.to_vec();
        parts.push(stem);
        let name = slugify(&parts.join("-"));
        if name.is_empty() {
            return None;
        }
        Some(PostKey::new(language, name))
    }
}

impl NameDeriver for PathNames {
    fn names_from_paths(&self, paths: &[String]) -> Vec<PostKey> {
        paths.iter().filter_map(|p| self.key_for(p)).collect()
    }
}

fn slugify(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
