//! The post cache and the snapshot the serving side reads from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigurationList;
use crate::post::{Post, PostKey};

/// Posts grouped by language, then by name.
///
/// Each `(language, name)` pair maps to at most one [`Post`]. Reconciliation
/// never edits a live cache: it derives a new value with [`PostCache::merged`]
/// and [`PostCache::remove`] on a copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostCache {
    languages: BTreeMap<String, BTreeMap<String, Post>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single post.
    pub fn get(&self, language: &str, name: &str) -> Option<&Post> {
        self.languages.get(language)?.get(name)
    }

    pub fn contains(&self, key: &PostKey) -> bool {
        self.get(&key.language, &key.name).is_some()
    }

    /// All posts for one language, keyed by name.
    pub fn language(&self, language: &str) -> Option<&BTreeMap<String, Post>> {
        self.languages.get(language)
    }

    /// Language tags present in the cache, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Insert a post under its own key, returning the post it replaced.
    pub fn insert(&mut self, post: Post) -> Option<Post> {
        self.languages
            .entry(post.key.language.clone())
            .or_default()
            .insert(post.key.name.clone(), post)
    }

    /// Remove a post. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &PostKey) -> Option<Post> {
        self.languages.get_mut(&key.language)?.remove(&key.name)
    }

    /// Union `fresh` into a copy of this cache.
    ///
    /// Per language, entries from `fresh` override same-named entries here;
    /// every other name and every untouched language is carried over.
    pub fn merged(&self, fresh: PostCache) -> PostCache {
        let mut out = self.clone();
        for (language, posts) in fresh.languages {
            out.languages.entry(language).or_default().extend(posts);
        }
        out
    }

    /// Total number of posts across all languages.
    pub fn len(&self) -> usize {
        self.languages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every post, ordered by language then name.
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.languages.values().flat_map(BTreeMap::values)
    }
}

impl FromIterator<Post> for PostCache {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        let mut cache = PostCache::new();
        for post in iter {
            cache.insert(post);
        }
        cache
    }
}

/// Everything the serving side reads: posts plus site configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub posts: PostCache,
    pub configurations: ConfigurationList,
}

impl CacheSnapshot {
    pub fn new(posts: PostCache, configurations: ConfigurationList) -> Self {
        Self {
            posts,
            configurations,
        }
    }
}
