use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uncompiled post as stored by a repository backend.
///
/// `path` is relative to the posts folder (`"p1.md"`, `"fr/intro.md"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub author: String,
    pub path: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RawPost {
    /// A raw post created and updated now.
    pub fn new(author: impl Into<String>, path: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            author: author.into(),
            path: path.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Metadata view of this post.
    pub fn info(&self) -> FileInfo {
        FileInfo {
            author: self.author.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Authorship and timestamps of a repository file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileInfo {
    pub const UNKNOWN_AUTHOR: &'static str = "unknown";

    /// Returned by backends that have no metadata for a path.
    pub fn placeholder() -> Self {
        Self {
            author: Self::UNKNOWN_AUTHOR.to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}
