use serde::{Deserialize, Serialize};

/// Repository layout conventions shared by providers and the updater.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLayout {
    /// First path segment that marks a file as a post source.
    pub posts_folder: String,
    /// Language assigned to posts stored directly under the posts folder.
    pub default_language: String,
    /// Repository paths whose change triggers a configuration reload.
    pub configuration_files: Vec<String>,
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self {
            posts_folder: "posts".into(),
            default_language: "en".into(),
            configuration_files: vec!["config.toml".into()],
        }
    }
}

impl ContentLayout {
    pub fn with_posts_folder(mut self, folder: impl Into<String>) -> Self {
        self.posts_folder = folder.into();
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn with_configuration_files(mut self, files: Vec<String>) -> Self {
        self.configuration_files = files;
        self
    }
}
