use std::path::Path;
use std::time::Duration;

use quire_types::ContentLayout;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Settings for a [`SyncWorker`](crate::SyncWorker), usually read from
/// `quire.toml`.
///
/// ```toml
/// check_interval_secs = 30
/// repository = "memory:blog"
///
/// [layout]
/// posts_folder = "posts"
/// default_language = "en"
/// configuration_files = ["config.toml"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub check_interval_secs: u64,
    /// Provider-specific repository reference.
    pub repository: String,
    pub layout: ContentLayout,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            repository: "memory:default".into(),
            layout: ContentLayout::default(),
        }
    }
}

impl SyncConfig {
    /// Read and validate a TOML config file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|reason| SyncError::Config {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_toml(text: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| e.message().to_string())?;
        if config.check_interval_secs == 0 {
            return Err("check_interval_secs must be positive".into());
        }
        if config.layout.posts_folder.trim().is_empty() || config.layout.posts_folder.contains('/') {
            return Err("layout.posts_folder must be a single path segment".into());
        }
        Ok(config)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}
