use std::collections::BTreeSet;

use quire_repo::paths::normalize;
use quire_repo::RepositoryHandle;
use quire_types::{Configuration, ConfigurationList, ContentLayout};
use tracing::debug;

use crate::error::{UpdateError, UpdateResult};
use crate::traits::ConfigurationSource;

/// Loads site configuration from TOML files at the repository root.
///
/// Files are read in the order the layout lists them; files that do not
/// exist are skipped.
#[derive(Clone, Debug)]
pub struct TomlConfigurations {
    files: Vec<String>,
}

impl TomlConfigurations {
    pub fn new(layout: &ContentLayout) -> Self {
        Self {
            files: layout.configuration_files.iter().map(|f| normalize(f)).collect(),
        }
    }
}

impl ConfigurationSource for TomlConfigurations {
    fn configuration_changed(&self, changed: &BTreeSet<String>) -> bool {
        changed
            .iter()
            .any(|path| self.files.contains(&normalize(path)))
    }

    fn load_configuration(&self, repo: &RepositoryHandle) -> UpdateResult<ConfigurationList> {
        let mut configurations = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let Some(text) = repo.read_file(file, "")? else {
                debug!(%file, "configuration file absent");
                continue;
            };
            let settings: toml::Table = text.parse().map_err(|e: toml::de::Error| {
                UpdateError::Configuration {
                    path: file.clone(),
                    reason: e.message().to_string(),
                }
            })?;
            configurations.push(Configuration::new(file.clone(), settings));
        }
        Ok(configurations.into())
    }
}
