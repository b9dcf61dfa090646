use serde::{Deserialize, Serialize};

/// Site-wide settings parsed from one repository configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Repository path the settings were read from.
    pub source: String,
    pub settings: toml::Table,
}

impl Configuration {
    pub fn new(source: impl Into<String>, settings: toml::Table) -> Self {
        Self {
            source: source.into(),
            settings,
        }
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.settings.get(key)
    }
}

/// Ordered configurations. Always replaced as a whole, never merged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationList(Vec<Configuration>);

impl ConfigurationList {
    pub fn new(configurations: Vec<Configuration>) -> Self {
        Self(configurations)
    }

    /// First value for `key`, searching configurations in order.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.iter().find_map(|c| c.get(key))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Configuration>> for ConfigurationList {
    fn from(configurations: Vec<Configuration>) -> Self {
        Self(configurations)
    }
}
