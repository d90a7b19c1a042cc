use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db: Option<DbFileConfig>,
    pub data: Option<DataFileConfig>,
}

/// The `[db]` section.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DbFileConfig {
    /// Directory holding the database files.
    pub dir: Option<String>,
    /// Name of the target database, stored as `<dir>/<name>.db`.
    pub name: Option<String>,
}

/// The optional `[data]` section.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DataFileConfig {
    pub song_data: Option<String>,
    pub log_data: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
