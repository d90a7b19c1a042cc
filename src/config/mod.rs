mod file_config;

pub use file_config::{DataFileConfig, DbFileConfig, FileConfig};

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "sparkify.toml";
pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbSettings,
    pub data: DataSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub dir: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSettings {
    pub song_data: PathBuf,
    pub log_data: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and the TOML file.
    ///
    /// The `[db]` section must be complete. Data paths fall back from CLI
    /// flags to the `[data]` section to the built-in defaults.
    pub fn resolve(cli: &CliConfig, file: FileConfig) -> Result<Self> {
        let db_file = file
            .db
            .ok_or_else(|| anyhow!("Missing [db] section in config file"))?;

        let dir = db_file
            .dir
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Missing config key: db.dir"))?;
        let name = db_file
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing config key: db.name"))?;

        if !dir.exists() {
            bail!("Database directory does not exist: {:?}", dir);
        }
        if !dir.is_dir() {
            bail!("db.dir is not a directory: {:?}", dir);
        }

        let data_file = file.data.unwrap_or_default();
        let song_data = cli
            .song_data
            .clone()
            .or_else(|| data_file.song_data.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA));
        let log_data = cli
            .log_data
            .clone()
            .or_else(|| data_file.log_data.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA));

        Ok(Self {
            db: DbSettings { dir, name },
            data: DataSettings {
                song_data,
                log_data,
            },
        })
    }
}

impl DbSettings {
    pub fn database_path(&self) -> PathBuf {
        self.dir.join(format!("{}.db", self.name))
    }
}
