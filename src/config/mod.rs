use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError};
use serde::Deserialize;

/// where the sqlite database lives and how long a connection waits on a locked database
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DbConfig {
    pub location: String,
    #[serde(rename = "busytimeoutmillis", default = "default_busy_timeout_millis")]
    pub busy_timeout_millis: u64,
}

impl DbConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_millis)
    }
}

/// root directory of the cached folder blobs
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LocalFilesConfig {
    pub location: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LogConfig {
    /// one of `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
    /// if present, log lines are also appended to this file
    pub file: Option<String>,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DirectoryCacheConfig {
    pub database: DbConfig,
    #[serde(rename = "localfiles")]
    pub local_files: LocalFilesConfig,
    pub logging: LogConfig,
}

impl Default for DirectoryCacheConfig {
    fn default() -> Self {
        Self {
            database: DbConfig {
                location: "./directory_cache.sqlite".to_string(),
                busy_timeout_millis: default_busy_timeout_millis(),
            },
            local_files: LocalFilesConfig {
                location: "./local_files".to_string(),
            },
            logging: LogConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}

fn default_busy_timeout_millis() -> u64 {
    5_000
}

pub static DEFAULT_CONFIG_FILE: &str = "./DirectoryCache.toml";

/// Parses the config file at `location`, if it exists.
///
/// A missing file is not an error: the defaults are used instead. Anything else that goes wrong
/// (malformed toml, wrong types) is returned to the caller
pub fn parse_config(location: &Path) -> Result<DirectoryCacheConfig, ConfigError> {
    if !location.exists() {
        log::warn!(
            "No config file found at {}. Continuing with defaults...",
            location.display()
        );
        return Ok(DirectoryCacheConfig::default());
    }
    Config::builder()
        .add_source(config::File::from(PathBuf::from(location)).format(config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}
