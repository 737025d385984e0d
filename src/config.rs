use crate::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Archive defaults loaded once at startup. Never mutated after `load`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "DEFAULT_SOURCE_FOLDER")]
    pub source_dir: PathBuf,

    #[serde(rename = "DEFAULT_DESTINATION_FOLDER")]
    pub destination_dir: PathBuf,

    #[serde(rename = "VALID_EXTENSIONS")]
    pub valid_extensions: Vec<String>,

    /// strftime-style pattern used as the archived filename prefix, e.g. `%Y%m%d`.
    #[serde(rename = "DATE_FORMAT")]
    pub date_format: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.valid_extensions.iter().all(|e| e.is_empty()) {
            return Err(ConfigError::NoExtensions);
        }
        // chrono panics when displaying a format with an invalid item, so reject it up front
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::DateFormat(self.date_format.clone()));
        }
        Ok(())
    }
}
