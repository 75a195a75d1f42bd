use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use listing_index::cli::import_export::ColumnMapping;
use serde::Deserialize;
use thiserror::Error;

use super::ThemeArg;

/// Settings read from `cli.toml`; every field is optional.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
    theme: Option<ThemeArg>,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        let theme = match data.output.theme.as_deref() {
            Some(value) => Some(ThemeArg::from_str(value, true).map_err(|_| {
                ConfigError::InvalidTheme {
                    path: path.clone().unwrap_or_default(),
                    value: value.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Self { path, data, theme })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_dataset(&self) -> Option<&PathBuf> {
        self.data.dataset.default_path.as_ref()
    }

    pub fn skip_invalid(&self) -> Option<bool> {
        self.data.dataset.skip_invalid
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.data.columns
    }

    pub fn log_level(&self) -> Option<&str> {
        self.data.output.log_level.as_deref()
    }

    pub fn theme(&self) -> Option<ThemeArg> {
        self.theme
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    dataset: DatasetSection,
    #[serde(default)]
    output: OutputSection,
    #[serde(default)]
    columns: ColumnMapping,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetSection {
    #[serde(rename = "default")]
    default_path: Option<PathBuf>,
    skip_invalid: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSection {
    log_level: Option<String>,
    theme: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("CLI config {path}: theme '{value}' is invalid")]
    InvalidTheme { path: PathBuf, value: String },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("listing-index").join("cli.toml"))
}
