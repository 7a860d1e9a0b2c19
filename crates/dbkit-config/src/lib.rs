//! `dbkit.toml` loader.
//!
//! Standalone: this crate knows nothing about the runtime, it only parses
//! and validates settings. Callers map the settings onto runtime types.


use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// Config
/// Root of `dbkit.toml`. Every section is optional.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generate: GenerateConfig,
    pub transfer: TransferConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.transfer.datetime_format
            && format.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "transfer.datetime_format must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// GenerateConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub dialect: DialectSetting,
    pub display_format: DisplayFormatSetting,
}

///
/// DialectSetting
/// `none` disables escaping and identifier quoting.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectSetting {
    #[default]
    Ansi,
    Postgres,
    Mysql,
    None,
}

///
/// DisplayFormatSetting
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormatSetting {
    Ui,
    Edit,
    #[default]
    Native,
}

///
/// TransferConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransferConfig {
    /// Date/time pattern applied to DATETIME columns holding text.
    pub datetime_format: Option<String>,
}
