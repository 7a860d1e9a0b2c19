use dbkit_config::ConfigError;
use std::io;
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dbkit(#[from] dbkit::Error),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("invalid rows: {0}")]
    Rows(String),

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
