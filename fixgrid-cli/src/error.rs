//! CLI errors.

use std::path::PathBuf;

use fixgrid::GridError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Row data must be a JSON array of objects, or an object with a \"rows\" array")]
    RowShape,

    #[error("Invalid template for column '{column}': {message}")]
    Template { column: String, message: String },

    #[error("Invalid {flag} argument '{value}': {message}")]
    Argument {
        flag: &'static str,
        value: String,
        message: String,
    },

    #[error("No log file location: pass --log-file")]
    NoLogDir,

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn argument(flag: &'static str, value: &str, message: impl Into<String>) -> Self {
        Self::Argument {
            flag,
            value: value.to_string(),
            message: message.into(),
        }
    }
}
