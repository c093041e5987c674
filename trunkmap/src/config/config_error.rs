use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failure reading {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure decoding {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("configuration is missing required field '{0}'")]
    MissingField(String),
    #[error("invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
        ConfigError::InvalidField {
            field: String::from(field),
            message: message.into(),
        }
    }
}
