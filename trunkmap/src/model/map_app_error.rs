use crate::{
    config::ConfigError, extract::ExtractionError, geocode::GeocodeError,
    render::RenderError, source::DataUnavailableError,
};
use std::path::PathBuf;
use thiserror::Error;

/// failures that abort a map pipeline run.
#[derive(Error, Debug)]
pub enum MapAppError {
    #[error("failure reading run configuration: {source}")]
    Configuration {
        #[from]
        source: ConfigError,
    },
    #[error("source data file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failure extracting region: {source}")]
    Extraction {
        #[from]
        source: ExtractionError,
    },
    #[error("failure resolving region: {source}")]
    Geocode {
        #[from]
        source: GeocodeError,
    },
    #[error("{source}")]
    DataUnavailable {
        #[from]
        source: DataUnavailableError,
    },
    #[error("failure rendering map: {source}")]
    Render {
        #[from]
        source: RenderError,
    },
}
