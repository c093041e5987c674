use crate::{geocode::GeocodeError, http::HttpError};
use std::path::PathBuf;
use thiserror::Error;

/// failure of a single network acquisition strategy.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file does not exist: {0}")]
    FileNotFound(PathBuf),
    #[error("source '{0}' cannot load a network for a place name, a bbox is required")]
    UnsupportedExtent(String),
    #[error("unsupported network file format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("failure reading .pbf file: {source}")]
    PbfLibError { source: osmpbf::Error },
    #[error("failure reading OSM XML file {path}: {message}")]
    XmlError { path: PathBuf, message: String },
    #[error("failure opening {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("online request failed: {source}")]
    HttpError {
        #[from]
        source: HttpError,
    },
    #[error("failure resolving place: {source}")]
    GeocodeError {
        #[from]
        source: GeocodeError,
    },
    #[error("invalid Overpass response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    InternalError(String),
}
