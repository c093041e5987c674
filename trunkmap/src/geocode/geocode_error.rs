use crate::http::HttpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("either 'bbox' or 'place' must be provided")]
    NoExtent,
    #[error("geocoding service request failed: {source}")]
    Request {
        #[from]
        source: HttpError,
    },
    #[error("place '{0}' not found by the geocoding service")]
    NotFound(String),
    #[error("invalid geocoding response for '{place}': {message}")]
    InvalidResponse { place: String, message: String },
}
