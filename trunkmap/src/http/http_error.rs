use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("failure building http client: {0}")]
    ClientBuild(String),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl HttpError {
    /// failures worth repeating: transport errors, rate limiting and server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::ClientBuild(_) => false,
            HttpError::Request { source, .. } => !source.is_builder() && !source.is_decode(),
            HttpError::Status { status, .. } => *status == 429 || *status >= 500,
            HttpError::Transport { .. } => true,
        }
    }
}
