mod http_client;
mod http_error;
mod retry_policy;

pub use http_client::{HttpClient, ReqwestHttpClient};
pub use http_error::HttpError;
pub use retry_policy::RetryPolicy;
