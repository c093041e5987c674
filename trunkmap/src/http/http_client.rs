use super::{HttpError, RetryPolicy};
use std::time::Duration;

/// blocking HTTP access used by the geocoder and the Overpass source.
pub trait HttpClient {
    /// GET `url` with the given query parameters, returning the response body.
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, HttpError>;

    /// POST an url-encoded form to `url`, returning the response body.
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String, HttpError>;
}

/// [`HttpClient`] backed by a blocking reqwest client. every request has a
/// timeout and is retried according to the configured [`RetryPolicy`].
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

impl ReqwestHttpClient {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<ReqwestHttpClient, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;
        Ok(ReqwestHttpClient { client, retry })
    }

    fn send(&self, url: &str, request: reqwest::blocking::RequestBuilder) -> Result<String, HttpError> {
        let response = request.send().map_err(|source| HttpError::Request {
            url: String::from(url),
            source,
        })?;
        let status = response.status();
        let body = response.text().map_err(|source| HttpError::Request {
            url: String::from(url),
            source,
        })?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(HttpError::Status {
                url: String::from(url),
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            })
        }
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, HttpError> {
        self.retry.run(&format!("GET {url}"), || {
            self.send(url, self.client.get(url).query(query))
        })
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String, HttpError> {
        self.retry.run(&format!("POST {url}"), || {
            self.send(url, self.client.post(url).form(form))
        })
    }
}
