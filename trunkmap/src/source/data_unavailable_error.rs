use itertools::Itertools;
use thiserror::Error;

/// every configured network source failed or produced an empty graph.
#[derive(Error, Debug, Clone, Default)]
#[error("unable to acquire road network data{}", describe_failures(.failures))]
pub struct DataUnavailableError {
    /// (source name, failure message) in the order the sources were tried
    pub failures: Vec<(String, String)>,
}

fn describe_failures(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        return String::from(": no network source is configured");
    }
    let reasons = failures
        .iter()
        .map(|(name, msg)| format!("{name}: {msg}"))
        .join("; ");
    format!(" ({reasons})")
}
