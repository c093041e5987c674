use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("source file does not exist: {0}")]
    SourceMissing(PathBuf),
    #[error("output file already exists and overwrite is disabled: {0}")]
    OutputExists(PathBuf),
    #[error("failure creating output directory for {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' exited with {}: {stderr}", describe_status(.status))]
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => String::from("a signal"),
    }
}
