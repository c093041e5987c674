use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported output format for {0}, expected a .svg or .png file")]
    UnsupportedFormat(PathBuf),
    #[error("error building output directory for {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure rasterizing map: {0}")]
    Rasterize(String),
}
