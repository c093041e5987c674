mod config_error;
mod map_configuration;
mod settings;

pub use config_error::ConfigError;
pub use map_configuration::{
    MapConfiguration, DEFAULT_EXTRACT_OUTPUT, DEFAULT_EXTRACT_SOURCE, DEFAULT_OUTPUT,
    OUTPUT_DIRECTORY,
};
pub use settings::{FigureSettings, HttpSettings, OsmiumSettings};
