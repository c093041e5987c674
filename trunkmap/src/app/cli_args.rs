use clap::Parser;
use std::path::PathBuf;

/// draws target trunk roads over the surrounding road network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct RenderArguments {
    #[arg(long, default_value = "config.yaml", help = "path to the map configuration file")]
    pub config: PathBuf,
}

/// clips a regional OSM .pbf extract to the configured region with osmium
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ExtractArguments {
    #[arg(long, default_value = "config.yaml", help = "path to the map configuration file")]
    pub config: PathBuf,
}
