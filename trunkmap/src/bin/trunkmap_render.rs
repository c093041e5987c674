use clap::Parser;
use trunkmap::{
    app::{RenderApp, RenderArguments},
    config::MapConfiguration,
    model::MapAppError,
};

fn run(args: &RenderArguments) -> Result<(), MapAppError> {
    log::info!("reading configuration from {}", args.config.display());
    let conf = MapConfiguration::try_from(args.config.as_path())?;
    let report = RenderApp::from_config(conf)?.run()?;
    for (code, count) in report.target_edges.iter() {
        log::info!("{code}: {count} edges");
    }
    log::info!("map saved to {}", report.output.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let args = RenderArguments::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
