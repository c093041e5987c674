use clap::Parser;
use trunkmap::{
    app::{ExtractApp, ExtractArguments, ExtractOutcome},
    config::MapConfiguration,
    model::MapAppError,
};

fn run(args: &ExtractArguments) -> Result<(), MapAppError> {
    log::info!("reading configuration from {}", args.config.display());
    let conf = MapConfiguration::try_from(args.config.as_path())?;
    match ExtractApp::from_config(conf)?.run()? {
        ExtractOutcome::Extracted { output, .. } => {
            log::info!("extract written to {}", output.display())
        }
        ExtractOutcome::Skipped { output } => {
            log::info!("kept existing extract {}", output.display())
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = ExtractArguments::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
