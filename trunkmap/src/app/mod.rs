mod cli_args;
mod extract_app;
mod render_app;

pub use cli_args::{ExtractArguments, RenderArguments};
pub use extract_app::{ExtractApp, ExtractOutcome};
pub use render_app::RenderApp;
