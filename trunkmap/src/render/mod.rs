pub mod color;
mod map_renderer;
mod map_style;
pub mod projection;
mod render_error;
pub mod svg_document;

pub use map_renderer::{render, OutputFormat, RenderReport};
pub use map_style::MapStyle;
pub use render_error::RenderError;
