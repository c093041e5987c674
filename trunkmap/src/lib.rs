//! trunk road network maps from OpenStreetMap data.
//!
//! two batch pipelines share a single configuration document:
//! - [`app::ExtractApp`] clips a large regional `.osm.pbf` down to a bounding box
//!   with the `osmium` command line tool
//! - [`app::RenderApp`] loads a road graph (clipped extract, raw PBF, or the
//!   Overpass API, in that order), partitions its edges into target and background
//!   roads by reference code, and draws them to an SVG or PNG file
pub mod app;
pub mod classify;
pub mod config;
pub mod extract;
pub mod filter;
pub mod geocode;
pub mod http;
pub mod model;
pub mod render;
pub mod source;
pub mod util;
