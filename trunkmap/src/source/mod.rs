mod clipped_file_source;
mod data_unavailable_error;
mod extent;
mod network_loader;
pub mod osm_xml_ops;
pub mod overpass_ops;
mod overpass_source;
pub mod pbf_ops;
mod pbf_source;
mod source_error;

pub use clipped_file_source::ClippedFileSource;
pub use data_unavailable_error::DataUnavailableError;
pub use extent::Extent;
pub use network_loader::{LoadedNetwork, NetworkLoader};
pub use overpass_source::OverpassSource;
pub use pbf_source::PbfSource;
pub use source_error::SourceError;

use crate::model::{BoundingBox, OsmNodes, OsmWays, RoadGraph};

/// one way of acquiring the road network for an extent.
pub trait NetworkSource {
    fn name(&self) -> &str;

    fn acquire(&self, extent: &Extent) -> Result<RoadGraph, SourceError>;
}

/// builds a graph from the collected nodes and ways and clips it to `bbox`.
fn build_clipped_graph(
    nodes: OsmNodes,
    ways: OsmWays,
    bbox: &BoundingBox,
    truncate_by_edge: bool,
) -> RoadGraph {
    let mut graph = RoadGraph::new(nodes, ways);
    log::info!(
        "built road graph with {} nodes and {} edges",
        graph.n_nodes(),
        graph.n_edges()
    );
    graph.truncate_bbox(bbox, truncate_by_edge);
    graph
}
