use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct OsmNodeId(pub i64);

impl Display for OsmNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// an OSM node location. x is longitude, y is latitude.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct OsmNodeData {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
}

impl OsmNodeData {
    pub fn new(osmid: i64, x: f64, y: f64) -> OsmNodeData {
        OsmNodeData {
            osmid: OsmNodeId(osmid),
            x,
            y,
        }
    }
}

impl From<&osmpbf::elements::Node<'_>> for OsmNodeData {
    fn from(node: &osmpbf::elements::Node) -> Self {
        OsmNodeData::new(node.id(), node.lon(), node.lat())
    }
}

impl From<&osmpbf::dense::DenseNode<'_>> for OsmNodeData {
    fn from(node: &osmpbf::dense::DenseNode<'_>) -> Self {
        OsmNodeData::new(node.id(), node.lon(), node.lat())
    }
}
