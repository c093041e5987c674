mod bbox;
mod edge_table;
mod map_app_error;
mod osm_node;
mod osm_way;
mod road_graph;

pub use bbox::{BboxOrder, BoundingBox};
pub use edge_table::{EdgeRecord, EdgeTable};
pub use map_app_error::MapAppError;
pub use osm_node::{OsmNodeData, OsmNodeId};
pub use osm_way::{OsmWayData, OsmWayId};
pub use road_graph::{RoadEdge, RoadGraph};

use std::collections::HashMap;

pub type OsmNodes = HashMap<OsmNodeId, OsmNodeData>;
pub type OsmWays = HashMap<OsmWayId, OsmWayData>;
