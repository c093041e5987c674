use super::SourceError;
use crate::{
    filter::NetworkFilter,
    model::{BoundingBox, OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWays},
};
use itertools::Itertools;
use kdam::{term, tqdm, Bar, BarExt};
use osmpbf::{Element, ElementReader};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

/// an estimate of 500 meters in degrees of latitude. used to buffer the study
/// area by a smidge so we don't prematurely truncate edges when reading the source.
pub const BUFFER_500M_IN_DEGREES: f64 = 0.0045;

/// reads a PBF file and stores the Ways and Nodes in lookup objects. filters out nodes
/// and ways based on the filter and extent_opt arguments:
/// - if provided, extent_opt will filter out nodes with points found outside of the extent
/// - the provided [`NetworkFilter`] filters ways based on their tags
/// - ways left with fewer than two nodes after extent filtering are also removed
pub fn read_pbf(
    filepath: &Path,
    filter: &NetworkFilter,
    extent_opt: Option<&BoundingBox>,
) -> Result<(OsmNodes, OsmWays), SourceError> {
    if !filepath.is_file() {
        return Err(SourceError::FileNotFound(filepath.to_path_buf()));
    }
    let reader =
        ElementReader::from_path(filepath).map_err(|e| SourceError::PbfLibError { source: e })?;

    term::hide_cursor().map_err(|e| SourceError::InternalError(e.to_string()))?;
    let mut reader_bar = Bar::builder()
        .desc(filepath.display().to_string())
        .position(0)
        .unit(" rows")
        .unit_scale(true)
        .build()
        .map_err(SourceError::InternalError)?;
    let mut nodes_bar = Bar::builder()
        .desc("nodes retained")
        .position(1)
        .build()
        .map_err(SourceError::InternalError)?;
    let mut ways_bar = Bar::builder()
        .desc("ways retained")
        .position(2)
        .build()
        .map_err(SourceError::InternalError)?;

    let mut collector = ElementCollector::new(filter, extent_opt);
    reader
        .for_each(|e| {
            let node_kept = match e {
                Element::Node(node) => Some(collector.add_node(OsmNodeData::from(&node))),
                // from documentation on DenseNode:
                // So, if you want to [pattern match on] `Node`, you also likely want to match [`DenseNode`].
                Element::DenseNode(dense) => Some(collector.add_node(OsmNodeData::from(&dense))),
                Element::Way(way) => {
                    let tags = way.tags().collect_vec();
                    if collector.add_way(OsmWayData::from(&way), &tags) {
                        let _ = ways_bar.update(1);
                    }
                    None
                }
                Element::Relation(_) => None,
            };
            if node_kept == Some(true) {
                let _ = nodes_bar.update(1);
            }
            let _ = reader_bar.update(1);
        })
        .map_err(|e| SourceError::PbfLibError { source: e })?;

    // close the 3 nested progress bars
    eprintln!();
    eprintln!();
    eprintln!();
    term::show_cursor().map_err(|e| SourceError::InternalError(e.to_string()))?;

    let (nodes_map, ways_map) = collector.finish();
    log::info!(
        "read {} nodes and {} ways from {}",
        nodes_map.len(),
        ways_map.len(),
        filepath.display()
    );
    Ok((nodes_map, ways_map))
}

/// accumulates the nodes and ways read from a PBF file, keeping nodes inside
/// the extent and ways accepted by the network filter.
pub struct ElementCollector<'a> {
    filter: &'a NetworkFilter,
    extent: Option<&'a BoundingBox>,
    nodes: OsmNodes,
    ways: OsmWays,
}

impl<'a> ElementCollector<'a> {
    pub fn new(filter: &'a NetworkFilter, extent: Option<&'a BoundingBox>) -> Self {
        ElementCollector {
            filter,
            extent,
            nodes: HashMap::default(),
            ways: HashMap::default(),
        }
    }

    /// stores the node if it lies within the extent. returns true if kept.
    pub fn add_node(&mut self, node: OsmNodeData) -> bool {
        if let Some(ext) = self.extent {
            if !ext.contains_point(node.x, node.y) {
                return false;
            }
        }
        if self.nodes.contains_key(&node.osmid) {
            log::warn!(
                "node with OSMID {} occurs more than once in this file",
                node.osmid
            );
        }
        self.nodes.insert(node.osmid, node);
        true
    }

    /// stores the way if the filter accepts its tags. returns true if kept.
    pub fn add_way(&mut self, way: OsmWayData, tags: &[(&str, &str)]) -> bool {
        if !self.filter.accept(tags) {
            return false;
        }
        if self.ways.contains_key(&way.osmid) {
            log::warn!(
                "way with OSMID {} occurs more than once in this file",
                way.osmid
            );
        }
        self.ways.insert(way.osmid, way);
        true
    }

    /// the collected nodes and ways. with an extent, ways left with fewer than
    /// two nodes inside it are dropped along with their orphaned nodes.
    pub fn finish(self) -> (OsmNodes, OsmWays) {
        let (mut nodes, mut ways) = (self.nodes, self.ways);
        if self.extent.is_some() {
            remove_disconnected_ways(&mut nodes, &mut ways);
        }
        (nodes, ways)
    }
}

/// we may have filtered nodes along the way, so here we must remove the ways
/// that no longer have at least two nodes, and then the nodes no way refers to.
pub fn remove_disconnected_ways(nodes_map: &mut OsmNodes, ways_map: &mut OsmWays) {
    let mut connected_nodes: HashSet<OsmNodeId> = HashSet::new();
    let mut disconnected_ways = vec![];
    let find_disconnected_ways_iter = tqdm!(
        ways_map.values(),
        desc = "find ways disconnected by extent filtering",
        total = ways_map.len()
    );
    for way in find_disconnected_ways_iter {
        let retained = way
            .nodes
            .iter()
            .filter(|n_id| nodes_map.contains_key(*n_id))
            .collect_vec();
        if retained.len() < 2 {
            disconnected_ways.push(way.osmid);
        } else {
            connected_nodes.extend(retained);
        }
    }
    eprintln!();

    for way_id in disconnected_ways.iter() {
        ways_map.remove(way_id);
    }
    // finally, remove nodes that became detached after way filtering
    let n_nodes = nodes_map.len();
    nodes_map.retain(|id, _| connected_nodes.contains(id));
    log::info!(
        "removed {} ways and {} nodes disconnected by extent filtering",
        disconnected_ways.len(),
        n_nodes - nodes_map.len()
    );
}
