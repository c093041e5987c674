use super::{
    BoundingBox, EdgeRecord, EdgeTable, OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWayId,
    OsmWays,
};
use geo::{Coord, LineString};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// a directed edge between the first and last node of an OSM way. ways that
/// are not one-way contribute a second edge in the reverse direction.
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub src: OsmNodeId,
    pub dst: OsmNodeId,
    /// distinguishes parallel edges between the same (src, dst) pair
    pub key: usize,
    pub way_id: OsmWayId,
    pub highway: Option<String>,
    pub _ref: Option<String>,
    pub name: Option<String>,
    pub oneway: bool,
    /// node sequence from src to dst
    pub path: Vec<OsmNodeId>,
    pub geometry: Option<LineString<f64>>,
}

/// directed multigraph of road segments.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: OsmNodes,
    edges: Vec<RoadEdge>,
}

impl RoadGraph {
    /// builds the graph from the nodes and ways collected by a network source.
    ///
    /// ways are visited in order of their OSM id so the resulting edge list does
    /// not depend on hash map iteration order. a way is split wherever it
    /// references a node without a location, and each run of at least two
    /// located nodes becomes an edge. nodes not referenced by any edge are
    /// discarded.
    pub fn new(nodes: OsmNodes, ways: OsmWays) -> RoadGraph {
        let mut edges: Vec<RoadEdge> = Vec::with_capacity(ways.len() * 2);
        let mut n_skipped = 0;

        for way in ways.into_values().sorted_by_key(|w| w.osmid) {
            let mut runs = way
                .nodes
                .split(|n| !nodes.contains_key(n))
                .map(|run| run.iter().cloned().dedup().collect_vec())
                .filter(|run| run.len() >= 2)
                .collect_vec();
            if runs.is_empty() {
                n_skipped += 1;
                continue;
            }

            // # reverse the order of nodes in the path if this path is both one-way
            // # and only allows travel in the opposite direction of nodes' order
            let oneway = way.is_one_way();
            if oneway && way.is_reverse() {
                runs.reverse();
                runs.iter_mut().for_each(|run| run.reverse());
            }

            for path in runs {
                let reverse_path = if oneway {
                    None
                } else {
                    Some(path.iter().rev().cloned().collect_vec())
                };
                edges.push(new_edge(&way, path, oneway));
                if let Some(rev) = reverse_path {
                    edges.push(new_edge(&way, rev, oneway));
                }
            }
        }
        if n_skipped > 0 {
            log::debug!("skipped {n_skipped} ways with fewer than two located nodes");
        }

        let mut graph = RoadGraph { nodes, edges };
        graph.assign_keys();
        graph.retain_connected_nodes();
        graph
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[RoadEdge] {
        &self.edges
    }

    pub fn get_node(&self, node_id: &OsmNodeId) -> Option<&OsmNodeData> {
        self.nodes.get(node_id)
    }

    /// clips every edge to the bounding box.
    ///
    /// when `truncate_by_edge` is true, each segment of an edge path is cut at
    /// the box boundary, so an edge keeps the parts of its geometry inside the
    /// box along with the node just across the boundary. otherwise only
    /// segments with both nodes inside the box are kept. an edge leaving and
    /// re-entering the box becomes several edges. edges with nothing inside the
    /// box, and nodes left without edges, are removed. returns the number of
    /// removed edges.
    pub fn truncate_bbox(&mut self, bbox: &BoundingBox, truncate_by_edge: bool) -> usize {
        log::info!("clipping all edges to bbox {bbox}");
        let edges = std::mem::take(&mut self.edges);
        let mut clipped = Vec::with_capacity(edges.len());
        let mut n_removed = 0;
        for edge in edges.iter() {
            let pieces = self.clip_edge(edge, bbox, truncate_by_edge);
            if pieces.is_empty() {
                n_removed += 1;
            }
            clipped.extend(pieces);
        }
        self.edges = clipped;
        self.assign_keys();
        self.retain_connected_nodes();

        if truncate_by_edge {
            log::info!("removed {n_removed} edges with no segment crossing the bbox");
        } else {
            log::info!("removed {n_removed} edges with no segment inside the bbox");
        }
        n_removed
    }

    /// flattens the graph into its edge table, filling any missing edge geometry
    /// from the locations of the nodes along the edge path.
    pub fn edge_table(&self) -> EdgeTable {
        let rows = self
            .edges
            .iter()
            .map(|edge| EdgeRecord {
                src: edge.src,
                dst: edge.dst,
                key: edge.key,
                way_id: edge.way_id,
                highway: edge.highway.clone(),
                _ref: edge._ref.clone(),
                name: edge.name.clone(),
                geometry: edge
                    .geometry
                    .clone()
                    .unwrap_or_else(|| self.fill_edge_geometry(edge)),
            })
            .collect_vec();
        EdgeTable::from(rows)
    }

    fn fill_edge_geometry(&self, edge: &RoadEdge) -> LineString<f64> {
        let coords = edge
            .path
            .iter()
            .filter_map(|n| self.nodes.get(n))
            .map(node_coord)
            .collect_vec();
        LineString(coords)
    }

    /// the parts of `edge` that lie within `bbox`, in path order.
    fn clip_edge(
        &self,
        edge: &RoadEdge,
        bbox: &BoundingBox,
        truncate_by_edge: bool,
    ) -> Vec<RoadEdge> {
        let mut pieces = vec![];
        let mut piece = PendingPiece::default();
        for (a_id, b_id) in edge.path.iter().tuple_windows() {
            let (a, b) = match (self.nodes.get(a_id), self.nodes.get(b_id)) {
                (Some(a), Some(b)) => (node_coord(a), node_coord(b)),
                _ => {
                    piece.finish(edge, &mut pieces);
                    continue;
                }
            };
            let range = if truncate_by_edge {
                bbox.clip_segment(a, b)
            } else if bbox.contains_point(a.x, a.y) && bbox.contains_point(b.x, b.y) {
                Some((0.0, 1.0))
            } else {
                None
            };
            match range {
                None => piece.finish(edge, &mut pieces),
                Some((t0, t1)) => {
                    if piece.coords.is_empty() {
                        piece.path.push(*a_id);
                        piece.coords.push(interpolate(a, b, t0));
                    }
                    piece.path.push(*b_id);
                    piece.coords.push(interpolate(a, b, t1));
                    if t1 < 1.0 {
                        piece.finish(edge, &mut pieces);
                    }
                }
            }
        }
        piece.finish(edge, &mut pieces);
        pieces
    }

    /// numbers parallel edges between the same (src, dst) pair in edge order.
    fn assign_keys(&mut self) {
        let mut keys: HashMap<(OsmNodeId, OsmNodeId), usize> = HashMap::new();
        for edge in self.edges.iter_mut() {
            let key = keys.entry((edge.src, edge.dst)).or_insert(0);
            edge.key = *key;
            *key += 1;
        }
    }

    fn retain_connected_nodes(&mut self) {
        let connected: HashSet<OsmNodeId> = self
            .edges
            .iter()
            .flat_map(|e| e.path.iter().cloned())
            .collect();
        self.nodes.retain(|id, _| connected.contains(id));
    }
}

/// a run of clipped segments that has not been closed yet
#[derive(Default)]
struct PendingPiece {
    path: Vec<OsmNodeId>,
    coords: Vec<Coord<f64>>,
}

impl PendingPiece {
    /// appends the run to `pieces` as a copy of `edge` when it has a drawable
    /// length, and starts a new run.
    fn finish(&mut self, edge: &RoadEdge, pieces: &mut Vec<RoadEdge>) {
        let path = std::mem::take(&mut self.path);
        let coords = std::mem::take(&mut self.coords);
        if coords.len() < 2 || coords.iter().all_equal() {
            return;
        }
        pieces.push(RoadEdge {
            src: path[0],
            dst: path[path.len() - 1],
            path,
            geometry: Some(LineString(coords)),
            ..edge.clone()
        });
    }
}

fn node_coord(node: &OsmNodeData) -> Coord<f64> {
    Coord::from((node.x, node.y))
}

fn interpolate(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        Coord::from((a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t))
    }
}

fn new_edge(way: &OsmWayData, path: Vec<OsmNodeId>, oneway: bool) -> RoadEdge {
    RoadEdge {
        src: path[0],
        dst: path[path.len() - 1],
        key: 0,
        way_id: way.osmid,
        highway: way.highway.clone(),
        _ref: way._ref.clone(),
        name: way.name.clone(),
        oneway,
        path,
        geometry: None,
    }
}

#[cfg(test)]
mod tests {
    use super::RoadGraph;
    use crate::model::{BoundingBox, OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWays};
    use geo::coord;

    fn nodes(coords: &[(i64, f64, f64)]) -> OsmNodes {
        coords
            .iter()
            .map(|(id, x, y)| (OsmNodeId(*id), OsmNodeData::new(*id, *x, *y)))
            .collect()
    }

    fn ways(list: Vec<OsmWayData>) -> OsmWays {
        list.into_iter().map(|w| (w.osmid, w)).collect()
    }

    #[test]
    fn two_way_road_has_both_directions() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0)]),
            ways(vec![OsmWayData::new(10, [1, 2, 3]).with_tags([("highway", "trunk")])]),
        );
        assert_eq!(graph.n_edges(), 2);
        let fwd = &graph.edges()[0];
        let rev = &graph.edges()[1];
        assert_eq!((fwd.src, fwd.dst), (OsmNodeId(1), OsmNodeId(3)));
        assert_eq!((rev.src, rev.dst), (OsmNodeId(3), OsmNodeId(1)));
    }

    #[test]
    fn reversed_oneway_flips_path() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]),
            ways(vec![OsmWayData::new(10, [1, 2]).with_tags([("oneway", "-1")])]),
        );
        assert_eq!(graph.n_edges(), 1);
        assert_eq!(graph.edges()[0].src, OsmNodeId(2));
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 0.5, 0.5)]),
            ways(vec![
                OsmWayData::new(10, [1, 2]).with_tags([("oneway", "yes")]),
                OsmWayData::new(11, [1, 3, 2]).with_tags([("oneway", "yes")]),
            ]),
        );
        let keys: Vec<usize> = graph.edges().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![0, 1]);
    }

    #[test]
    fn edges_follow_way_id_order() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]),
            ways(vec![
                OsmWayData::new(30, [1, 2]).with_tags([("oneway", "yes")]),
                OsmWayData::new(5, [2, 1]).with_tags([("oneway", "yes")]),
                OsmWayData::new(17, [1, 2]).with_tags([("oneway", "yes")]),
            ]),
        );
        let ids: Vec<i64> = graph.edges().iter().map(|e| e.way_id.0).collect();
        assert_eq!(ids, vec![5, 17, 30]);
    }

    #[test]
    fn truncate_by_edge_keeps_crossing_edges() {
        let mut by_edge = RoadGraph::new(
            nodes(&[(1, 0.5, 0.5), (2, 2.0, 0.5), (3, 3.0, 3.0), (4, 4.0, 4.0)]),
            ways(vec![
                OsmWayData::new(10, [1, 2]).with_tags([("oneway", "yes")]),
                OsmWayData::new(11, [3, 4]).with_tags([("oneway", "yes")]),
            ]),
        );
        let mut by_node = by_edge.clone();
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);

        assert_eq!(by_edge.truncate_bbox(&bbox, true), 1);
        assert_eq!(by_edge.n_edges(), 1);
        assert_eq!(by_edge.n_nodes(), 2);

        assert_eq!(by_node.truncate_bbox(&bbox, false), 2);
        assert!(by_node.is_empty());
        assert_eq!(by_node.n_nodes(), 0);
    }

    #[test]
    fn edge_table_fills_geometry() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 1.0)]),
            ways(vec![OsmWayData::new(10, [1, 2, 3]).with_tags([("oneway", "yes")])]),
        );
        let table = graph.edge_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].geometry.0.len(), 3);
    }

    #[test]
    fn truncate_by_edge_clips_geometry_to_bbox() {
        let mut graph = RoadGraph::new(
            nodes(&[
                (1, 93.5, 39.2),
                (2, 94.5, 39.2),
                (3, 96.0, 39.2),
                (4, 98.0, 41.0),
            ]),
            ways(vec![OsmWayData::new(10, [1, 2, 3, 4]).with_tags([("highway", "trunk")])]),
        );
        let bbox = BoundingBox::new(39.0, 93.0, 39.5, 94.0);
        assert_eq!(graph.truncate_bbox(&bbox, true), 0);
        assert_eq!(graph.n_edges(), 2);

        let table = graph.edge_table();
        for row in table.rows() {
            assert_eq!(row.geometry.0.len(), 2);
            for c in row.geometry.0.iter() {
                assert!(bbox.contains_point(c.x, c.y), "{c:?} outside {bbox}");
            }
        }
        let fwd = &table.rows()[0];
        assert_eq!((fwd.src, fwd.dst), (OsmNodeId(1), OsmNodeId(2)));
        assert_eq!(fwd.geometry.0[0], coord! { x: 93.5, y: 39.2 });
        assert!((fwd.geometry.0[1].x - 94.0).abs() < 1e-9);
        assert!((fwd.geometry.0[1].y - 39.2).abs() < 1e-9);
        let rev = &table.rows()[1];
        assert_eq!((rev.src, rev.dst), (OsmNodeId(2), OsmNodeId(1)));
        assert_eq!(graph.n_nodes(), 2);
    }

    #[test]
    fn truncate_splits_edge_leaving_and_reentering() {
        let mut graph = RoadGraph::new(
            nodes(&[(1, 0.2, 0.5), (2, 0.5, 2.0), (3, 0.8, 0.5)]),
            ways(vec![OsmWayData::new(10, [1, 2, 3]).with_tags([("oneway", "yes")])]),
        );
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(graph.truncate_bbox(&bbox, true), 0);
        assert_eq!(graph.n_edges(), 2);
        let ends: Vec<_> = graph.edges().iter().map(|e| (e.src, e.dst, e.key)).collect();
        assert_eq!(
            ends,
            vec![(OsmNodeId(1), OsmNodeId(2), 0), (OsmNodeId(2), OsmNodeId(3), 0)]
        );
    }

    #[test]
    fn missing_node_splits_way_without_chord() {
        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (3, 2.0, 0.0)]),
            ways(vec![OsmWayData::new(10, [1, 2, 3]).with_tags([("oneway", "yes")])]),
        );
        assert!(graph.is_empty());
        assert_eq!(graph.n_nodes(), 0);

        let graph = RoadGraph::new(
            nodes(&[(1, 0.0, 0.0), (3, 2.0, 0.0), (4, 3.0, 0.0)]),
            ways(vec![OsmWayData::new(10, [1, 2, 3, 4]).with_tags([("oneway", "yes")])]),
        );
        assert_eq!(graph.n_edges(), 1);
        let edge = &graph.edges()[0];
        assert_eq!(edge.path, vec![OsmNodeId(3), OsmNodeId(4)]);
        assert!(graph.get_node(&OsmNodeId(1)).is_none());
        assert_eq!(graph.edge_table().rows()[0].geometry.0.len(), 2);
    }
}
