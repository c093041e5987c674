use super::OsmNodeId;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct OsmWayId(pub i64);

impl Display for OsmWayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// the subset of an OSM way needed to build and draw the road graph.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct OsmWayData {
    pub osmid: OsmWayId,
    pub nodes: Vec<OsmNodeId>,
    pub highway: Option<String>,
    pub junction: Option<String>,
    pub name: Option<String>,
    pub oneway: Option<String>,
    pub _ref: Option<String>,
}

impl OsmWayData {
    /// separator used by OSM for multi-valued tags such as `ref=G7;G30`
    pub const VALUE_DELIMITER: char = ';';

    /// creates a way from its id and node list. consecutive duplicate node
    /// references are removed.
    pub fn new(osmid: i64, nodes: impl IntoIterator<Item = i64>) -> OsmWayData {
        let mut out = OsmWayData {
            osmid: OsmWayId(osmid),
            nodes: nodes.into_iter().map(OsmNodeId).collect_vec(),
            ..Default::default()
        };
        out.nodes.dedup();
        if out.nodes.is_empty() {
            log::warn!("way {osmid} has no nodes");
        }
        out
    }

    /// copies a tag into this way if it is one of the retained keys.
    pub fn set_tag(&mut self, key: &str, value: &str) {
        let value = Some(String::from(value.trim()));
        match key {
            "highway" => self.highway = value,
            "junction" => self.junction = value,
            "name" => self.name = value,
            "oneway" => self.oneway = value,
            "ref" => self._ref = value,
            _ => {}
        }
    }

    pub fn with_tags<'a>(mut self, tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (k, v) in tags {
            self.set_tag(k, v);
        }
        self
    }

    /// osmnx.graph._is_path_one_way
    ///   the values OSM uses in its 'oneway' tag to denote True, and to denote
    ///   travel can only occur in the opposite direction of the node order. see:
    ///   https://wiki.openstreetmap.org/wiki/Key:oneway
    ///     ```python
    ///     oneway_values = {"yes", "true", "1", "-1", "reverse", "T", "F"}
    ///     reversed_values = {"-1", "reverse", "T"}
    ///     ```
    pub fn is_one_way(&self) -> bool {
        if let Some(oneway) = &self.oneway {
            matches!(
                oneway.as_str().trim(),
                "yes" | "true" | "1" | "-1" | "reverse" | "T" | "F"
            )
        } else if let Some(junction) = &self.junction {
            // roundabouts are one-way but are not explicitly tagged as such
            junction.as_str().trim() == "roundabout"
        } else {
            false
        }
    }

    /// osmnx.graph._is_path_reversed
    pub fn is_reverse(&self) -> bool {
        match &self.oneway {
            Some(oneway) => matches!(oneway.as_str(), "-1" | "reverse" | "T"),
            None => false,
        }
    }
}

impl<'a> From<&'a osmpbf::elements::Way<'a>> for OsmWayData {
    fn from(way: &'a osmpbf::elements::Way) -> Self {
        OsmWayData::new(way.id(), way.refs()).with_tags(way.tags())
    }
}

#[cfg(test)]
mod tests {
    use super::OsmWayData;
    use crate::model::OsmNodeId;

    #[test]
    fn new_removes_repeated_nodes() {
        let way = OsmWayData::new(7, [1, 1, 2, 3, 3]);
        assert_eq!(way.nodes, vec![OsmNodeId(1), OsmNodeId(2), OsmNodeId(3)]);
    }

    #[test]
    fn oneway_semantics() {
        let way = OsmWayData::new(1, [1, 2]).with_tags([("oneway", "-1")]);
        assert!(way.is_one_way());
        assert!(way.is_reverse());

        let roundabout = OsmWayData::new(2, [1, 2]).with_tags([("junction", "roundabout")]);
        assert!(roundabout.is_one_way());
        assert!(!roundabout.is_reverse());

        let two_way = OsmWayData::new(3, [1, 2]).with_tags([("oneway", "no")]);
        assert!(!two_way.is_one_way());
    }

    #[test]
    fn retained_tags_are_trimmed() {
        let way = OsmWayData::new(1, [1, 2]).with_tags([
            ("ref", " G7 "),
            ("highway", "trunk"),
            ("surface", "asphalt"),
        ]);
        assert_eq!(way._ref.as_deref(), Some("G7"));
        assert_eq!(way.highway.as_deref(), Some("trunk"));
    }
}
