use super::{OsmNodeId, OsmWayData, OsmWayId};
use geo::LineString;

/// one row of the flattened edge table. geometry is always present.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub src: OsmNodeId,
    pub dst: OsmNodeId,
    pub key: usize,
    pub way_id: OsmWayId,
    pub highway: Option<String>,
    pub _ref: Option<String>,
    pub name: Option<String>,
    pub geometry: LineString<f64>,
}

impl Default for EdgeRecord {
    fn default() -> Self {
        EdgeRecord {
            src: OsmNodeId::default(),
            dst: OsmNodeId::default(),
            key: 0,
            way_id: OsmWayId::default(),
            highway: None,
            _ref: None,
            name: None,
            geometry: LineString(vec![]),
        }
    }
}

impl EdgeRecord {
    /// individual route codes of a possibly multi-valued `ref` tag.
    pub fn ref_values(&self) -> impl Iterator<Item = &str> {
        split_values(self._ref.as_deref())
    }

    /// individual road classes of a possibly multi-valued `highway` tag.
    pub fn highway_values(&self) -> impl Iterator<Item = &str> {
        split_values(self.highway.as_deref())
    }
}

fn split_values(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .into_iter()
        .flat_map(|v| v.split(OsmWayData::VALUE_DELIMITER))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// the edges of a road graph in graph order.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    rows: Vec<EdgeRecord>,
}

impl EdgeTable {
    pub fn rows(&self) -> &[EdgeRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// a table has a `ref` attribute if at least one of its edges carries one.
    pub fn has_ref_attribute(&self) -> bool {
        self.rows.iter().any(|r| r._ref.is_some())
    }

    /// a table has a `highway` attribute if at least one of its edges carries one.
    pub fn has_highway_attribute(&self) -> bool {
        self.rows.iter().any(|r| r.highway.is_some())
    }
}

impl From<Vec<EdgeRecord>> for EdgeTable {
    fn from(rows: Vec<EdgeRecord>) -> Self {
        EdgeTable { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeRecord;
    use itertools::Itertools;

    #[test]
    fn multi_valued_ref_is_split() {
        let record = EdgeRecord {
            _ref: Some(String::from("G7; S301;")),
            ..Default::default()
        };
        assert_eq!(record.ref_values().collect_vec(), vec!["G7", "S301"]);
    }

    #[test]
    fn absent_ref_yields_nothing() {
        let record = EdgeRecord::default();
        assert_eq!(record.ref_values().count(), 0);
    }

    #[test]
    fn default_record_has_empty_geometry() {
        let record = EdgeRecord::default();
        assert!(record.geometry.0.is_empty());
        assert!(record.highway.is_none());
    }
}
