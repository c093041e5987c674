use super::SourceError;
use crate::{
    filter::NetworkFilter,
    model::{BoundingBox, OsmNodeData, OsmNodes, OsmWayData, OsmWays},
};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
    /// set by the server when the query ran out of time or memory
    remark: Option<String>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    nodes: Option<Vec<i64>>,
    tags: Option<HashMap<String, String>>,
}

/// the `[timeout:N]` to request from the server for a given HTTP client
/// timeout. the server gives up a little before the client does, so a slow
/// query returns the server's error instead of a transport timeout.
pub fn server_timeout(client_timeout_secs: u64) -> u64 {
    let margin = (client_timeout_secs / 10).max(1);
    client_timeout_secs.saturating_sub(margin).max(1)
}

/// Overpass QL query for the ways matching `filter` within `bbox` along with
/// the nodes they reference.
pub fn build_query(filter: &NetworkFilter, bbox: &BoundingBox, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{}];(way{}{};>;);out;",
        timeout_secs,
        filter.overpass_filter(),
        bbox.to_overpass_clause()
    )
}

/// parses an `[out:json]` response body. ways are filtered again locally so
/// that every source applies the same network definition.
pub fn parse_response(
    body: &str,
    filter: &NetworkFilter,
) -> Result<(OsmNodes, OsmWays), SourceError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
    if let Some(remark) = &response.remark {
        log::warn!("overpass remark: {remark}");
    }
    let mut nodes: OsmNodes = HashMap::new();
    let mut ways: OsmWays = HashMap::new();
    for element in response.elements {
        match element.element_type.as_str() {
            "node" => match (element.lon, element.lat) {
                (Some(lon), Some(lat)) => {
                    let node = OsmNodeData::new(element.id, lon, lat);
                    nodes.insert(node.osmid, node);
                }
                _ => log::debug!("node {} has no location", element.id),
            },
            "way" => {
                let tags = element
                    .tags
                    .iter()
                    .flatten()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect_vec();
                if filter.accept(&tags) {
                    let way = OsmWayData::new(element.id, element.nodes.unwrap_or_default())
                        .with_tags(tags);
                    ways.insert(way.osmid, way);
                }
            }
            _ => {}
        }
    }
    Ok((nodes, ways))
}

#[cfg(test)]
mod tests {
    use super::{build_query, parse_response, server_timeout};
    use crate::{filter::NetworkFilter, model::BoundingBox, source::SourceError};

    #[test]
    fn query_contains_filter_and_box() {
        let query = build_query(
            &NetworkFilter::default(),
            &BoundingBox::new(39.0, 93.0, 39.5, 94.0),
            162,
        );
        assert!(query.starts_with("[out:json][timeout:162];(way[\"highway\"]"));
        assert!(query.ends_with("(39,93,39.5,94);>;);out;"));
    }

    #[test]
    fn server_gives_up_before_client() {
        assert_eq!(server_timeout(180), 162);
        assert_eq!(server_timeout(5), 4);
        assert_eq!(server_timeout(1), 1);
        for secs in [2, 10, 60, 180, 900] {
            assert!(server_timeout(secs) < secs);
        }
    }

    #[test]
    fn parses_nodes_and_ways() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 39.1, "lon": 93.1},
                {"type": "node", "id": 2, "lat": 39.2, "lon": 93.2},
                {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "trunk", "ref": "G7"}},
                {"type": "way", "id": 11, "nodes": [1, 2], "tags": {"highway": "footway"}}
            ]
        }"#;
        match parse_response(body, &NetworkFilter::default()) {
            Ok((nodes, ways)) => {
                assert_eq!(nodes.len(), 2);
                assert_eq!(ways.len(), 1);
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn non_json_body_is_rejected() {
        let result = parse_response("<html>rate limited</html>", &NetworkFilter::default());
        assert!(matches!(result, Err(SourceError::InvalidResponse(_))));
    }
}
