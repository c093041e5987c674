use super::SourceError;
use crate::{
    filter::NetworkFilter,
    model::{OsmNodeData, OsmNodes, OsmWayData, OsmWays},
};
use itertools::Itertools;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// reads the nodes and the ways accepted by `filter` from an OSM XML file.
pub fn read_osm_xml(
    filepath: &Path,
    filter: &NetworkFilter,
) -> Result<(OsmNodes, OsmWays), SourceError> {
    if !filepath.is_file() {
        return Err(SourceError::FileNotFound(filepath.to_path_buf()));
    }
    let file = File::open(filepath).map_err(|e| SourceError::IoError {
        path: filepath.to_path_buf(),
        source: e,
    })?;
    let (nodes, ways) =
        parse_osm_xml(BufReader::new(file), filter).map_err(|message| SourceError::XmlError {
            path: filepath.to_path_buf(),
            message,
        })?;
    log::info!(
        "read {} nodes and {} ways from {}",
        nodes.len(),
        ways.len(),
        filepath.display()
    );
    Ok((nodes, ways))
}

/// a way whose closing tag has not been read yet
struct PendingWay {
    id: i64,
    node_refs: Vec<i64>,
    tags: Vec<(String, String)>,
}

impl PendingWay {
    fn finish(self, filter: &NetworkFilter) -> Option<OsmWayData> {
        let tags = self
            .tags
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect_vec();
        if filter.accept(&tags) {
            Some(OsmWayData::new(self.id, self.node_refs).with_tags(tags))
        } else {
            None
        }
    }
}

/// parses OSM XML `node`, `way`, `nd` and `tag` elements. relations are ignored.
pub fn parse_osm_xml<R: BufRead>(
    source: R,
    filter: &NetworkFilter,
) -> Result<(OsmNodes, OsmWays), String> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut nodes: OsmNodes = HashMap::new();
    let mut ways: OsmWays = HashMap::new();
    let mut current_way: Option<PendingWay> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if let Some(way) = start_element(&e, &mut nodes, &mut current_way)? {
                    current_way = Some(way);
                }
            }
            Event::Empty(e) => {
                // a way without children has no nodes and cannot form an edge
                let _ = start_element(&e, &mut nodes, &mut current_way)?;
            }
            Event::End(e) => {
                if e.name().as_ref() == b"way" {
                    if let Some(way) = current_way.take().and_then(|w| w.finish(filter)) {
                        ways.insert(way.osmid, way);
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok((nodes, ways))
}

/// handles an opening or self-closing element. returns a new pending way when
/// the element opens one.
fn start_element(
    e: &BytesStart<'_>,
    nodes: &mut OsmNodes,
    current_way: &mut Option<PendingWay>,
) -> Result<Option<PendingWay>, String> {
    match e.name().as_ref() {
        b"node" => {
            let id = parse_attr::<i64>(e, b"id")?;
            let lat = parse_attr::<f64>(e, b"lat")?;
            let lon = parse_attr::<f64>(e, b"lon")?;
            if let (Some(id), Some(lat), Some(lon)) = (id, lat, lon) {
                let node = OsmNodeData::new(id, lon, lat);
                nodes.insert(node.osmid, node);
            }
            Ok(None)
        }
        b"way" => match parse_attr::<i64>(e, b"id")? {
            Some(id) => Ok(Some(PendingWay {
                id,
                node_refs: vec![],
                tags: vec![],
            })),
            None => Err(String::from("way element without an id")),
        },
        b"nd" => {
            if let (Some(way), Some(node_ref)) = (current_way.as_mut(), parse_attr(e, b"ref")?) {
                way.node_refs.push(node_ref);
            }
            Ok(None)
        }
        b"tag" => {
            if let Some(way) = current_way.as_mut() {
                if let (Some(k), Some(v)) = (get_attr_value(e, b"k")?, get_attr_value(e, b"v")?) {
                    way.tags.push((k, v));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn get_attr_value(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, String> {
    for attr in event.attributes().with_checks(false) {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn parse_attr<T: std::str::FromStr>(
    event: &BytesStart<'_>,
    key: &[u8],
) -> Result<Option<T>, String> {
    Ok(get_attr_value(event, key)?.and_then(|value| value.parse::<T>().ok()))
}

#[cfg(test)]
mod tests {
    use super::parse_osm_xml;
    use crate::{
        filter::NetworkFilter,
        model::{OsmNodeId, OsmWayId},
    };

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="osmium/1.16.0">
  <node id="1" lat="39.10" lon="93.10"/>
  <node id="2" lat="39.20" lon="93.20"/>
  <node id="3" lat="39.30" lon="93.30">
    <tag k="highway" v="traffic_signals"/>
  </node>
  <way id="100">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="trunk"/>
    <tag k="ref" v="G7"/>
    <tag k="name" v="Beijing &amp; Urumqi Expressway"/>
  </way>
  <way id="101">
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="footway"/>
  </way>
  <relation id="7">
    <member type="way" ref="100" role=""/>
    <tag k="type" v="route"/>
  </relation>
</osm>"#;

    #[test]
    fn parses_nodes_and_filtered_ways() {
        match parse_osm_xml(SAMPLE.as_bytes(), &NetworkFilter::default()) {
            Ok((nodes, ways)) => {
                assert_eq!(nodes.len(), 3);
                let node = &nodes[&OsmNodeId(2)];
                assert_eq!((node.x, node.y), (93.20, 39.20));
                assert_eq!(ways.len(), 1);
                let way = &ways[&OsmWayId(100)];
                assert_eq!(way.nodes.len(), 3);
                assert_eq!(way._ref.as_deref(), Some("G7"));
                assert_eq!(way.name.as_deref(), Some("Beijing & Urumqi Expressway"));
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn malformed_document_is_an_error() {
        let broken = r#"<osm><way id="1"><nd ref="1"/></node></osm>"#;
        assert!(parse_osm_xml(broken.as_bytes(), &NetworkFilter::default()).is_err());
    }
}
