use super::{
    build_clipped_graph,
    overpass_ops::{build_query, parse_response, server_timeout},
    Extent, NetworkSource, SourceError,
};
use crate::{
    filter::NetworkFilter,
    geocode::Geocoder,
    http::HttpClient,
    model::{BoundingBox, RoadGraph},
};
use std::sync::Arc;

/// downloads the road network from an Overpass API interpreter endpoint.
pub struct OverpassSource {
    url: String,
    timeout_secs: u64,
    filter: NetworkFilter,
    truncate_by_edge: bool,
    client: Arc<dyn HttpClient>,
    geocoder: Box<dyn Geocoder>,
}

impl OverpassSource {
    pub fn new(
        url: &str,
        timeout_secs: u64,
        filter: NetworkFilter,
        truncate_by_edge: bool,
        client: Arc<dyn HttpClient>,
        geocoder: Box<dyn Geocoder>,
    ) -> OverpassSource {
        OverpassSource {
            url: String::from(url),
            timeout_secs,
            filter,
            truncate_by_edge,
            client,
            geocoder,
        }
    }

    fn resolve(&self, extent: &Extent) -> Result<BoundingBox, SourceError> {
        match extent {
            Extent::Bbox(bbox) => Ok(*bbox),
            Extent::Place(place) => Ok(self.geocoder.geocode(place)?),
        }
    }
}

impl NetworkSource for OverpassSource {
    fn name(&self) -> &str {
        "overpass"
    }

    fn acquire(&self, extent: &Extent) -> Result<RoadGraph, SourceError> {
        let bbox = self.resolve(extent)?;
        let query = build_query(&self.filter, &bbox, server_timeout(self.timeout_secs));
        log::info!("requesting road network for {bbox} from {}", self.url);
        log::debug!("overpass query: {query}");
        let body = self.client.post_form(&self.url, &[("data", query.as_str())])?;
        let (nodes, ways) = parse_response(&body, &self.filter)?;
        log::info!("overpass returned {} nodes and {} ways", nodes.len(), ways.len());
        Ok(build_clipped_graph(nodes, ways, &bbox, self.truncate_by_edge))
    }
}

#[cfg(test)]
mod tests {
    use super::OverpassSource;
    use crate::{
        filter::NetworkFilter,
        geocode::{GeocodeError, Geocoder},
        http::{HttpClient, HttpError},
        model::BoundingBox,
        source::{Extent, NetworkSource},
    };
    use std::{cell::RefCell, sync::Arc};

    const BODY: &str = r#"{"elements": [
        {"type": "node", "id": 1, "lat": 39.1, "lon": 93.1},
        {"type": "node", "id": 2, "lat": 39.2, "lon": 93.2},
        {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "trunk", "ref": "G7"}}
    ]}"#;

    #[derive(Default)]
    struct RecordingClient {
        forms: RefCell<Vec<String>>,
    }

    impl HttpClient for RecordingClient {
        fn get(&self, url: &str, _query: &[(&str, &str)]) -> Result<String, HttpError> {
            Err(HttpError::Transport {
                url: String::from(url),
                message: String::from("unexpected GET"),
            })
        }

        fn post_form(&self, _url: &str, form: &[(&str, &str)]) -> Result<String, HttpError> {
            let (key, value) = form[0];
            assert_eq!(key, "data");
            self.forms.borrow_mut().push(String::from(value));
            Ok(String::from(BODY))
        }
    }

    struct FixedGeocoder;

    impl Geocoder for FixedGeocoder {
        fn geocode(&self, _place: &str) -> Result<BoundingBox, GeocodeError> {
            Ok(BoundingBox::new(39.0, 93.0, 39.5, 94.0))
        }
    }

    #[test]
    fn place_extent_is_geocoded() {
        let client = Arc::new(RecordingClient::default());
        let source = OverpassSource::new(
            "https://overpass.example.org/api/interpreter",
            180,
            NetworkFilter::default(),
            true,
            client.clone(),
            Box::new(FixedGeocoder),
        );
        match source.acquire(&Extent::Place(String::from("Hami"))) {
            Ok(graph) => assert_eq!(graph.n_edges(), 2),
            Err(e) => panic!("{e}"),
        }
        let forms = client.forms.borrow();
        assert_eq!(forms.len(), 1);
        assert!(forms[0].contains("(39,93,39.5,94)"));
        assert!(forms[0].starts_with("[out:json][timeout:162];"));
    }
}
