use super::{
    ClippedFileSource, DataUnavailableError, Extent, NetworkSource, OverpassSource, PbfSource,
};
use crate::{
    config::MapConfiguration, geocode::NominatimGeocoder, http::HttpClient, model::RoadGraph,
};
use std::sync::Arc;

/// a road graph along with the name of the source that produced it.
#[derive(Debug)]
pub struct LoadedNetwork {
    pub graph: RoadGraph,
    pub source: String,
}

/// tries a fixed, ordered list of network sources and keeps the first
/// non-empty graph.
pub struct NetworkLoader {
    sources: Vec<Box<dyn NetworkSource>>,
}

impl NetworkLoader {
    pub fn new(sources: Vec<Box<dyn NetworkSource>>) -> NetworkLoader {
        NetworkLoader { sources }
    }

    /// local sources first (clipped extract, then raw PBF) followed by the
    /// Overpass API. sources are omitted when their path is not configured or
    /// when `online` is false.
    pub fn from_config(conf: &MapConfiguration, client: Arc<dyn HttpClient>) -> NetworkLoader {
        let filter = conf.network_filter();
        let mut sources: Vec<Box<dyn NetworkSource>> = vec![];
        if let Some(path) = &conf.osm_xml_path {
            sources.push(Box::new(ClippedFileSource::new(
                path,
                filter.clone(),
                conf.truncate_by_edge,
            )));
        }
        if let Some(path) = &conf.pbf_path {
            sources.push(Box::new(PbfSource::new(
                path,
                filter.clone(),
                conf.truncate_by_edge,
            )));
        }
        if conf.online {
            let geocoder = NominatimGeocoder::new(&conf.http.nominatim_url, client.clone());
            sources.push(Box::new(OverpassSource::new(
                &conf.http.overpass_url,
                conf.http.timeout_secs,
                filter,
                conf.truncate_by_edge,
                client,
                Box::new(geocoder),
            )));
        }
        NetworkLoader::new(sources)
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// returns the graph of the first source that produces a non-empty one.
    /// each failure is logged and collected into the error returned when no
    /// source succeeds.
    pub fn load(&self, extent: &Extent) -> Result<LoadedNetwork, DataUnavailableError> {
        let mut failures = vec![];
        for source in self.sources.iter() {
            log::info!("loading road network from {} for {extent}", source.name());
            match source.acquire(extent) {
                Ok(graph) if graph.is_empty() => {
                    log::warn!("{} produced an empty road network", source.name());
                    failures.push((
                        String::from(source.name()),
                        String::from("no road network within the extent"),
                    ));
                }
                Ok(graph) => {
                    log::info!(
                        "data source: {} ({} nodes, {} edges)",
                        source.name(),
                        graph.n_nodes(),
                        graph.n_edges()
                    );
                    return Ok(LoadedNetwork {
                        graph,
                        source: String::from(source.name()),
                    });
                }
                Err(e) => {
                    log::warn!("{} failed: {e}", source.name());
                    failures.push((String::from(source.name()), e.to_string()));
                }
            }
        }
        Err(DataUnavailableError { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::NetworkLoader;
    use crate::{
        model::{BoundingBox, OsmNodeData, OsmWayData, RoadGraph},
        source::{Extent, NetworkSource, SourceError},
    };
    use std::path::PathBuf;

    enum Outcome {
        Fail,
        Empty,
        Graph,
    }

    struct StubSource(&'static str, Outcome);

    impl NetworkSource for StubSource {
        fn name(&self) -> &str {
            self.0
        }

        fn acquire(&self, _extent: &Extent) -> Result<RoadGraph, SourceError> {
            match self.1 {
                Outcome::Fail => Err(SourceError::FileNotFound(PathBuf::from("missing.pbf"))),
                Outcome::Empty => Ok(RoadGraph::default()),
                Outcome::Graph => {
                    let nodes = [OsmNodeData::new(1, 93.1, 39.1), OsmNodeData::new(2, 93.2, 39.2)]
                        .into_iter()
                        .map(|n| (n.osmid, n))
                        .collect();
                    let way = OsmWayData::new(10, [1, 2]).with_tags([("highway", "trunk")]);
                    Ok(RoadGraph::new(nodes, [(way.osmid, way)].into_iter().collect()))
                }
            }
        }
    }

    fn extent() -> Extent {
        Extent::Bbox(BoundingBox::new(39.0, 93.0, 39.5, 94.0))
    }

    #[test]
    fn falls_back_in_order() {
        let loader = NetworkLoader::new(vec![
            Box::new(StubSource("pbf", Outcome::Fail)),
            Box::new(StubSource("clipped extract", Outcome::Empty)),
            Box::new(StubSource("overpass", Outcome::Graph)),
        ]);
        match loader.load(&extent()) {
            Ok(loaded) => {
                assert_eq!(loaded.source, "overpass");
                assert_eq!(loaded.graph.n_edges(), 2);
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn first_success_wins() {
        let loader = NetworkLoader::new(vec![
            Box::new(StubSource("pbf", Outcome::Graph)),
            Box::new(StubSource("overpass", Outcome::Fail)),
        ]);
        match loader.load(&extent()) {
            Ok(loaded) => assert_eq!(loaded.source, "pbf"),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn all_failures_are_reported() {
        let loader = NetworkLoader::new(vec![
            Box::new(StubSource("pbf", Outcome::Fail)),
            Box::new(StubSource("overpass", Outcome::Empty)),
        ]);
        match loader.load(&extent()) {
            Ok(_) => panic!("expected every source to fail"),
            Err(e) => {
                assert_eq!(e.failures.len(), 2);
                assert_eq!(e.failures[0].0, "pbf");
                assert!(e.to_string().contains("missing.pbf"));
            }
        }
    }
}
