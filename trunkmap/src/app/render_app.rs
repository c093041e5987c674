use crate::{
    classify::classify,
    config::{ConfigError, MapConfiguration},
    model::MapAppError,
    render::{render, MapStyle, RenderReport},
    source::{Extent, NetworkLoader},
};
use std::sync::Arc;

/// loads the road network, classifies its edges and draws the map.
pub struct RenderApp {
    conf: MapConfiguration,
    loader: NetworkLoader,
}

impl RenderApp {
    pub fn new(conf: MapConfiguration, loader: NetworkLoader) -> RenderApp {
        RenderApp { conf, loader }
    }

    /// validates the configuration and builds the network sources it names.
    pub fn from_config(conf: MapConfiguration) -> Result<RenderApp, MapAppError> {
        conf.validate_for_render()?;
        let client = conf
            .http
            .build_client()
            .map_err(|e| ConfigError::invalid("http", e.to_string()))?;
        let loader = NetworkLoader::from_config(&conf, Arc::new(client));
        log::info!("network sources: {}", loader.source_names().join(", "));
        Ok(RenderApp::new(conf, loader))
    }

    pub fn run(&self) -> Result<RenderReport, MapAppError> {
        self.conf.validate_for_render()?;
        let bbox = self
            .conf
            .bbox
            .ok_or_else(|| ConfigError::MissingField(String::from("bbox")))?;

        let loaded = self.loader.load(&Extent::Bbox(bbox))?;
        log::info!("data source: {}", loaded.source);

        let table = loaded.graph.edge_table();
        let classification = classify(
            &table,
            &self.conf.target_ref_set(),
            &self.conf.allowed_highway_set(),
        );
        for advisory in classification.advisories.iter() {
            log::warn!("{advisory}");
        }

        let style = MapStyle::from(&self.conf);
        let report = render(&classification, &style, &self.conf.output)?;
        log::info!(
            "drew {} background and {} target edges to {}",
            report.background_edges,
            report.total_target_edges(),
            report.output.display()
        );
        Ok(report)
    }
}
