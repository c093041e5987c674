use crate::{
    config::{ConfigError, MapConfiguration},
    extract::{resolve_bbox, CommandRunner, OsmiumExtractor, SystemCommandRunner},
    geocode::{Geocoder, NominatimGeocoder},
    model::{BoundingBox, MapAppError},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// result of an extraction run
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Extracted { output: PathBuf, bbox: BoundingBox },
    /// the output already existed and `overwrite` is disabled
    Skipped { output: PathBuf },
}

/// clips the regional PBF to the configured region with the external tool.
pub struct ExtractApp {
    conf: MapConfiguration,
    geocoder: Box<dyn Geocoder>,
    runner: Box<dyn CommandRunner>,
}

impl ExtractApp {
    pub fn new(
        conf: MapConfiguration,
        geocoder: Box<dyn Geocoder>,
        runner: Box<dyn CommandRunner>,
    ) -> ExtractApp {
        ExtractApp {
            conf,
            geocoder,
            runner,
        }
    }

    pub fn from_config(conf: MapConfiguration) -> Result<ExtractApp, MapAppError> {
        conf.validate()?;
        let client = conf
            .http
            .build_client()
            .map_err(|e| ConfigError::invalid("http", e.to_string()))?;
        let geocoder = NominatimGeocoder::new(&conf.http.nominatim_url, Arc::new(client));
        Ok(ExtractApp::new(
            conf,
            Box::new(geocoder),
            Box::new(SystemCommandRunner),
        ))
    }

    pub fn run(&self) -> Result<ExtractOutcome, MapAppError> {
        self.conf.validate()?;
        let source = self.conf.extract_source_path();
        log::info!("using PBF file: {}", source.display());
        if !source.is_file() {
            log::error!(
                "download a regional extract (e.g. from https://download.geofabrik.de/) to {}",
                source.display()
            );
            return Err(MapAppError::FileNotFound(source));
        }

        let output = self.conf.extract_output_path();
        if output.exists() && !self.conf.overwrite {
            log::warn!(
                "{} already exists, set 'overwrite: true' to replace it",
                output.display()
            );
            return Ok(ExtractOutcome::Skipped { output });
        }

        let bbox = resolve_bbox(self.conf.place.as_deref(), self.conf.bbox, self.geocoder.as_ref())?;
        log::info!("extracting bbox={bbox}");
        log::info!("input PBF: {}", source.display());
        log::info!("output file: {}", output.display());

        let extractor = OsmiumExtractor::new(
            &self.conf.osmium.program,
            self.conf.osmium.bbox_order,
            self.runner.as_ref(),
        );
        extractor.extract(&source, &bbox, &output, self.conf.overwrite)?;
        self.log_configuration_hints(&output, &bbox);
        Ok(ExtractOutcome::Extracted { output, bbox })
    }

    fn log_configuration_hints(&self, output: &Path, bbox: &BoundingBox) {
        let shown = output
            .strip_prefix(self.conf.config_dir())
            .unwrap_or(output);
        log::info!("extraction finished. set the following in the configuration file (if not set already):");
        log::info!("  osm_xml_path: \"{}\"", shown.display());
        log::info!(
            "  bbox: [{}, {}, {}, {}]",
            bbox.south,
            bbox.west,
            bbox.north,
            bbox.east
        );
        if self.conf.bbox.is_none() && self.conf.place.is_some() {
            log::info!("  # place may be removed once bbox is set");
        }
    }
}
