use super::{ConfigError, FigureSettings, HttpSettings, OsmiumSettings};
use crate::{
    classify::DEFAULT_ALLOWED_HIGHWAYS,
    filter::{FilterQuery, NetworkFilter},
    model::BoundingBox,
    render::color,
    util::fs::resolve_path,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

/// output files are always written below this directory, relative to the config file
pub const OUTPUT_DIRECTORY: [&str; 2] = ["data", "outputs"];
pub const DEFAULT_OUTPUT: &str = "road_network.svg";
/// source and destination of the extraction tool when no path is configured
pub const DEFAULT_EXTRACT_SOURCE: &str = "map/region-latest.osm.pbf";
pub const DEFAULT_EXTRACT_OUTPUT: &str = "map/region.osm";

/// the configuration document shared by the extraction and rendering tools.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct MapConfiguration {
    /// study area as `[south, west, north, east]`
    pub bbox: Option<BoundingBox>,
    /// place name geocoded when no bbox is given
    pub place: Option<String>,
    pub pbf_path: Option<PathBuf>,
    pub osm_xml_path: Option<PathBuf>,
    pub output: PathBuf,
    /// reference codes of the highlighted roads, in drawing order
    pub target_roads: Vec<String>,
    pub target_colors: HashMap<String, String>,
    pub road_names: HashMap<String, String>,
    pub bg_road_color: String,
    pub bg_road_width: f64,
    pub target_width: f64,
    pub title: String,
    pub bg_label: String,
    pub allowed_highways: Vec<String>,
    pub overwrite: bool,
    pub online: bool,
    pub truncate_by_edge: bool,
    pub(crate) network_filter: Option<Vec<FilterQuery>>,
    pub figure: FigureSettings,
    pub http: HttpSettings,
    pub osmium: OsmiumSettings,
    #[serde(skip)]
    pub(crate) config_dir: PathBuf,
}

impl Default for MapConfiguration {
    fn default() -> Self {
        Self {
            bbox: None,
            place: None,
            pbf_path: None,
            osm_xml_path: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            target_roads: vec![],
            target_colors: HashMap::new(),
            road_names: HashMap::new(),
            bg_road_color: String::from("#bdc3c7"),
            bg_road_width: 1.2,
            target_width: 3.5,
            title: String::from("Road Network"),
            bg_label: String::from("Other roads"),
            allowed_highways: DEFAULT_ALLOWED_HIGHWAYS.iter().map(|h| String::from(*h)).collect(),
            overwrite: false,
            online: true,
            truncate_by_edge: true,
            network_filter: None,
            figure: FigureSettings::default(),
            http: HttpSettings::default(),
            osmium: OsmiumSettings::default(),
            config_dir: PathBuf::new(),
        }
    }
}

impl MapConfiguration {
    /// directory containing the configuration file. relative paths are resolved against it.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn network_filter(&self) -> NetworkFilter {
        NetworkFilter::from(self.network_filter.clone())
    }

    pub fn target_ref_set(&self) -> HashSet<String> {
        self.target_roads.iter().map(|r| r.trim().to_string()).collect()
    }

    pub fn allowed_highway_set(&self) -> HashSet<String> {
        self.allowed_highways.iter().map(|h| h.trim().to_string()).collect()
    }

    /// the regional PBF clipped by the extraction tool
    pub fn extract_source_path(&self) -> PathBuf {
        self.pbf_path
            .clone()
            .unwrap_or_else(|| resolve_path(&self.config_dir, Path::new(DEFAULT_EXTRACT_SOURCE)))
    }

    /// the intermediate file written by the extraction tool
    pub fn extract_output_path(&self) -> PathBuf {
        self.osm_xml_path
            .clone()
            .unwrap_or_else(|| resolve_path(&self.config_dir, Path::new(DEFAULT_EXTRACT_OUTPUT)))
    }

    /// rewrites path-valued fields relative to `config_dir`. only the file name
    /// of `output` is kept, placed in the fixed output directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        self.config_dir = config_dir.to_path_buf();
        self.pbf_path = self.pbf_path.as_ref().map(|p| resolve_path(config_dir, p));
        self.osm_xml_path = self.osm_xml_path.as_ref().map(|p| resolve_path(config_dir, p));
        let file_name = self.output.file_name().ok_or_else(|| {
            ConfigError::invalid(
                "output",
                format!("'{}' does not name a file", self.output.display()),
            )
        })?;
        let mut output = OUTPUT_DIRECTORY
            .iter()
            .fold(config_dir.to_path_buf(), |dir, d| dir.join(d));
        output.push(file_name);
        self.output = output;
        Ok(())
    }

    /// checks the options every tool relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bbox) = &self.bbox {
            bbox.validate().map_err(|e| ConfigError::invalid("bbox", e))?;
        }
        if self.http.max_attempts == 0 {
            return Err(ConfigError::invalid("http.max_attempts", "must be at least 1"));
        }
        if !self.http.backoff_secs.is_finite() || self.http.backoff_secs < 0.0 {
            return Err(ConfigError::invalid(
                "http.backoff_secs",
                "must be a non-negative number",
            ));
        }
        if self.osmium.program.trim().is_empty() {
            return Err(ConfigError::invalid("osmium.program", "must not be empty"));
        }
        Ok(())
    }

    /// checks the options the rendering tool requires: a bbox, at least one
    /// target road, valid colors and positive sizes.
    pub fn validate_for_render(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.bbox.is_none() {
            return Err(ConfigError::MissingField(String::from("bbox")));
        }
        if self.target_roads.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::MissingField(String::from("target_roads")));
        }
        validate_color("bg_road_color", &self.bg_road_color)?;
        for (code, value) in self.target_colors.iter() {
            validate_color(&format!("target_colors.{code}"), value)?;
        }
        for (field, value) in [
            ("bg_road_width", self.bg_road_width),
            ("target_width", self.target_width),
            ("figure.width", self.figure.width),
            ("figure.height", self.figure.height),
            ("figure.dpi", self.figure.dpi),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a positive number, found {value}"),
                ));
            }
        }
        Ok(())
    }
}

fn validate_color(field: &str, value: &str) -> Result<(), ConfigError> {
    if color::is_valid_color(value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("'{value}' is not a '#rrggbb' color or a color name"),
        ))
    }
}

impl TryFrom<&Path> for MapConfiguration {
    type Error = ConfigError;

    fn try_from(f: &Path) -> Result<Self, Self::Error> {
        if !f.is_file() {
            return Err(ConfigError::FileNotFound(f.to_path_buf()));
        }
        let read_error = |e: std::io::Error| ConfigError::ReadError {
            path: f.to_path_buf(),
            source: e,
        };
        let parse_error = |message: String| ConfigError::ParseError {
            path: f.to_path_buf(),
            message,
        };
        let s = std::fs::read_to_string(f).map_err(read_error)?;
        let extension = f
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let mut conf: MapConfiguration = match extension.as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&s).map_err(|e| parse_error(e.to_string()))?
            }
            Some("toml") => toml::from_str(&s).map_err(|e| parse_error(e.to_string()))?,
            Some("json") => serde_json::from_str(&s).map_err(|e| parse_error(e.to_string()))?,
            _ => return Err(parse_error(String::from("unsupported file type"))),
        };
        let absolute = std::path::absolute(f).map_err(read_error)?;
        let config_dir = absolute.parent().unwrap_or(Path::new("/"));
        conf.resolve_paths(config_dir)?;
        log::debug!("loaded configuration from {}", absolute.display());
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::MapConfiguration;
    use crate::{config::ConfigError, model::BoundingBox};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_config(name: &str, contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write config");
        (dir, path)
    }

    #[test]
    fn yaml_defaults_and_paths() {
        let (dir, path) = write_config(
            "config.yaml",
            r##"
bbox: [39.0, 93.0, 39.5, 94.0]
target_roads: [G7]
pbf_path: ../maps/./missing.pbf
output: ../../etc/hami.png
target_colors:
  G7: "#ff0000"
"##,
        );
        let conf = match MapConfiguration::try_from(path.as_path()) {
            Ok(c) => c,
            Err(e) => panic!("{e}"),
        };
        let base = std::path::absolute(dir.path()).expect("absolute path");
        assert_eq!(conf.bbox, Some(BoundingBox::new(39.0, 93.0, 39.5, 94.0)));
        assert_eq!(conf.bg_road_color, "#bdc3c7");
        assert_eq!(conf.title, "Road Network");
        assert!(conf.online);
        let parent = base.parent().unwrap_or(Path::new("/"));
        assert_eq!(conf.pbf_path, Some(parent.join("maps").join("missing.pbf")));
        assert_eq!(conf.output, base.join("data").join("outputs").join("hami.png"));
        assert_eq!(conf.target_colors.get("G7").map(String::as_str), Some("#ff0000"));
        assert!(conf.validate_for_render().is_ok());
    }

    #[test]
    fn toml_and_json_are_supported() {
        let (_d1, toml_path) = write_config(
            "config.toml",
            "bbox = [39.0, 93.0, 39.5, 94.0]\ntarget_roads = [\"G7\"]\n[figure]\ndpi = 300.0\n",
        );
        match MapConfiguration::try_from(toml_path.as_path()) {
            Ok(conf) => {
                assert_eq!(conf.figure.dpi, 300.0);
                assert_eq!(conf.figure.width, 14.0);
            }
            Err(e) => panic!("{e}"),
        }
        let (_d2, json_path) = write_config("config.json", r#"{"target_roads": ["G7", "S301"]}"#);
        match MapConfiguration::try_from(json_path.as_path()) {
            Ok(conf) => assert_eq!(conf.target_roads.len(), 2),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn missing_file() {
        let result = MapConfiguration::try_from(Path::new("no/such/config.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn unsupported_extension_and_bad_syntax() {
        let (_d1, ini) = write_config("config.ini", "bbox = 1");
        assert!(matches!(
            MapConfiguration::try_from(ini.as_path()),
            Err(ConfigError::ParseError { .. })
        ));
        let (_d2, yaml) = write_config("config.yaml", "bbox: [1.0, 2.0\n");
        assert!(matches!(
            MapConfiguration::try_from(yaml.as_path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn render_requires_targets_and_bbox() {
        let (_d, path) = write_config("config.yaml", "bbox: [39.0, 93.0, 39.5, 94.0]\n");
        let conf = MapConfiguration::try_from(path.as_path()).expect("config should parse");
        match conf.validate_for_render() {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "target_roads"),
            other => panic!("expected MissingField, found {other:?}"),
        }
        let no_bbox = MapConfiguration {
            target_roads: vec![String::from("G7")],
            ..Default::default()
        };
        assert!(matches!(
            no_bbox.validate_for_render(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = MapConfiguration {
            bbox: Some(BoundingBox::new(39.0, 93.0, 39.5, 94.0)),
            target_roads: vec![String::from("G7")],
            ..Default::default()
        };
        let bad_color = MapConfiguration {
            bg_road_color: String::from("#12345"),
            ..base.clone()
        };
        assert!(matches!(
            bad_color.validate_for_render(),
            Err(ConfigError::InvalidField { .. })
        ));
        let bad_width = MapConfiguration {
            target_width: 0.0,
            ..base.clone()
        };
        assert!(bad_width.validate_for_render().is_err());
        let inverted = MapConfiguration {
            bbox: Some(BoundingBox::new(39.5, 93.0, 39.0, 94.0)),
            ..base
        };
        assert!(inverted.validate_for_render().is_err());
    }

    #[test]
    fn network_filter_from_strings() {
        let (_d, path) = write_config(
            "config.yaml",
            "network_filter:\n  - '[\"highway\"~\"trunk|primary\"]'\n",
        );
        let conf = MapConfiguration::try_from(path.as_path()).expect("config should parse");
        let filter = conf.network_filter();
        assert!(filter.accept(&[("highway", "trunk")]));
        assert!(!filter.accept(&[("highway", "residential")]));
    }
}
