use super::color::target_color;
use crate::{
    config::{FigureSettings, MapConfiguration},
    model::BoundingBox,
};
use itertools::Itertools;
use std::collections::HashMap;

/// visual settings of a rendered map.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub title: String,
    pub bg_label: String,
    pub bg_color: String,
    /// background stroke width in points
    pub bg_width: f64,
    /// target stroke width in points
    pub target_width: f64,
    /// target codes in drawing and legend order, without duplicates
    pub target_roads: Vec<String>,
    pub target_colors: HashMap<String, String>,
    pub road_names: HashMap<String, String>,
    pub figure: FigureSettings,
    /// map extent used when there is no geometry to draw
    pub bbox: Option<BoundingBox>,
}

impl MapStyle {
    pub const BACKGROUND_OPACITY: f64 = 0.6;
    pub const TARGET_OPACITY: f64 = 0.9;
    pub const TITLE_FONT_PT: f64 = 18.0;
    pub const LEGEND_FONT_PT: f64 = 10.0;

    /// converts a size in points to pixels at the figure resolution
    pub fn px(&self, points: f64) -> f64 {
        points * self.figure.dpi / 72.0
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (
            (self.figure.width * self.figure.dpi).round(),
            (self.figure.height * self.figure.dpi).round(),
        )
    }

    pub fn color_of(&self, code: &str) -> String {
        target_color(code, &self.target_colors)
    }

    /// legend label `"<code> (<road name>)"`, falling back to the code as its name
    pub fn target_label(&self, code: &str) -> String {
        let name = self
            .road_names
            .get(code)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(code);
        format!("{code} ({name})")
    }
}

impl From<&MapConfiguration> for MapStyle {
    fn from(conf: &MapConfiguration) -> Self {
        MapStyle {
            title: conf.title.clone(),
            bg_label: conf.bg_label.clone(),
            bg_color: conf.bg_road_color.trim().to_string(),
            bg_width: conf.bg_road_width,
            target_width: conf.target_width,
            target_roads: conf
                .target_roads
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unique()
                .collect(),
            target_colors: conf.target_colors.clone(),
            road_names: conf.road_names.clone(),
            figure: conf.figure.clone(),
            bbox: conf.bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapStyle;
    use crate::config::MapConfiguration;
    use std::collections::HashMap;

    #[test]
    fn style_from_configuration() {
        let conf = MapConfiguration {
            target_roads: vec![
                String::from("G7"),
                String::from(" S301 "),
                String::from("G7"),
            ],
            road_names: HashMap::from([(String::from("G7"), String::from("Jingxin Expressway"))]),
            ..Default::default()
        };
        let style = MapStyle::from(&conf);
        assert_eq!(style.target_roads, vec!["G7", "S301"]);
        assert_eq!(style.target_label("G7"), "G7 (Jingxin Expressway)");
        assert_eq!(style.target_label("S301"), "S301 (S301)");
        assert_eq!(style.canvas_size(), (2100.0, 1650.0));
        assert!((style.px(72.0) - 150.0).abs() < 1e-9);
    }
}
