use super::{
    projection::{PlotArea, Projection},
    svg_document::{LegendEntry, Stroke, SvgDocument},
    MapStyle, RenderError,
};
use crate::{
    classify::Classification,
    model::{BoundingBox, EdgeRecord},
    util::fs::{create_parent_dirs, write_atomic},
};
use geo::BoundingRect;
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// image format, chosen by the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<OutputFormat, RenderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(RenderError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// what was drawn, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub background_edges: usize,
    /// drawn edge count per target code, in configured order
    pub target_edges: Vec<(String, usize)>,
}

impl RenderReport {
    pub fn total_target_edges(&self) -> usize {
        self.target_edges.iter().map(|(_, n)| n).sum()
    }
}

/// draws the classified edges and writes the image to `output`.
///
/// background roads are drawn first, then each target code in configured
/// order. a target edge carrying several configured codes is drawn once,
/// under the first of them.
pub fn render(
    classification: &Classification<'_>,
    style: &MapStyle,
    output: &Path,
) -> Result<RenderReport, RenderError> {
    let format = OutputFormat::from_path(output)?;
    let groups = group_targets(&classification.target, &style.target_roads);
    let background = &classification.background;

    let (width, height) = style.canvas_size();
    let title_font = style.px(MapStyle::TITLE_FONT_PT);
    let legend_font = style.px(MapStyle::LEGEND_FONT_PT);
    let pad = width.min(height) * 0.03;
    let area = PlotArea {
        left: pad,
        top: title_font * 2.5,
        width: (width - 2.0 * pad).max(1.0),
        height: (height - title_font * 2.5 - pad).max(1.0),
    };
    let drawn = background
        .iter()
        .chain(groups.iter().flat_map(|(_, edges)| edges.iter()));
    let extent = style
        .bbox
        .or_else(|| geometry_extent(drawn))
        .unwrap_or(BoundingBox::new(-1.0, -1.0, 1.0, 1.0));
    let projection = Projection::fit(&extent, &area);
    let project_edge = |edge: &&EdgeRecord| {
        edge.geometry
            .coords()
            .map(|c| projection.project(c.x, c.y))
            .collect_vec()
    };

    let mut doc = SvgDocument::new(width, height);
    let mut legend = vec![];
    if !background.is_empty() {
        let stroke = Stroke {
            color: style.bg_color.clone(),
            width: style.px(style.bg_width),
            opacity: MapStyle::BACKGROUND_OPACITY,
        };
        doc.polyline_group("background", &stroke, background.iter().map(project_edge));
        legend.push(LegendEntry {
            label: style.bg_label.clone(),
            color: style.bg_color.clone(),
            opacity: MapStyle::BACKGROUND_OPACITY,
        });
    }
    for (code, edges) in groups.iter().filter(|(_, edges)| !edges.is_empty()) {
        let color = style.color_of(code);
        let stroke = Stroke {
            color: color.clone(),
            width: style.px(style.target_width),
            opacity: MapStyle::TARGET_OPACITY,
        };
        doc.polyline_group(code, &stroke, edges.iter().map(project_edge));
        legend.push(LegendEntry {
            label: style.target_label(code),
            color,
            opacity: MapStyle::TARGET_OPACITY,
        });
    }
    doc.title(&style.title, title_font);
    doc.legend(&legend, width - pad, area.top, legend_font);
    let svg = doc.finish();

    let bytes = match format {
        OutputFormat::Svg => svg.into_bytes(),
        OutputFormat::Png => rasterize(&svg)?,
    };
    create_parent_dirs(output).map_err(|e| RenderError::OutputDirectory {
        path: output.to_path_buf(),
        source: e,
    })?;
    write_atomic(output, &bytes).map_err(|e| RenderError::Write {
        path: output.to_path_buf(),
        source: e,
    })?;
    log::info!("map saved: {}", output.display());

    Ok(RenderReport {
        output: output.to_path_buf(),
        format,
        width_px: width as u32,
        height_px: height as u32,
        background_edges: background.len(),
        target_edges: groups
            .iter()
            .map(|(code, edges)| (code.clone(), edges.len()))
            .collect(),
    })
}

/// assigns each target edge to the first configured code among its `ref` values.
fn group_targets<'a>(
    target: &[&'a EdgeRecord],
    codes: &[String],
) -> Vec<(String, Vec<&'a EdgeRecord>)> {
    let mut groups: Vec<(String, Vec<&'a EdgeRecord>)> =
        codes.iter().map(|c| (c.clone(), vec![])).collect();
    for edge in target.iter() {
        let refs = edge.ref_values().collect_vec();
        match groups.iter_mut().find(|(code, _)| refs.contains(&code.as_str())) {
            Some((_, edges)) => edges.push(*edge),
            None => log::debug!("edge of way {} matches no configured code", edge.way_id),
        }
    }
    groups
}

/// bounds of every drawn edge geometry
fn geometry_extent<'a>(edges: impl Iterator<Item = &'a &'a EdgeRecord>) -> Option<BoundingBox> {
    edges
        .filter_map(|e| e.geometry.bounding_rect())
        .reduce(|a, b| {
            geo::Rect::new(
                geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
        .map(|r| BoundingBox::new(r.min().y, r.min().x, r.max().y, r.max().x))
}

fn rasterize(svg: &str) -> Result<Vec<u8>, RenderError> {
    let mut opt = resvg::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = resvg::usvg::Tree::from_str(svg, &opt)
        .map_err(|e| RenderError::Rasterize(format!("failed to parse generated SVG: {e}")))?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        RenderError::Rasterize(format!(
            "failed to allocate a {}x{} pixmap",
            size.width(),
            size.height()
        ))
    })?;
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Rasterize(format!("failed to encode PNG output: {e}")))
}
