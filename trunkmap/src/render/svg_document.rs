use itertools::Itertools;
use std::fmt::Write;

pub const FONT_FAMILY: &str = "Microsoft YaHei, SimHei, DejaVu Sans, sans-serif";

/// stroke style of a group of polylines
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

/// one row of the map legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub opacity: f64,
}

/// incrementally written SVG text, sized in pixels.
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> SvgDocument {
        let mut body = String::new();
        let _ = write!(
            body,
            r#"<rect x="0" y="0" width="{width:.0}" height="{height:.0}" fill="white"/>"#
        );
        body.push('\n');
        SvgDocument {
            width,
            height,
            body,
        }
    }

    /// opens a group of polylines sharing `stroke`. `id` names the group.
    pub fn polyline_group(
        &mut self,
        id: &str,
        stroke: &Stroke,
        lines: impl IntoIterator<Item = Vec<(f64, f64)>>,
    ) {
        let _ = writeln!(
            self.body,
            r#"<g id="{}" fill="none" stroke="{}" stroke-width="{:.2}" stroke-opacity="{}" stroke-linecap="round" stroke-linejoin="round">"#,
            escape_xml(id),
            escape_xml(&stroke.color),
            stroke.width,
            stroke.opacity
        );
        for line in lines {
            if line.len() < 2 {
                continue;
            }
            let points = line.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).join(" ");
            let _ = writeln!(self.body, r#"<polyline points="{points}"/>"#);
        }
        self.body.push_str("</g>\n");
    }

    /// centered bold title at the top of the figure.
    pub fn title(&mut self, text: &str, font_size: f64) {
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" font-weight="bold" text-anchor="middle" fill="black">{}</text>"#,
            self.width / 2.0,
            font_size * 1.5,
            FONT_FAMILY,
            font_size,
            escape_xml(text)
        );
    }

    /// legend box anchored at the top-right corner `(right, top)`.
    pub fn legend(&mut self, entries: &[LegendEntry], right: f64, top: f64, font_size: f64) {
        if entries.is_empty() {
            return;
        }
        let pad = font_size * 0.6;
        let row_h = font_size * 1.6;
        let swatch = font_size * 1.2;
        // without font metrics, approximate the text width
        let max_chars = entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or_default();
        let box_w = pad * 3.0 + swatch + max_chars as f64 * font_size * 0.62;
        let box_h = pad * 2.0 + row_h * entries.len() as f64;
        let left = right - box_w;
        let _ = writeln!(
            self.body,
            r##"<g id="legend"><rect x="{left:.2}" y="{top:.2}" width="{box_w:.2}" height="{box_h:.2}" rx="{:.2}" fill="white" fill-opacity="0.9" stroke="#cccccc"/>"##,
            pad / 2.0
        );
        for (i, entry) in entries.iter().enumerate() {
            let row_top = top + pad + row_h * i as f64;
            let _ = writeln!(
                self.body,
                r#"<rect x="{:.2}" y="{:.2}" width="{swatch:.2}" height="{:.2}" fill="{}" fill-opacity="{}"/>"#,
                left + pad,
                row_top + (row_h - swatch * 0.7) / 2.0,
                swatch * 0.7,
                escape_xml(&entry.color),
                entry.opacity
            );
            let _ = writeln!(
                self.body,
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{font_size:.2}" dominant-baseline="central" fill="black">{}</text>"#,
                left + pad * 2.0 + swatch,
                row_top + row_h / 2.0,
                FONT_FAMILY,
                escape_xml(&entry.label)
            );
        }
        self.body.push_str("</g>\n");
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n{}</svg>\n",
            self.body,
            w = self.width,
            h = self.height
        )
    }
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
