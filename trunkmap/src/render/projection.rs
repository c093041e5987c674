use crate::model::BoundingBox;

/// pixel area the map is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// maps lon/lat degrees into a plot area. longitudes are scaled by the cosine of
/// the middle latitude so shapes keep their aspect ratio, and the y axis is
/// flipped so north is up.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    extent: BoundingBox,
    x_scale: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// smallest extent side, in degrees, used for degenerate extents
const MIN_EXTENT_DEGREES: f64 = 1e-6;

impl Projection {
    pub fn fit(extent: &BoundingBox, area: &PlotArea) -> Projection {
        let (cx, cy) = extent.center();
        let half_w = (extent.width() / 2.0).max(MIN_EXTENT_DEGREES);
        let half_h = (extent.height() / 2.0).max(MIN_EXTENT_DEGREES);
        let extent = BoundingBox::new(cy - half_h, cx - half_w, cy + half_h, cx + half_w);

        let x_scale = cy.to_radians().cos().abs().max(1e-3);
        let data_w = extent.width() * x_scale;
        let data_h = extent.height();
        let scale = (area.width / data_w).min(area.height / data_h);
        let offset_x = area.left + (area.width - data_w * scale) / 2.0;
        let offset_y = area.top + (area.height - data_h * scale) / 2.0;
        Projection {
            extent,
            x_scale,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.offset_x + (lon - self.extent.west) * self.x_scale * self.scale;
        let y = self.offset_y + (self.extent.north - lat) * self.scale;
        (x, y)
    }
}
