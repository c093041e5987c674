use geo::{coord, Coord, Intersects, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// rectangular study area in WGS84 degrees, ordered as (south, west, north, east).
///
/// configuration documents write this as a 4-element list `[south, west, north, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// order of the four values in the box string handed to the extraction tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BboxOrder {
    #[default]
    SouthWestNorthEast,
    /// osmium's native `LEFT,BOTTOM,RIGHT,TOP` order
    WestSouthEastNorth,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> BoundingBox {
        BoundingBox {
            south,
            west,
            north,
            east,
        }
    }

    /// builds a box from two latitude and two longitude values in any order,
    /// so that the result always has south <= north and west <= east.
    pub fn from_unordered(lat: (f64, f64), lon: (f64, f64)) -> BoundingBox {
        let (south, north) = if lat.0 <= lat.1 {
            (lat.0, lat.1)
        } else {
            (lat.1, lat.0)
        };
        let (west, east) = if lon.0 <= lon.1 {
            (lon.0, lon.1)
        } else {
            (lon.1, lon.0)
        };
        BoundingBox::new(south, west, north, east)
    }

    pub fn is_ordered(&self) -> bool {
        self.south <= self.north && self.west <= self.east
    }

    /// validates coordinate ranges and axis ordering.
    pub fn validate(&self) -> Result<(), String> {
        let values = [self.south, self.west, self.north, self.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(format!("bbox contains a non-finite value: {self}"));
        }
        for lat in [self.south, self.north] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("latitude {lat} is not in range [-90,90]"));
            }
        }
        for lon in [self.west, self.east] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("longitude {lon} is not in range [-180,180]"));
            }
        }
        if !self.is_ordered() {
            return Err(format!(
                "bbox must be ordered [south, west, north, east] with south <= north and west <= east, found {self}"
            ));
        }
        Ok(())
    }

    /// grows the box by `degrees` on every side.
    pub fn buffered(&self, degrees: f64) -> BoundingBox {
        BoundingBox::new(
            (self.south - degrees).max(-90.0),
            (self.west - degrees).max(-180.0),
            (self.north + degrees).min(90.0),
            (self.east + degrees).min(180.0),
        )
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    pub fn as_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }

    /// true if the (lon, lat) point lies within the box, boundary included.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.as_rect().intersects(&coord! { x: x, y: y })
    }

    /// Liang-Barsky clip of the segment `a -> b` against the box. returns the
    /// parameter range `(t0, t1)` within `[0, 1]` of the part inside the box,
    /// or `None` when the segment misses it.
    pub fn clip_segment(&self, a: Coord<f64>, b: Coord<f64>) -> Option<(f64, f64)> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [
            (-dx, a.x - self.west),
            (dx, self.east - a.x),
            (-dy, a.y - self.south),
            (dy, self.north - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// box string for the extraction tool's `-b` argument.
    pub fn to_extract_arg(&self, order: BboxOrder) -> String {
        match order {
            BboxOrder::SouthWestNorthEast => self.to_string(),
            BboxOrder::WestSouthEastNorth => {
                format!("{},{},{},{}", self.west, self.south, self.east, self.north)
            }
        }
    }

    /// bounding box clause of an Overpass QL statement.
    pub fn to_overpass_clause(&self) -> String {
        format!("({},{},{},{})", self.south, self.west, self.north, self.east)
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(value: [f64; 4]) -> Self {
        let [south, west, north, east] = value;
        BoundingBox::new(south, west, north, east)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(value: BoundingBox) -> Self {
        [value.south, value.west, value.north, value.east]
    }
}

#[cfg(test)]
mod tests {
    use super::{BboxOrder, BoundingBox};
    use geo::coord;

    #[test]
    fn from_unordered_sorts_both_axes() {
        let bbox = BoundingBox::from_unordered((39.5, 39.0), (94.0, 93.0));
        assert_eq!(bbox, BoundingBox::new(39.0, 93.0, 39.5, 94.0));
        assert!(bbox.is_ordered());
    }

    #[test]
    fn extract_arg_orders() {
        let bbox = BoundingBox::new(39.0, 93.0, 39.5, 94.0);
        assert_eq!(
            bbox.to_extract_arg(BboxOrder::SouthWestNorthEast),
            "39,93,39.5,94"
        );
        assert_eq!(
            bbox.to_extract_arg(BboxOrder::WestSouthEastNorth),
            "93,39,94,39.5"
        );
    }

    #[test]
    fn contains_point_includes_boundary() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(bbox.contains_point(0.5, 0.5));
        assert!(bbox.contains_point(1.0, 0.0));
        assert!(!bbox.contains_point(1.01, 0.5));
    }

    #[test]
    fn clip_segment_ranges() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let inside = bbox.clip_segment(coord! { x: 0.2, y: 0.2 }, coord! { x: 0.8, y: 0.8 });
        assert_eq!(inside, Some((0.0, 1.0)));
        let leaving = bbox.clip_segment(coord! { x: 0.5, y: 0.5 }, coord! { x: 1.5, y: 0.5 });
        assert_eq!(leaving, Some((0.0, 0.5)));
        let crossing = bbox.clip_segment(coord! { x: -1.0, y: 0.5 }, coord! { x: 2.0, y: 0.5 });
        match crossing {
            Some((t0, t1)) => {
                assert!((t0 - 1.0 / 3.0).abs() < 1e-12);
                assert!((t1 - 2.0 / 3.0).abs() < 1e-12);
            }
            None => panic!("segment crosses the box"),
        }
        let outside = bbox.clip_segment(coord! { x: 2.0, y: 2.0 }, coord! { x: 3.0, y: 0.5 });
        assert_eq!(outside, None);
    }

    #[test]
    fn validate_rejects_inverted_box() {
        let bbox = BoundingBox::new(40.0, 93.0, 39.0, 94.0);
        match bbox.validate() {
            Ok(_) => panic!("inverted latitude range should be rejected"),
            Err(e) => assert!(e.contains("south <= north")),
        }
    }

    #[test]
    fn deserialize_from_list() {
        let bbox: BoundingBox = serde_json::from_str("[39.0, 93.0, 39.5, 94.0]").unwrap();
        assert_eq!(bbox, BoundingBox::new(39.0, 93.0, 39.5, 94.0));
    }
}
