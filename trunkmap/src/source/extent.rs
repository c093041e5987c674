use crate::model::BoundingBox;
use std::fmt::Display;

/// the area a network source is asked to cover.
#[derive(Debug, Clone, PartialEq)]
pub enum Extent {
    Bbox(BoundingBox),
    /// a place name resolved by a geocoder. only online sources accept this.
    Place(String),
}

impl Extent {
    pub fn bbox(&self) -> Option<&BoundingBox> {
        match self {
            Extent::Bbox(bbox) => Some(bbox),
            Extent::Place(_) => None,
        }
    }
}

impl Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extent::Bbox(bbox) => write!(f, "bbox ({bbox})"),
            Extent::Place(place) => write!(f, "place '{place}'"),
        }
    }
}
