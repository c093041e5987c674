mod geocode_error;
mod nominatim;

pub use geocode_error::GeocodeError;
pub use nominatim::NominatimGeocoder;

use crate::model::BoundingBox;

/// resolves a place name to its bounding box.
pub trait Geocoder {
    /// implementations must return a box with south <= north and west <= east.
    fn geocode(&self, place: &str) -> Result<BoundingBox, GeocodeError>;
}
