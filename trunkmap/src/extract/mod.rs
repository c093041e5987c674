mod command_runner;
mod extraction_error;
mod osmium_extractor;

pub use command_runner::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use extraction_error::ExtractionError;
pub use osmium_extractor::OsmiumExtractor;

use crate::{
    geocode::{GeocodeError, Geocoder},
    model::BoundingBox,
};

/// determines the extraction box. a configured `bbox` is used verbatim;
/// otherwise `place` is geocoded and the result ordered so that
/// south <= north and west <= east.
pub fn resolve_bbox(
    place: Option<&str>,
    bbox: Option<BoundingBox>,
    geocoder: &dyn Geocoder,
) -> Result<BoundingBox, GeocodeError> {
    match (bbox, place) {
        (Some(bbox), _) => Ok(bbox),
        (None, Some(place)) if !place.trim().is_empty() => {
            let found = geocoder.geocode(place.trim())?;
            let ordered = BoundingBox::from_unordered(
                (found.south, found.north),
                (found.west, found.east),
            );
            log::info!("bbox for '{place}': {ordered}");
            Ok(ordered)
        }
        _ => Err(GeocodeError::NoExtent),
    }
}
