use super::{GeocodeError, Geocoder};
use crate::{http::HttpClient, model::BoundingBox};
use serde::Deserialize;
use std::sync::Arc;

/// one result of a Nominatim `/search` request. only the fields used here.
#[derive(Deserialize, Debug)]
struct NominatimPlace {
    display_name: Option<String>,
    /// `[lat_min, lat_max, lon_min, lon_max]` as decimal strings
    boundingbox: Vec<String>,
}

/// geocodes place names with the Nominatim search API.
pub struct NominatimGeocoder {
    base_url: String,
    client: Arc<dyn HttpClient>,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, client: Arc<dyn HttpClient>) -> NominatimGeocoder {
        NominatimGeocoder {
            base_url: String::from(base_url.trim_end_matches('/')),
            client,
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, place: &str) -> Result<BoundingBox, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        log::info!("geocoding '{place}' with {url}");
        let body = self.client.get(
            &url,
            &[("q", place), ("format", "jsonv2"), ("limit", "1")],
        )?;
        let bbox = parse_search_response(place, &body)?;
        log::info!("'{place}' resolved to bbox {bbox}");
        Ok(bbox)
    }
}

fn parse_search_response(place: &str, body: &str) -> Result<BoundingBox, GeocodeError> {
    let invalid = |message: String| GeocodeError::InvalidResponse {
        place: String::from(place),
        message,
    };
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    let first = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(String::from(place)))?;
    if let Some(name) = &first.display_name {
        log::debug!("nominatim matched '{name}'");
    }
    let values = first
        .boundingbox
        .iter()
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(format!("non-numeric boundingbox value: {e}")))?;
    match values.as_slice() {
        [lat_a, lat_b, lon_a, lon_b] => Ok(BoundingBox::from_unordered(
            (*lat_a, *lat_b),
            (*lon_a, *lon_b),
        )),
        _ => Err(invalid(format!(
            "expected 4 boundingbox values, found {}",
            values.len()
        ))),
    }
}
