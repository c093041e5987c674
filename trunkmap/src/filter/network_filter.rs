use super::{get_tag, FilterQuery};
use itertools::Itertools;

/// decides which OSM ways belong to the road network.
#[derive(Default, Debug, Clone)]
pub enum NetworkFilter {
    /// the osmnx "drive" network: public drivable streets, no service roads.
    #[default]
    OsmnxDrive,
    /// a conjunction of Overpass tag filters.
    OverpassQueries { queries: Vec<FilterQuery> },
}

/// highway classes excluded from the osmnx "drive" network
const DRIVE_EXCLUDED_HIGHWAY: [&str; 20] = [
    "abandoned",
    "bridleway",
    "bus_guideway",
    "construction",
    "corridor",
    "cycleway",
    "elevator",
    "escalator",
    "footway",
    "no",
    "path",
    "pedestrian",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
    "service",
    "steps",
    "track",
];

/// service road kinds excluded from the osmnx "drive" network
const DRIVE_EXCLUDED_SERVICE: [&str; 6] = [
    "alley",
    "driveway",
    "emergency_access",
    "parking",
    "parking_aisle",
    "private",
];

impl NetworkFilter {
    pub fn accept(&self, tags: &[(&str, &str)]) -> bool {
        match self {
            NetworkFilter::OsmnxDrive => osmnx_drive_filter(tags),
            NetworkFilter::OverpassQueries { queries } => queries.iter().all(|q| q.accept(tags)),
        }
    }

    /// the tag filter clauses of an Overpass QL `way` statement for this filter.
    pub fn overpass_filter(&self) -> String {
        match self {
            NetworkFilter::OsmnxDrive => format!(
                r#"["highway"]["area"!~"yes"]["access"!~"private"]["highway"!~"{}"]["motor_vehicle"!~"no"]["motorcar"!~"no"]["service"!~"{}"]"#,
                DRIVE_EXCLUDED_HIGHWAY.iter().join("|"),
                DRIVE_EXCLUDED_SERVICE.iter().join("|"),
            ),
            NetworkFilter::OverpassQueries { queries } => queries.iter().join(""),
        }
    }
}

impl From<Option<Vec<FilterQuery>>> for NetworkFilter {
    fn from(value: Option<Vec<FilterQuery>>) -> Self {
        match value {
            Some(queries) if !queries.is_empty() => NetworkFilter::OverpassQueries { queries },
            _ => NetworkFilter::OsmnxDrive,
        }
    }
}

/// OSMNX definition:
/// filters["drive"] = (
///     f'["highway"]["area"!~"yes"]{settings.default_access}'
///     f'["highway"!~"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|'
///     f"escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|service|"
///     f'steps|track"]'
///     f'["motor_vehicle"!~"no"]["motorcar"!~"no"]'
///     f'["service"!~"alley|driveway|emergency_access|parking|parking_aisle|private"]'
/// )
///
/// Overpass regex matching is unanchored, so each alternative is tested as a substring.
fn osmnx_drive_filter(tags: &[(&str, &str)]) -> bool {
    // ["highway"]
    let highway = match get_tag(tags, "highway") {
        Some(h) => h,
        None => return false,
    };
    // ["highway"!~"abandoned|..."]
    if DRIVE_EXCLUDED_HIGHWAY.iter().any(|h| highway.contains(h)) {
        log::trace!("['highway'~'{highway}']");
        return false;
    }
    // ["area"!~"yes"], ["access"!~"private"], ["motor_vehicle"!~"no"], ["motorcar"!~"no"]
    let rejected = [
        ("area", "yes"),
        ("access", "private"),
        ("motor_vehicle", "no"),
        ("motorcar", "no"),
    ]
    .iter()
    .any(|(key, pattern)| matches!(get_tag(tags, key), Some(v) if v.contains(pattern)));
    if rejected {
        return false;
    }
    // ["service"!~"alley|..."]
    match get_tag(tags, "service") {
        Some(service) => !DRIVE_EXCLUDED_SERVICE.iter().any(|s| service.contains(s)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::NetworkFilter;
    use crate::filter::FilterQuery;
    use std::str::FromStr;

    #[test]
    fn drive_accepts_public_roads() {
        let filter = NetworkFilter::default();
        assert!(filter.accept(&[("highway", "trunk"), ("ref", "G7")]));
        assert!(filter.accept(&[("highway", "residential"), ("access", "yes")]));
    }

    #[test]
    fn drive_rejects_non_drivable_ways() {
        let filter = NetworkFilter::default();
        assert!(!filter.accept(&[("name", "no highway tag")]));
        assert!(!filter.accept(&[("highway", "footway")]));
        assert!(!filter.accept(&[("highway", "service")]));
        assert!(!filter.accept(&[("highway", "primary"), ("access", "private")]));
        assert!(!filter.accept(&[("highway", "tertiary"), ("motorcar", "no")]));
        assert!(!filter.accept(&[("highway", "unclassified"), ("service", "parking_aisle")]));
    }

    #[test]
    fn drive_overpass_filter_agrees_with_local_filter() {
        let text = NetworkFilter::OsmnxDrive.overpass_filter();
        let queries = text
            .split_inclusive(']')
            .map(FilterQuery::from_str)
            .collect::<Result<Vec<_>, _>>()
            .expect("drive filter should parse");
        assert_eq!(queries.len(), 7);
        let parsed = NetworkFilter::OverpassQueries { queries };
        let cases: [&[(&str, &str)]; 4] = [
            &[("highway", "trunk")],
            &[("highway", "track")],
            &[("highway", "primary"), ("area", "yes")],
            &[("highway", "secondary"), ("service", "alley")],
        ];
        for tags in cases {
            assert_eq!(parsed.accept(tags), NetworkFilter::OsmnxDrive.accept(tags));
        }
    }

    #[test]
    fn empty_query_list_falls_back_to_drive() {
        assert!(matches!(
            NetworkFilter::from(Some(vec![])),
            NetworkFilter::OsmnxDrive
        ));
    }
}
