mod advisory;

pub use advisory::Advisory;

use crate::model::{EdgeRecord, EdgeTable};
use std::collections::HashSet;

/// road classes drawn as background when none are configured
pub const DEFAULT_ALLOWED_HIGHWAYS: [&str; 6] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
];

/// partition of an edge table into target and background roads. edges in
/// neither set are excluded from the map. both sets keep the table order.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    pub target: Vec<&'a EdgeRecord>,
    pub background: Vec<&'a EdgeRecord>,
    pub advisories: Vec<Advisory>,
}

/// splits the edges of `table` into target roads (a `ref` value is one of
/// `target_refs`) and background roads (a `highway` value is one of
/// `allowed_highways`, and not a target). missing attributes degrade the
/// result and are reported as advisories instead of errors.
pub fn classify<'a>(
    table: &'a EdgeTable,
    target_refs: &HashSet<String>,
    allowed_highways: &HashSet<String>,
) -> Classification<'a> {
    let mut advisories = vec![];
    let has_ref = table.has_ref_attribute();
    let has_highway = table.has_highway_attribute();
    if !has_ref {
        advisories.push(Advisory::MissingRefAttribute);
    }
    if !has_highway {
        advisories.push(Advisory::MissingHighwayAttribute);
    }

    let is_target =
        |edge: &EdgeRecord| has_ref && edge.ref_values().any(|r| target_refs.contains(r));
    let is_allowed = |edge: &EdgeRecord| {
        !has_highway || edge.highway_values().any(|h| allowed_highways.contains(h))
    };

    let mut target = vec![];
    let mut background = vec![];
    for edge in table.rows() {
        if is_target(edge) {
            target.push(edge);
        } else if is_allowed(edge) {
            background.push(edge);
        }
    }

    if has_ref && target.is_empty() {
        advisories.push(Advisory::no_target_matches(target_refs));
    }
    log::info!(
        "classified {} edges: {} target, {} background",
        table.len(),
        target.len(),
        background.len()
    );
    Classification {
        target,
        background,
        advisories,
    }
}
