use itertools::Itertools;
use std::{collections::HashSet, fmt::Display};

/// a degraded-mode condition found while classifying the edge table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// no edge carries a `ref` tag, so no target road can be selected
    MissingRefAttribute,
    /// no edge carries a `highway` tag, so background roads are not filtered by class
    MissingHighwayAttribute,
    /// `ref` tags exist but none matched the requested codes
    NoTargetMatches { requested: Vec<String> },
}

impl Advisory {
    pub fn no_target_matches(requested: &HashSet<String>) -> Advisory {
        Advisory::NoTargetMatches {
            requested: requested.iter().cloned().sorted().collect(),
        }
    }
}

impl Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::MissingRefAttribute => write!(
                f,
                "road network has no 'ref' attribute, target roads cannot be selected"
            ),
            Advisory::MissingHighwayAttribute => write!(
                f,
                "road network has no 'highway' attribute, background includes every non-target road"
            ),
            Advisory::NoTargetMatches { requested } => write!(
                f,
                "no road matched the target codes [{}], check that they exist within the bbox",
                requested.join(", ")
            ),
        }
    }
}
