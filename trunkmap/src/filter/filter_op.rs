use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// comparison used by a tag filter. [`FilterOp::Exists`] has no operator text and
/// is written as a bare key, e.g. `["highway"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Exists,
    Equals,
    NotEquals,
    Matches,
    NotMatches,
}

impl FilterOp {
    /// true for the operators whose value is a regular expression
    pub fn is_regex(&self) -> bool {
        matches!(self, FilterOp::Matches | FilterOp::NotMatches)
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Equals),
            "!=" => Ok(Self::NotEquals),
            "~" => Ok(Self::Matches),
            "!~" => Ok(Self::NotMatches),
            _ => Err(format!("unknown overpass query operation '{s}'")),
        }
    }
}

impl Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOp::Exists => write!(f, ""),
            FilterOp::Equals => write!(f, "="),
            FilterOp::NotEquals => write!(f, "!="),
            FilterOp::Matches => write!(f, "~"),
            FilterOp::NotMatches => write!(f, "!~"),
        }
    }
}
