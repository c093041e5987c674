use super::{get_tag, FilterOp};
use regex::Regex;
use serde::{
    de::Visitor,
    Deserialize, Deserializer, Serialize,
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

#[derive(Debug, Clone)]
/// represents a single fragment of an overpass API filter query
/// see <https://wiki.openstreetmap.org/wiki/Overpass_API/Language_Guide#Tag_request_clauses_(or_%22tag_filters%22)>
pub struct FilterQuery {
    /// the key in the tag's key/value pair to match against
    tag: String,
    /// operation/predicate used on this query
    op: FilterOp,
    /// the expected value, or regular expression for `~` and `!~`.
    /// absent for existential queries such as `["highway"]`.
    value: Option<String>,
    pattern: Option<Regex>,
}

impl FilterQuery {
    const QUERY_REGEX: &'static str = r#"^\[\s*"([^"]+)"\s*(?:(!=|!~|=|~)\s*"([^"]*)"\s*)?\]$"#;

    pub fn new(tag: &str, op: FilterOp, value: Option<&str>) -> Result<FilterQuery, String> {
        let value = match (op, value) {
            (FilterOp::Exists, _) => None,
            (_, Some(v)) => Some(String::from(v)),
            (_, None) => return Err(format!("filter on '{tag}' with '{op}' requires a value")),
        };
        let pattern = match (&value, op.is_regex()) {
            (Some(v), true) => Some(
                Regex::new(v).map_err(|e| format!("invalid pattern in filter on '{tag}': {e}"))?,
            ),
            _ => None,
        };
        Ok(FilterQuery {
            tag: String::from(tag),
            op,
            value,
            pattern,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    /// tests a set of element tags against this query. negated queries accept
    /// elements that do not carry the tag at all, as Overpass does.
    pub fn accept(&self, tags: &[(&str, &str)]) -> bool {
        let found = get_tag(tags, &self.tag);
        match (self.op, found) {
            (FilterOp::Exists, found) => found.is_some(),
            (FilterOp::NotEquals | FilterOp::NotMatches, None) => true,
            (_, None) => false,
            (FilterOp::Equals, Some(v)) => self.value.as_deref() == Some(v),
            (FilterOp::NotEquals, Some(v)) => self.value.as_deref() != Some(v),
            (FilterOp::Matches, Some(v)) => self.is_match(v),
            (FilterOp::NotMatches, Some(v)) => !self.is_match(v),
        }
    }

    fn is_match(&self, value: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(value))
    }
}

impl Display for FilterQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[\"{}\"{}\"{}\"]", self.tag, self.op, value),
            None => write!(f, "[\"{}\"]", self.tag),
        }
    }
}

impl FromStr for FilterQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(Self::QUERY_REGEX)
            .map_err(|e| format!("internal error building overpass query regex: {e}"))?;
        match re.captures(s.trim()) {
            None => Err(format!("unable to parse overpass query: '{s}'")),
            Some(groups) => {
                let tag = &groups[1];
                match (groups.get(2), groups.get(3)) {
                    (Some(op), Some(value)) => {
                        let op = FilterOp::from_str(op.as_str())?;
                        FilterQuery::new(tag, op, Some(value.as_str()))
                    }
                    _ => FilterQuery::new(tag, FilterOp::Exists, None),
                }
            }
        }
    }
}

struct OverpassFilterQueryVisitor;

impl Visitor<'_> for OverpassFilterQueryVisitor {
    type Value = FilterQuery;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a valid overpass filter query. see https://wiki.openstreetmap.org/wiki/Overpass_API/Language_Guide#Tag_request_clauses_(or_%22tag_filters%22).")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        FilterQuery::from_str(v).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for FilterQuery {
    fn deserialize<D>(deserializer: D) -> Result<FilterQuery, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(OverpassFilterQueryVisitor)
    }
}

impl Serialize for FilterQuery {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::FilterQuery;
    use crate::filter::FilterOp;
    use std::str::FromStr;

    #[test]
    fn parse_existential() {
        match FilterQuery::from_str(r#"["highway"]"#) {
            Ok(q) => {
                assert_eq!(q.op(), FilterOp::Exists);
                assert!(q.accept(&[("highway", "trunk")]));
                assert!(!q.accept(&[("name", "x")]));
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn negated_regex_accepts_missing_tag() {
        let q = FilterQuery::from_str(r#"["service"!~"parking|driveway"]"#)
            .expect("query should parse");
        assert!(q.accept(&[("highway", "service")]));
        assert!(q.accept(&[("service", "spur")]));
        assert!(!q.accept(&[("service", "parking_aisle")]));
    }

    #[test]
    fn equals_requires_tag() {
        let q = FilterQuery::from_str(r#"["area"="yes"]"#).expect("query should parse");
        assert!(q.accept(&[("area", "yes")]));
        assert!(!q.accept(&[]));
        let neq = FilterQuery::from_str(r#"["area"!="yes"]"#).expect("query should parse");
        assert!(neq.accept(&[]));
        assert!(!neq.accept(&[("area", "yes")]));
    }

    #[test]
    fn display_matches_input() {
        let text = r#"["highway"~"motorway|trunk"]"#;
        let q = FilterQuery::from_str(text).expect("query should parse");
        assert_eq!(q.to_string(), text);
    }

    #[test]
    fn rejects_malformed_query() {
        assert!(FilterQuery::from_str(r#"highway=trunk"#).is_err());
        assert!(FilterQuery::from_str(r#"["highway"~"("]"#).is_err());
    }

    #[test]
    fn deserializes_from_string_list() {
        let queries: Vec<FilterQuery> =
            serde_json::from_str(r#"["[\"highway\"]", "[\"access\"!~\"private\"]"]"#)
                .expect("queries should deserialize");
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].tag(), "access");
    }
}
