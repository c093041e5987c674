mod filter_op;
mod filter_query;
mod network_filter;

pub use filter_op::FilterOp;
pub use filter_query::FilterQuery;
pub use network_filter::NetworkFilter;

/// linear scan for the value of `key` in an element's tag list.
pub fn get_tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
