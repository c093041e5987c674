use std::collections::HashMap;

/// colors used for target roads that have no configured color
pub const BUILTIN_PALETTE: [(&str, &str); 5] = [
    ("G575", "#e74c3c"),
    ("G331", "#3498db"),
    ("G312", "#2ecc71"),
    ("S656", "#e67e22"),
    ("S235", "#9b59b6"),
];

/// color of a target road found in neither the configuration nor the palette
pub const NEUTRAL_COLOR: &str = "#333333";

/// accepts `#rgb` and `#rrggbb` hex colors, and alphabetic color names such as `steelblue`.
pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

/// color for a target road code: configured, then built-in, then neutral.
pub fn target_color(code: &str, configured: &HashMap<String, String>) -> String {
    if let Some(color) = configured.get(code) {
        return String::from(color.trim());
    }
    BUILTIN_PALETTE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, color)| String::from(*color))
        .unwrap_or_else(|| String::from(NEUTRAL_COLOR))
}
