//! Column width strings.
//!
//! Widths are stored the way they are displayed (`"50%"`, `"33.33%"`). They
//! are advisory styling data: nothing outside a resize gesture forces them to
//! sum to 100.

pub const MIN_COLUMN_PERCENT: f64 = 10.0;
pub const MAX_COLUMN_PERCENT: f64 = 90.0;

/// Smallest and largest column count a columns block can be created with
pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 3;

/// Preset widths for a freshly created columns block
pub fn preset_widths(count: usize) -> Vec<String> {
    match count.clamp(MIN_COLUMNS, MAX_COLUMNS) {
        1 => vec!["100%".to_string()],
        2 => vec!["50%".to_string(), "50%".to_string()],
        _ => vec!["33.33%".to_string(); 3],
    }
}

/// Parse `"42.5%"` (or a bare number) into `42.5`
pub fn parse_percent(width: &str) -> Option<f64> {
    let trimmed = width.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Round to the two decimals a width string can hold
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a percentage with at most two decimals and no trailing zeros
pub fn format_percent(value: f64) -> String {
    let mut text = format!("{:.2}", round_percent(value));
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{}%", text)
}
