/// String utility functions.
pub struct StringUtil;

impl StringUtil {
    /// Convert a string to a boolean.
    ///
    /// Valid true values: `"1"`, `"true"`, `"$true"` (case-insensitive).
    /// Valid false values: `"0"`, `"false"`, `"$false"` (case-insensitive).
    /// Returns `None` for unrecognized values.
    pub fn convert_to_bool(value: &str) -> Option<bool> {
        if value.is_empty() {
            return None;
        }
        match value.to_lowercase().as_str() {
            "1" | "true" | "$true" => Some(true),
            "0" | "false" | "$false" => Some(false),
            _ => None,
        }
    }

    /// Parse a base-10 signed 64-bit integer, ignoring surrounding whitespace.
    ///
    /// Values read from secret stores frequently carry a trailing newline.
    pub fn parse_i64(value: &str) -> Result<i64, std::num::ParseIntError> {
        value.trim().parse::<i64>()
    }

    /// Truncate `input` to at most `max` characters, appending `...` when cut.
    pub fn truncate(input: &str, max: usize) -> String {
        if input.chars().count() <= max {
            return input.to_string();
        }
        let kept: String = input.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
