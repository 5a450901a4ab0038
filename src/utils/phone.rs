use regex::Regex;
use std::sync::LazyLock;

static DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})([0-9]+)([0-9]{4})$").expect("valid regex"));

/// Mobile numbers as typed by users: `(DD) 9DDDD-DDDD`.
pub static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{2}\) 9[0-9]{4}-[0-9]{4}$").expect("valid regex"));

/// Landline numbers as typed by users: `(DD) DDDD-DDDD`.
pub static LANDLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{2}\) [0-9]{4}-[0-9]{4}$").expect("valid regex"));

/// Strips everything but ASCII digits, which is how phones are stored.
pub fn parse_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Renders stored digits as `(AA) MIDDLE-LAST`. Returns `None` when the value
/// is not a run of at least seven digits.
pub fn format_phone(digits: &str) -> Option<String> {
    let caps = DISPLAY_RE.captures(digits)?;
    Some(format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]))
}

/// Display form for a stored phone, falling back to the raw value.
pub fn display_phone(stored: &str) -> String {
    format_phone(stored).unwrap_or_else(|| stored.to_string())
}
