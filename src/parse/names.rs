/// Normalizes a class or unit label into a filesystem-safe token
///
/// Surrounding whitespace is trimmed and every remaining whitespace character
/// becomes an underscore, so `"ASL 1"` maps to `"ASL_1"`. All other
/// characters are kept as-is.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
