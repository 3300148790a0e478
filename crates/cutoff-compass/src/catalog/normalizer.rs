/// Lowercased alphanumeric tokens of `value`, with `&` read as `and`.
pub(crate) fn tokens(value: &str) -> Vec<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "").replace('&', " and ");
    cleaned
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub(crate) fn normalize_name(value: &str) -> String {
    tokens(value).join(" ")
}

/// True when `needle` occurs as a contiguous run of whole tokens in `haystack`.
pub(crate) fn contains_tokens(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
