use regex::Regex;

fn remote_url_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://[^\s/]+").expect("invalid http(s) regex"))
}

/// Determine whether a metadata value is an absolute http(s) URL that can be fetched as is.
pub fn is_remote_url(value: &str) -> bool {
    remote_url_pattern().is_match(value)
}
