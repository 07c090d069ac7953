//! URL canonicalization used for duplicate detection and display.
//!
//! Both functions are total: any input yields a string, never an error.

use url::Url;

/// Returned by [`domain`] when the input cannot be parsed as a URL.
pub const INVALID_DOMAIN: &str = "invalid-url";

/// Canonical form of `raw` for storage and equality comparison.
///
/// Parses `raw` as an absolute URL and returns its serialization with the
/// trailing `/` removed. Input that does not parse is returned unchanged.
///
/// A path ending in `//` loses the whole run, otherwise a second pass would
/// strip one more slash and normalization would not be idempotent.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => String::from(url).trim_end_matches('/').to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Hostname of `raw` with a leading `www.` removed.
pub fn domain(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => INVALID_DOMAIN.to_string(),
        },
        Err(_) => INVALID_DOMAIN.to_string(),
    }
}
