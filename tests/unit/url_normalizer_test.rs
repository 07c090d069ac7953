//! Unit tests for URL normalization and domain extraction.

use linkvault::services::url_normalizer::{domain, normalize_url, INVALID_DOMAIN};
use rstest::rstest;

#[rstest]
#[case("https://example.com/", "https://example.com")]
#[case("https://example.com", "https://example.com")]
#[case("HTTPS://Example.COM/Path/", "https://example.com/Path")]
#[case("https://example.com:443/a", "https://example.com/a")]
#[case("http://example.com:8080/", "http://example.com:8080")]
#[case("https://example.com/a/b/", "https://example.com/a/b")]
#[case("https://example.com/a?q=1", "https://example.com/a?q=1")]
#[case("https://example.com/a#frag", "https://example.com/a#frag")]
#[case("https://example.com/a//", "https://example.com/a")]
fn normalizes_valid_urls(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(normalize_url(raw), expected);
}

#[rstest]
#[case("not a url")]
#[case("")]
#[case("example.com/path")]
#[case("://missing-scheme")]
fn returns_unparseable_input_unchanged(#[case] raw: &str) {
    assert_eq!(normalize_url(raw), raw);
}

#[test]
fn trailing_slash_variants_collapse() {
    assert_eq!(
        normalize_url("https://example.com/docs/"),
        normalize_url("https://example.com/docs")
    );
}

#[rstest]
#[case("https://www.example.com/page", "example.com")]
#[case("https://example.com", "example.com")]
#[case("http://blog.example.com/x", "blog.example.com")]
#[case("https://wwwexample.com", "wwwexample.com")]
fn extracts_domain(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(domain(raw), expected);
}

#[rstest]
#[case("garbage")]
#[case("mailto:someone@example.com")]
fn invalid_domain_sentinel(#[case] raw: &str) {
    assert_eq!(domain(raw), INVALID_DOMAIN);
}
