//! Address-bar resolution, the secure indicator and download file names.

use gove::services::address::{file_name_from_url, is_secure, resolve_input};
use rstest::rstest;

#[rstest]
#[case("example.com", "https://example.com")]
#[case("www.rust-lang.org/learn", "https://www.rust-lang.org/learn")]
#[case("ftp://x", "ftp://x")]
#[case("http://example.com", "http://example.com")]
#[case("https://example.com/a?b=c", "https://example.com/a?b=c")]
#[case("about:blank", "about:blank")]
#[case("  docs.rs  ", "https://docs.rs")]
fn test_resolves_address_bar_input(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(resolve_input(input).as_deref(), Some(expected));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn test_blank_input_resolves_to_nothing(#[case] input: &str) {
    assert_eq!(resolve_input(input), None);
}

#[rstest]
#[case("https://example.com", true)]
#[case("https://example.com/login?next=/", true)]
#[case("http://example.com", false)]
#[case("ftp://example.com", false)]
#[case("not a url", false)]
#[case("", false)]
fn test_secure_indicator_follows_scheme(#[case] url: &str, #[case] secure: bool) {
    assert_eq!(is_secure(url), secure);
}

#[rstest]
#[case("https://example.com/files/report.pdf", "report.pdf")]
#[case("https://example.com/a/b/archive.tar.gz?token=1", "archive.tar.gz")]
#[case("https://example.com/", "download")]
#[case("https://example.com", "download")]
#[case("garbage", "download")]
fn test_file_name_is_last_path_segment(#[case] url: &str, #[case] name: &str) {
    assert_eq!(file_name_from_url(url), name);
}
