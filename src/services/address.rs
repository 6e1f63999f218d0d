//! Address-bar helpers: turning typed text into a URL and deriving the
//! secure indicator and download file names from URLs.

use url::Url;

/// Resolves address-bar text to a URL.
///
/// Text that parses as a URL with a non-empty scheme is used verbatim;
/// anything else gets an `https://` prefix. Blank input resolves to `None`.
pub fn resolve_input(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    match Url::parse(text) {
        Ok(url) if !url.scheme().is_empty() => Some(text.to_string()),
        _ => Some(format!("https://{}", text)),
    }
}

/// Only `https` pages get the secure indicator.
pub fn is_secure(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}

/// Last path segment of `url`, or `"download"` when there is none.
pub fn file_name_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "download".to_string())
}
