//! Candidate icon-source URLs for a bookmark.
//!
//! Pure URL mapping, no network access. Site-native locations are tried
//! first; third-party icon services act as the fallback tail.

use url::Url;

/// Icon service keyed by host, first fallback provider.
pub const PROVIDER_DUCKDUCKGO: &str = "https://icons.duckduckgo.com/ip3";

/// Icon service keyed by domain query parameter, second fallback provider.
pub const PROVIDER_GOOGLE: &str = "https://www.google.com/s2/favicons";

/// Ordered candidate icon URLs for a bookmark URL, most specific first:
///
/// 1. `{scheme}://{host}/favicon.ico`
/// 2. `{scheme}://{host}/favicon.png`
/// 3. `{scheme}://{host}/apple-touch-icon.png`
/// 4. DuckDuckGo icon service
/// 5. Google favicon service
///
/// An unparseable URL, or one without a host, yields an empty list; the
/// coordinator treats that as an immediate failure for the domain.
pub fn candidates_for(source_url: &str) -> Vec<Url> {
    let Ok(parsed) = Url::parse(source_url.trim()) else {
        return Vec::new();
    };
    let Some(host) = parsed.host_str() else {
        return Vec::new();
    };
    let scheme = parsed.scheme();

    [
        format!("{scheme}://{host}/favicon.ico"),
        format!("{scheme}://{host}/favicon.png"),
        format!("{scheme}://{host}/apple-touch-icon.png"),
        format!("{PROVIDER_DUCKDUCKGO}/{host}.ico"),
        format!("{PROVIDER_GOOGLE}?domain={host}&sz=32"),
    ]
    .iter()
    .filter_map(|u| Url::parse(u).ok())
    .collect()
}

/// Hostname portion of a bookmark URL, used as the cache key.
pub fn domain_of(source_url: &str) -> Option<String> {
    Url::parse(source_url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
