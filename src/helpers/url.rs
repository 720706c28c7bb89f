//! URL helper functions

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

lazy_static! {
    static ref REPEATED_SLASHES: Regex = Regex::new(r"/{2,}").unwrap();
}

/// Characters left unescaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Normalize a URL path to a leading and trailing slash
///
/// # Examples
/// ```ignore
/// normalize_path("about")        // -> "/about/"
/// normalize_path("//a//b?x=1")   // -> "/a/b/"
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let collapsed = REPEATED_SLASHES.replace_all(path, "/");
    let trimmed = collapsed.trim_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(base: &str, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Whether a link leaves the site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

/// Title-case a URL segment: `car-accidents` -> `Car Accidents`
pub fn title_case_segment(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Percent-encode a value for use in a query string
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
