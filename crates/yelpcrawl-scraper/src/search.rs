//! Seed URL construction and cursor substitution for results pages.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Everything except ASCII alphanumerics and `_ . - ~ /` is encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

static START_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"start=(\d+)").expect("valid regex"));

/// Builds the first results-page URL for a crawl.
///
/// `origin` is the site's scheme and host (`https://www.yelp.com`). The
/// category is capitalized (first letter upper, the rest lower) before
/// encoding; the location is encoded as given.
#[must_use]
pub fn build_search_url(origin: &str, category: &str, location: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let find_desc = utf8_percent_encode(&capitalize(category), QUERY_VALUE).to_string();
    let find_loc = utf8_percent_encode(location, QUERY_VALUE).to_string();
    format!("{origin}/search?find_desc={find_desc}&find_loc={find_loc}&start=0")
}

/// Rewrites every `start=<n>` in `url` to `start=<next_start>`, leaving the
/// rest of the query string untouched.
#[must_use]
pub fn replace_start_param(url: &str, next_start: u64) -> String {
    START_PARAM_RE
        .replace_all(url, format!("start={next_start}").as_str())
        .into_owned()
}

/// The offset in the first `start=<n>` parameter of `url`, if any.
#[must_use]
pub fn start_param(url: &str) -> Option<u64> {
    START_PARAM_RE
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
}

/// Detail payload endpoint for one listing.
#[must_use]
pub fn detail_url(origin: &str, resource_id: &str) -> String {
    format!("{}/biz/{resource_id}/props", origin.trim_end_matches('/'))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
