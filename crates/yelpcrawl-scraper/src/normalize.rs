//! Website URL normalization.
//!
//! Outbound links on the listings site are redirect wrappers such as
//! `/biz_redir?url=https%3A%2F%2Fexample.com&website_link_type=website&...`.
//! The real target is the percent-encoded `url=` parameter.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

static REDIRECT_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url=(.+?)&").expect("valid regex"));

/// Extracts and percent-decodes the redirect target embedded in `raw`.
///
/// The `url=` value must be followed by `&`; a trailing `url=` parameter with
/// nothing after it does not match. `+` is kept as-is, only `%XX` sequences
/// are decoded. Returns `None` for an empty input or when the pattern is
/// absent. A miss is a normal outcome and feeds the fallback path.
#[must_use]
pub fn normalize_redirect_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let encoded = REDIRECT_TARGET_RE.captures(raw)?.get(1)?.as_str();
    let decoded = percent_decode_str(encoded).decode_utf8_lossy().into_owned();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}
