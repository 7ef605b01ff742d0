//! Embedded JSON extraction from server-rendered pages.
//!
//! Results pages ship their initial state as JSON inside a script tag that
//! carries a `data-hypernova-id` attribute. The id value changes between
//! deploys, so it is discovered from the page first and then used to select
//! the matching script element. The JSON text is wrapped in `<!-- ... -->`,
//! which has to be stripped before parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

const MARKER_ATTR: &str = "data-hypernova-id";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-hypernova-id\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").expect("valid regex")
});

/// Finds and parses the embedded JSON document of a results page.
///
/// # Errors
///
/// - [`ScraperError::MissingMarker`] if the page has no `data-hypernova-id`.
/// - [`ScraperError::MissingPayload`] if no script with that id has any text.
/// - [`ScraperError::MalformedJson`] if the comment-stripped text is not JSON.
pub fn locate_json_blob(html: &str) -> Result<serde_json::Value, ScraperError> {
    let marker = find_marker_value(html).ok_or(ScraperError::MissingMarker)?;
    let raw = select_script_text(html, marker)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ScraperError::MissingPayload {
            marker: marker.to_owned(),
        })?;

    let stripped = strip_comment_delimiters(raw);
    serde_json::from_str(&stripped).map_err(|source| ScraperError::MalformedJson { source })
}

/// Returns the value of the first `data-hypernova-id` attribute in `html`.
pub(crate) fn find_marker_value(html: &str) -> Option<&str> {
    MARKER_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Returns the text of the first `<script>` whose `data-hypernova-id`
/// attribute equals `marker`.
fn select_script_text<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
    let attr_re = Regex::new(&format!(
        r#"{MARKER_ATTR}\s*=\s*["']{}["']"#,
        regex::escape(marker)
    ))
    .ok()?;

    SCRIPT_RE.captures_iter(html).find_map(|cap| {
        let attrs = cap.get(1)?.as_str();
        if attr_re.is_match(attrs) {
            cap.get(2).map(|m| m.as_str())
        } else {
            None
        }
    })
}

fn strip_comment_delimiters(raw: &str) -> String {
    raw.replace("<!--", "").replace("-->", "")
}
