//! Offset pagination over results pages.
//!
//! The main content column is a list of typed components; exactly one of them
//! is the pager:
//!
//! ```text
//! { "type": "pagination",
//!   "props": { "startResult": 0, "totalResults": 240, "resultsPerPage": 10 } }
//! ```
//!
//! The next page is requested by rewriting the `start=` query parameter of
//! the current URL (see [`crate::search::replace_start_param`]).

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScraperError;
use crate::json_path::{dotted, opt_at_path, typed, SEARCH_PAGE_PROPS};
use crate::types::PaginationCursor;

const COMPONENTS_LIST: &str = "mainContentComponentsListProps";
const PAGINATION_TYPE: &str = "pagination";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationProps {
    start_result: u64,
    total_results: u64,
    results_per_page: u64,
}

impl PaginationCursor {
    /// Start offset of the page after this one, or `None` on the last page.
    ///
    /// A short final page is requested at `total` rather than at
    /// `start + page_size`.
    #[must_use]
    pub fn next_start(&self) -> Option<u64> {
        let Self {
            start,
            total,
            page_size,
        } = *self;
        let page_end = start.saturating_add(page_size);
        if start < total && total < page_end {
            Some(total)
        } else if start < total {
            Some(page_end)
        } else {
            None
        }
    }
}

/// Reads the pagination component of a results page.
///
/// Returns `Ok(None)` when the page has no components list or no pagination
/// entry; both are treated as the end of results.
///
/// # Errors
///
/// Returns [`ScraperError::UnexpectedSchema`] if the pagination entry exists
/// but its `props` lack integer `startResult`, `totalResults`, or
/// `resultsPerPage`.
pub fn read_cursor(page: &Value) -> Result<Option<PaginationCursor>, ScraperError> {
    let mut path = SEARCH_PAGE_PROPS.to_vec();
    path.push(COMPONENTS_LIST);

    let Some(components) = opt_at_path(page, &path).and_then(Value::as_array) else {
        tracing::debug!("results page has no components list; treating as last page");
        return Ok(None);
    };

    let Some((index, entry)) = components
        .iter()
        .enumerate()
        .find(|(_, c)| c.get("type").and_then(Value::as_str) == Some(PAGINATION_TYPE))
    else {
        return Ok(None);
    };

    let props_path = format!("{}[{index}].props", dotted(&path));
    let props = entry
        .get("props")
        .ok_or_else(|| ScraperError::schema(props_path.as_str(), "key is missing"))?;
    let props: PaginationProps = typed(props, &props_path)?;

    Ok(Some(PaginationCursor {
        start: props.start_result,
        total: props.total_results,
        page_size: props.results_per_page,
    }))
}

/// Start offset of the next results page, or `None` when the crawl is done.
///
/// # Errors
///
/// Propagates [`read_cursor`] schema errors.
pub fn next_cursor(page: &Value) -> Result<Option<u64>, ScraperError> {
    Ok(read_cursor(page)?.and_then(|cursor| cursor.next_start()))
}
