//! Fixed-path access into loosely typed page JSON.
//!
//! Every schema assumption about the results page goes through these helpers
//! so that drift surfaces as one [`ScraperError::UnexpectedSchema`] naming the
//! dotted path that stopped resolving.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ScraperError;

/// Root of the results-page state shared by listings and pagination.
pub(crate) const SEARCH_PAGE_PROPS: &[&str] = &["legacyProps", "searchAppProps", "searchPageProps"];

pub(crate) fn dotted(path: &[&str]) -> String {
    path.join(".")
}

/// Walks `path` from `root`, failing on the first missing key.
pub(crate) fn at_path<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, ScraperError> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        current = current.get(key).ok_or_else(|| {
            ScraperError::schema(dotted(&path[..=depth]), "key is missing")
        })?;
    }
    Ok(current)
}

/// Like [`at_path`] but treats a missing key (or an explicit `null`) as absent.
pub(crate) fn opt_at_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// Deserializes the value at `path` into `T`.
pub(crate) fn typed_at_path<T: DeserializeOwned>(
    root: &Value,
    path: &[&str],
) -> Result<T, ScraperError> {
    let value = at_path(root, path)?;
    typed(value, &dotted(path))
}

/// Deserializes `value` into `T`, reporting failures against `path`.
pub(crate) fn typed<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T, ScraperError> {
    T::deserialize(value).map_err(|e| ScraperError::schema(path, e.to_string()))
}
