//! Per-run search inputs: what to look for and where.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// The two strings a crawl is seeded from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    pub category: String,
    pub location: String,
}

impl SearchParams {
    /// Builds params from explicit values, rejecting blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyParam`] if either value is blank.
    pub fn new(category: &str, location: &str) -> Result<Self, ConfigError> {
        let params = Self {
            category: category.trim().to_string(),
            location: location.trim().to_string(),
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.category.trim().is_empty() {
            return Err(ConfigError::EmptyParam("category"));
        }
        if self.location.trim().is_empty() {
            return Err(ConfigError::EmptyParam("location"));
        }
        Ok(())
    }
}

/// Reads `{"category": ..., "location": ...}` from a JSON file.
///
/// # Errors
///
/// - [`ConfigError::ParamsFile`] if the file cannot be read.
/// - [`ConfigError::MalformedParams`] if it is not valid JSON of that shape.
/// - [`ConfigError::EmptyParam`] if either value is blank.
pub fn load_search_params(path: &Path) -> Result<SearchParams, ConfigError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ParamsFile {
        path: display.clone(),
        source,
    })?;
    let params: SearchParams =
        serde_json::from_str(&content).map_err(|source| ConfigError::MalformedParams {
            path: display,
            source,
        })?;
    SearchParams::new(&params.category, &params.location)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn params_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn loads_category_and_location() {
        let file = params_file(r#"{"category": "pizza", "location": "San Francisco, CA"}"#);
        let params = load_search_params(file.path()).unwrap();
        assert_eq!(params.category, "pizza");
        assert_eq!(params.location, "San Francisco, CA");
    }

    #[test]
    fn missing_file_is_params_file_error() {
        let result = load_search_params(Path::new("/nonexistent/yelpcrawl/params.json"));
        assert!(
            matches!(result, Err(ConfigError::ParamsFile { .. })),
            "expected ParamsFile, got: {result:?}"
        );
    }

    #[test]
    fn bad_json_is_malformed_params_error() {
        let file = params_file(r#"{"category": "pizza", "#);
        let result = load_search_params(file.path());
        assert!(
            matches!(result, Err(ConfigError::MalformedParams { .. })),
            "expected MalformedParams, got: {result:?}"
        );
    }

    #[test]
    fn missing_key_is_malformed_params_error() {
        let file = params_file(r#"{"category": "pizza"}"#);
        let result = load_search_params(file.path());
        assert!(matches!(result, Err(ConfigError::MalformedParams { .. })));
    }

    #[test]
    fn blank_location_is_rejected() {
        let file = params_file(r#"{"category": "pizza", "location": "  "}"#);
        let result = load_search_params(file.path());
        assert!(matches!(result, Err(ConfigError::EmptyParam("location"))));
    }

    #[test]
    fn new_trims_values() {
        let params = SearchParams::new("  bakeries ", " Austin, TX").unwrap();
        assert_eq!(params.category, "bakeries");
        assert_eq!(params.location, "Austin, TX");
    }

    #[test]
    fn new_rejects_blank_category() {
        assert!(matches!(
            SearchParams::new("", "Austin"),
            Err(ConfigError::EmptyParam("category"))
        ));
    }
}
