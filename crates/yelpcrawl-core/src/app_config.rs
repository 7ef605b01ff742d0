use std::path::PathBuf;

pub const DEFAULT_SITE_ORIGIN: &str = "https://www.yelp.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Scheme and host of the listings site, without a trailing slash.
    pub site_origin: String,
    pub log_level: String,
    /// JSON file holding the `category` and `location` for a run.
    pub params_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Upper bound on detail/fallback chains in flight for one results page.
    pub max_concurrent_details: usize,
    pub max_pages: usize,
    /// Fixed client identity. When unset a Chrome user agent is rotated in.
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            log_level: "info".to_string(),
            params_path: PathBuf::from("./required_params.json"),
            request_timeout_secs: 30,
            max_concurrent_details: 8,
            max_pages: 200,
            user_agent: None,
        }
    }
}
