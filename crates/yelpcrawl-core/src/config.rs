use std::path::PathBuf;

use crate::app_config::{AppConfig, DEFAULT_SITE_ORIGIN};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let site_origin = parse_site_origin(&or_default("YELPCRAWL_SITE_ORIGIN", DEFAULT_SITE_ORIGIN))?;
    let log_level = or_default("YELPCRAWL_LOG_LEVEL", "info");
    let params_path = PathBuf::from(or_default(
        "YELPCRAWL_PARAMS_PATH",
        "./required_params.json",
    ));
    let request_timeout_secs = parse_u64("YELPCRAWL_REQUEST_TIMEOUT_SECS", "30")?;
    let max_concurrent_details = parse_usize("YELPCRAWL_MAX_CONCURRENT_DETAILS", "8")?.max(1);
    let max_pages = parse_usize("YELPCRAWL_MAX_PAGES", "200")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "YELPCRAWL_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let user_agent = lookup("YELPCRAWL_USER_AGENT")
        .ok()
        .map(|ua| ua.trim().to_string())
        .filter(|ua| !ua.is_empty());

    Ok(AppConfig {
        site_origin,
        log_level,
        params_path,
        request_timeout_secs,
        max_concurrent_details,
        max_pages,
        user_agent,
    })
}

/// Validate the site origin and strip any trailing slash so paths can be
/// appended with a plain `format!`.
fn parse_site_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "YELPCRAWL_SITE_ORIGIN".to_string(),
            reason: format!("\"{raw}\" must start with http:// or https://"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
