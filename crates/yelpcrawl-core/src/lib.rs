pub mod app_config;
pub mod config;
pub mod search_params;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use search_params::{load_search_params, SearchParams};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("could not read search parameters file {path}: {source}")]
    ParamsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed search parameters in {path}: {source}")]
    MalformedParams {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("search parameter \"{0}\" must not be empty")]
    EmptyParam(&'static str),
}
