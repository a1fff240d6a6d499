//! Shared domain types and process-wide configuration for placefinder.

pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    EnrichedPlace, ResultSet, SearchRequest, UserLocation, MAX_PLACES, MIN_PROMPT_CHARS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
