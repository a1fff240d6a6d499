use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_LLM_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
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
/// Returns `ConfigError` if a value is present but malformed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here: a missing LLM key surfaces as a
/// configuration error at call time, and a missing geocoder key only
/// degrades coordinate completion.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PLACEFINDER_ENV", "development"));
    let bind_addr = parse_addr("PLACEFINDER_BIND_ADDR", "0.0.0.0:4000")?;
    let log_level = or_default("PLACEFINDER_LOG_LEVEL", "info");
    let cors_origins = split_list(&or_default(
        "PLACEFINDER_CORS_ORIGINS",
        "http://localhost:3000",
    ));

    let rate_limit_max_requests = parse_usize("PLACEFINDER_RATE_LIMIT_MAX", "30")?;
    let rate_limit_window_secs = parse_u64("PLACEFINDER_RATE_LIMIT_WINDOW_SECS", "600")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "PLACEFINDER_RATE_LIMIT_WINDOW_SECS",
            "window must be at least 1 second".to_string(),
        ));
    }
    let api_keys = split_list(&or_default("PLACEFINDER_API_KEYS", ""));

    let llm_api_key = optional("DEEPSEEK_API_KEY");
    let llm_api_url = or_default("DEEPSEEK_API_URL", DEFAULT_LLM_API_URL);
    let llm_model = or_default("DEEPSEEK_MODEL", DEFAULT_LLM_MODEL);
    let llm_max_retries = parse_u32("PLACEFINDER_LLM_MAX_RETRIES", "3")?;
    let llm_base_delay_ms = parse_u64("PLACEFINDER_LLM_BASE_DELAY_MS", "1000")?;
    let llm_timeout_ms = parse_u64("PLACEFINDER_LLM_TIMEOUT_MS", "30000")?;

    let geocode_api_key = optional("GOOGLE_MAPS_API_KEY");
    let geocode_url = or_default("PLACEFINDER_GEOCODE_URL", DEFAULT_GEOCODE_URL);
    let geocode_timeout_ms = parse_u64("PLACEFINDER_GEOCODE_TIMEOUT_MS", "15000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cors_origins,
        rate_limit_max_requests,
        rate_limit_window_secs,
        api_keys,
        llm_api_key,
        llm_api_url,
        llm_model,
        llm_max_retries,
        llm_base_delay_ms,
        llm_timeout_ms,
        geocode_api_key,
        geocode_url,
        geocode_timeout_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
