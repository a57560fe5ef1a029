use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let apify_api_token = require("APIFY_API_TOKEN")?;
    let gemini_api_key = lookup("GEMINI_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let env = parse_environment(&or_default("REELSCOPE_ENV", "development"))?;
    let log_level = or_default("REELSCOPE_LOG_LEVEL", "info");

    let apify_base_url = or_default("REELSCOPE_APIFY_BASE_URL", "https://api.apify.com");
    let apify_actor = or_default(
        "REELSCOPE_APIFY_ACTOR",
        "clockworks/tiktok-profile-scraper",
    );
    let results_per_page = parse_u32("REELSCOPE_RESULTS_PER_PAGE", "30")?;
    if results_per_page == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REELSCOPE_RESULTS_PER_PAGE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let gemini_base_url = or_default(
        "REELSCOPE_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("REELSCOPE_GEMINI_MODEL", "gemini-3-flash-preview");

    let request_timeout_secs = parse_u64("REELSCOPE_REQUEST_TIMEOUT_SECS", "300")?;
    let user_agent = or_default(
        "REELSCOPE_USER_AGENT",
        "reelscope/0.1 (creator-analytics)",
    );
    let max_retries = parse_u32("REELSCOPE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("REELSCOPE_RETRY_BACKOFF_BASE_SECS", "5")?;

    let cache_dir = PathBuf::from(or_default("REELSCOPE_CACHE_DIR", "./.reelscope-cache"));
    let cache_ttl_secs = parse_u64("REELSCOPE_CACHE_TTL_SECS", "3600")?;

    Ok(AppConfig {
        env,
        log_level,
        apify_api_token,
        apify_base_url,
        apify_actor,
        results_per_page,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        cache_dir,
        cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REELSCOPE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
