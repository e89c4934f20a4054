use crate::app_config::{AppConfig, Environment, DEFAULT_GEOCODE_BASE_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, raw: &str| -> Result<u64, ConfigError> {
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("LISTFILTER_ENV", "development"))?;
    let log_level = or_default("LISTFILTER_LOG_LEVEL", "info");

    let geocode_api_key = lookup("LISTFILTER_GEOCODE_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let geocode_base_url = or_default("LISTFILTER_GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL);
    let geocode_timeout_secs = match lookup("LISTFILTER_GEOCODE_TIMEOUT_SECS") {
        Ok(raw) => Some(parse_u64("LISTFILTER_GEOCODE_TIMEOUT_SECS", &raw)?),
        Err(_) => None,
    };
    let user_agent = or_default("LISTFILTER_USER_AGENT", "listfilter/0.1 (distance-filter)");
    let debounce_delay_ms = parse_u64(
        "LISTFILTER_DEBOUNCE_MS",
        &or_default("LISTFILTER_DEBOUNCE_MS", "500"),
    )?;

    Ok(AppConfig {
        env,
        log_level,
        geocode_api_key,
        geocode_base_url,
        geocode_timeout_secs,
        user_agent,
        debounce_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LISTFILTER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
