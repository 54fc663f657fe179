use crate::app_config::{AppConfig, Environment, VendorSourceConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value is invalid.
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
/// Returns `ConfigError` if any value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Unset and blank are treated the same.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let env = parse_environment(&or_default("BUDMAP_ENV", "development"))?;
    let bind_addr = parse_addr("BUDMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BUDMAP_LOG_LEVEL", "info");

    let vendor_source = match (
        optional("BUDMAP_VENDORS_PATH"),
        optional("BUDMAP_VENDORS_URL"),
    ) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "BUDMAP_VENDORS_URL".to_string(),
                reason: "cannot be combined with BUDMAP_VENDORS_PATH".to_string(),
            })
        }
        (Some(path), None) => VendorSourceConfig::File(PathBuf::from(path)),
        (None, Some(url)) => VendorSourceConfig::Remote(url),
        (None, None) => VendorSourceConfig::Seed,
    };

    let checkin_store_path = optional("BUDMAP_CHECKIN_STORE_PATH").map(PathBuf::from);

    let search_latency_ms = parse_u64("BUDMAP_SEARCH_LATENCY_MS", "0")?;
    let lookup_latency_ms = parse_u64("BUDMAP_LOOKUP_LATENCY_MS", "0")?;

    let source_request_timeout_secs = parse_u64("BUDMAP_SOURCE_REQUEST_TIMEOUT_SECS", "30")?;
    let source_user_agent = or_default("BUDMAP_SOURCE_USER_AGENT", "budmap/0.1 (vendor-catalog)");

    let maps_api_key = optional("BUDMAP_MAPS_API_KEY");
    let api_key_hash_salt = optional("BUDMAP_API_KEY_HASH_SALT");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        vendor_source,
        checkin_store_path,
        search_latency_ms,
        lookup_latency_ms,
        source_request_timeout_secs,
        source_user_agent,
        maps_api_key,
        api_key_hash_salt,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BUDMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
