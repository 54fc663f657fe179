use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BUDMAP_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.vendor_source, VendorSourceConfig::Seed);
    assert!(cfg.checkin_store_path.is_none());
    assert_eq!(cfg.search_latency_ms, 0);
    assert_eq!(cfg.lookup_latency_ms, 0);
    assert_eq!(cfg.source_request_timeout_secs, 30);
    assert_eq!(cfg.source_user_agent, "budmap/0.1 (vendor-catalog)");
    assert!(cfg.maps_api_key.is_none());
    assert!(cfg.api_key_hash_salt.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_BIND_ADDR"),
        "expected InvalidEnvVar(BUDMAP_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_env() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_ENV", "prod");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_ENV"),
        "expected InvalidEnvVar(BUDMAP_ENV), got: {result:?}"
    );
}

#[test]
fn vendors_path_selects_file_source() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_VENDORS_PATH", "./config/vendors.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.vendor_source,
        VendorSourceConfig::File(PathBuf::from("./config/vendors.yaml"))
    );
}

#[test]
fn vendors_url_selects_remote_source() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_VENDORS_URL", "https://catalog.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.vendor_source,
        VendorSourceConfig::Remote("https://catalog.example.com".to_string())
    );
}

#[test]
fn vendors_path_and_url_are_mutually_exclusive() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_VENDORS_PATH", "./config/vendors.yaml");
    map.insert("BUDMAP_VENDORS_URL", "https://catalog.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_VENDORS_URL"),
        "expected InvalidEnvVar(BUDMAP_VENDORS_URL), got: {result:?}"
    );
}

#[test]
fn blank_optional_values_are_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_VENDORS_PATH", "  ");
    map.insert("BUDMAP_MAPS_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.vendor_source, VendorSourceConfig::Seed);
    assert!(cfg.maps_api_key.is_none());
}

#[test]
fn checkin_store_path_override() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_CHECKIN_STORE_PATH", "/var/lib/budmap/checkins.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.checkin_store_path,
        Some(PathBuf::from("/var/lib/budmap/checkins.json"))
    );
}

#[test]
fn search_latency_ms_override() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_SEARCH_LATENCY_MS", "1000");
    map.insert("BUDMAP_LOOKUP_LATENCY_MS", "500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_latency_ms, 1000);
    assert_eq!(cfg.lookup_latency_ms, 500);
}

#[test]
fn search_latency_ms_invalid() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_SEARCH_LATENCY_MS", "one-second");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_SEARCH_LATENCY_MS"),
        "expected InvalidEnvVar(BUDMAP_SEARCH_LATENCY_MS), got: {result:?}"
    );
}

#[test]
fn lookup_latency_ms_invalid() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_LOOKUP_LATENCY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_LOOKUP_LATENCY_MS"),
        "expected InvalidEnvVar(BUDMAP_LOOKUP_LATENCY_MS), got: {result:?}"
    );
}

#[test]
fn source_request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_SOURCE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BUDMAP_SOURCE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BUDMAP_SOURCE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn source_user_agent_override() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_SOURCE_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source_user_agent, "custom-agent/2.0");
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("BUDMAP_MAPS_API_KEY", "maps-secret");
    map.insert("BUDMAP_API_KEY_HASH_SALT", "salt-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("maps-secret"));
    assert!(!debug.contains("salt-secret"));
    assert!(debug.contains("[redacted]"));
}
