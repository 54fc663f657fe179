use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the vendor catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorSourceConfig {
    /// The catalog compiled into the binary.
    Seed,
    /// A YAML catalog file.
    File(PathBuf),
    /// A remote catalog service base URL.
    Remote(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub vendor_source: VendorSourceConfig,
    /// JSON file for check-ins; `None` keeps them in memory.
    pub checkin_store_path: Option<PathBuf>,
    pub search_latency_ms: u64,
    pub lookup_latency_ms: u64,
    pub source_request_timeout_secs: u64,
    pub source_user_agent: String,
    pub maps_api_key: Option<String>,
    pub api_key_hash_salt: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("vendor_source", &self.vendor_source)
            .field("checkin_store_path", &self.checkin_store_path)
            .field("search_latency_ms", &self.search_latency_ms)
            .field("lookup_latency_ms", &self.lookup_latency_ms)
            .field(
                "source_request_timeout_secs",
                &self.source_request_timeout_secs,
            )
            .field("source_user_agent", &self.source_user_agent)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "api_key_hash_salt",
                &self.api_key_hash_salt.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
