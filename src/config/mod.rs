use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 4800;
const DEFAULT_VPIC_URL: &str = "https://vpic.nhtsa.dot.gov/api";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── VehicleDataConfig ────────────────────────────────────────────────────────

/// VIN decode proxy configuration (`[vehicle_data]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VehicleDataConfig {
    /// Base URL of the vPIC API (default: the public NHTSA endpoint).
    pub base_url: String,
    /// Upstream request timeout in seconds (default: 10).
    pub timeout_secs: u64,
    /// Maximum entries in the VIN memo table (default: 256).
    pub cache_capacity: usize,
    /// Memo entry lifetime in seconds (default: 86400). Decoded VINs are
    /// immutable upstream, so a long TTL is safe.
    pub cache_ttl_secs: u64,
}

impl Default for VehicleDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VPIC_URL.to_string(),
            timeout_secs: 10,
            cache_capacity: 256,
            cache_ttl_secs: 86_400,
        }
    }
}

// ─── RetryConfig ──────────────────────────────────────────────────────────────

/// Upstream retry tuning (`[retry]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per upstream call, including the first (default: 3).
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds (default: 500).
    /// Doubles on each retry.
    pub initial_delay_ms: u64,
    /// Upper bound on the delay between attempts, in milliseconds
    /// (default: 5000).
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// REST API port (default: 4800).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" to expose beyond
    /// the reverse proxy host).
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,garaged=trace"
    /// (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json"
    /// (structured for log aggregators).
    log_format: Option<String>,
    /// Origins allowed by CORS. Empty or absent = allow any origin (the
    /// API is read-only and public).
    cors_allowed_origins: Option<Vec<String>>,
    /// VIN decode proxy settings (`[vehicle_data]`).
    vehicle_data: Option<VehicleDataConfig>,
    /// Upstream retry settings (`[retry]`).
    retry: Option<RetryConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServiceConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind_address: String,
    pub data_dir: PathBuf,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// CORS origin allowlist; empty = any origin.
    pub cors_allowed_origins: Vec<String>,
    /// VIN decode proxy settings.
    pub vehicle_data: VehicleDataConfig,
    /// Upstream retry settings.
    pub retry: RetryConfig,
}

impl ServiceConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("GARAGED_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let cors_allowed_origins = toml.cors_allowed_origins.unwrap_or_default();

        let mut vehicle_data = toml.vehicle_data.unwrap_or_default();
        if let Some(url) = std::env::var("GARAGED_VPIC_URL")
            .ok()
            .filter(|s| !s.is_empty())
        {
            vehicle_data.base_url = url;
        }

        let retry = toml.retry.unwrap_or_default();

        Self {
            port,
            bind_address,
            data_dir,
            log,
            log_format,
            cors_allowed_origins,
            vehicle_data,
            retry,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/garaged
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("garaged");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/garaged or ~/.local/share/garaged
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("garaged");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("garaged");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\garaged
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("garaged");
        }
    }
    // Fallback
    PathBuf::from(".garaged")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = ServiceConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.vehicle_data.base_url, DEFAULT_VPIC_URL);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert!(cfg.cors_allowed_origins.is_empty());
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
port = 9000
log = "debug"
cors_allowed_origins = ["https://garage.app"]

[vehicle_data]
timeout_secs = 3
cache_capacity = 16

[retry]
max_attempts = 5
"#,
        )
        .unwrap();

        let cfg = ServiceConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.cors_allowed_origins, vec!["https://garage.app"]);
        assert_eq!(cfg.vehicle_data.timeout_secs, 3);
        assert_eq!(cfg.vehicle_data.cache_capacity, 16);
        // Unset section fields keep their defaults.
        assert_eq!(cfg.vehicle_data.base_url, DEFAULT_VPIC_URL);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.initial_delay_ms, 500);
    }

    #[test]
    fn cli_beats_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 9000\n").unwrap();

        let cfg = ServiceConfig::new(
            Some(7000),
            Some(dir.path().to_path_buf()),
            Some("trace".to_string()),
            None,
        );
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.log, "trace");
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = \"not a number").unwrap();

        let cfg = ServiceConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
