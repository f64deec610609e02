use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sheet: SheetConfig,
    pub cache: CacheConfig,
    pub refresh: RefreshConfig,
    pub analysis: AnalysisConfig,
    pub client: ClientConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Browser origin allowed by CORS. Defaults to `http://localhost:{port}`.
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn cors_origin(&self) -> String {
        self.allowed_origin
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub range: String,
    pub base_url: String,
    pub credentials_path: PathBuf,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Refresh cadence, aligned to the epoch (60 = on the hour).
    pub interval_minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub model: String,
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub search_debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    #[serde(default = "default_json_logs")]
    pub json_logs: bool,
}

fn default_json_logs() -> bool {
    true
}

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    pub gemini_api_key: Option<SecretString>,
    pub google_credentials_base64: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().map(SecretString::from),
            google_credentials_base64: std::env::var("GOOGLE_CREDENTIALS_BASE64")
                .ok()
                .map(SecretString::from),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, overlaying environment variables for secrets
    /// and the listening port.
    pub fn load(path: Option<&Path>) -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let config_path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }
}
