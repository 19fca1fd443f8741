use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60; // outer budget per dashboard request
pub const DEFAULT_EXPLORER_TIMEOUT_SECS: u64 = 30; // per upstream HTTP call
pub const DEFAULT_DATABASE_ID: u32 = 163; // analytics Mongo instance in the explorer
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Top-level config (tally.toml + TALLY_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub schedulers: SchedulersConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Hard ceiling on one dashboard request, upstream fetches included.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Upstream database-explorer exec API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_explorer_base_url")]
    pub base_url: String,
    /// Database id in the exec endpoint path.
    #[serde(default = "default_database_id")]
    pub database_id: u32,
    #[serde(default = "default_explorer_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Collection holding per-run scheduler reports.
    #[serde(default = "default_reports_collection")]
    pub reports_collection: String,
    /// Collection holding the expected-value baseline snapshot.
    #[serde(default = "default_baseline_collection")]
    pub baseline_collection: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: default_explorer_base_url(),
            database_id: DEFAULT_DATABASE_ID,
            timeout_secs: DEFAULT_EXPLORER_TIMEOUT_SECS,
            page_limit: DEFAULT_PAGE_LIMIT,
            reports_collection: default_reports_collection(),
            baseline_collection: default_baseline_collection(),
        }
    }
}

/// The set of scheduler jobs the dashboard tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulersConfig {
    #[serde(default = "default_scheduler_names")]
    pub names: Vec<String>,
}

impl Default for SchedulersConfig {
    fn default() -> Self {
        Self {
            names: default_scheduler_names(),
        }
    }
}

/// On-disk locations for the cache, baseline snapshot and SSO token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn cache_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("validation-cache.json")
    }

    pub fn baseline_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("today-data.json")
    }

    pub fn token_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(".sso-token")
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_explorer_timeout() -> u64 {
    DEFAULT_EXPLORER_TIMEOUT_SECS
}
fn default_explorer_base_url() -> String {
    "https://database-explorer.gdn-app.com".to_string()
}
fn default_database_id() -> u32 {
    DEFAULT_DATABASE_ID
}
fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}
fn default_reports_collection() -> String {
    "schedulerReport".to_string()
}
fn default_baseline_collection() -> String {
    "scheduler".to_string()
}
fn default_scheduler_names() -> Vec<String> {
    vec![
        "SALES_FUNNEL_YESTERDAY".to_string(),
        "SALES_FUNNEL_LAST_7_DAYS".to_string(),
        "SALES_FUNNEL_MTD".to_string(),
    ]
}
fn default_data_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.tally", home)
}

impl TallyConfig {
    /// Load config from a TOML file with TALLY_* env var overrides.
    ///
    /// Every field has a default, so a missing file yields a working config
    /// pointed at the production explorer.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: TallyConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("TALLY_").split("_"))
            .extract()
            .map_err(|e| crate::error::TallyError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.tally/tally.toml", home)
}
