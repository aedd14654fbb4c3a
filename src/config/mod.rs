//! Configuration management.
//!
//! Settings come from an optional TOML file overlaid by environment
//! variables prefixed with `INDUSTRY_PAPERS_`, using `__` between the section
//! and the key:
//!
//! ```toml
//! [eutils]
//! search_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"
//! fetch_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi"
//! database = "pubmed"
//! max_results = 10
//!
//! [http]
//! timeout_seconds = 30
//! connect_timeout_seconds = 10
//!
//! [fetch]
//! concurrency = 1
//!
//! [logging]
//! level = "info"
//! ```
//!
//! `INDUSTRY_PAPERS_EUTILS__MAX_RESULTS=5` overrides `eutils.max_results`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::{DEFAULT_MAX_RESULTS, PUBMED_EFETCH_URL, PUBMED_ESEARCH_URL};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "INDUSTRY_PAPERS";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "industry-papers.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// E-utilities endpoints and search parameters
    #[serde(default)]
    pub eutils: EutilsConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Batch fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// E-utilities configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EutilsConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_fetch_url")]
    pub fetch_url: String,

    #[serde(default = "default_database")]
    pub database: String,

    /// `retmax` sent with every search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            fetch_url: default_fetch_url(),
            database: default_database(),
            max_results: default_max_results(),
        }
    }
}

fn default_search_url() -> String {
    PUBMED_ESEARCH_URL.to_string()
}

fn default_fetch_url() -> String {
    PUBMED_EFETCH_URL.to_string()
}

fn default_database() -> String {
    "pubmed".to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Batch fetch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Detail requests in flight at once; 1 fetches strictly one after another
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from an optional file plus `INDUSTRY_PAPERS_*`
/// environment variables.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the working directory or the user config
/// directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}
