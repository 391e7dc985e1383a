//! Configuration loading for chartd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.occon-chart/config.toml` (user)
//! 3. `/etc/occon-chart/config.toml` (system)
//!
//! Every setting has a default, so running without any file is allowed.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::service::{DEFAULT_DEBUG_LIMIT, DEFAULT_EVENT_TAG, DEFAULT_SITE, ServiceConfig};
use crate::source::WikidotConfig;
use crate::source::wikidot::{DEFAULT_URL_TEMPLATE, MAX_PER_PAGE};
use crate::{ChartError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub wikidot: WikidotSection,
    #[serde(default)]
    pub chart: ChartSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// Upstream Wikidot settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WikidotSection {
    /// Site to aggregate (default: scp-jp).
    #[serde(default = "default_site")]
    pub site: String,
    /// Site URL template; `{site}` is substituted.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// ListPages page size (default: 250).
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for WikidotSection {
    fn default() -> Self {
        Self {
            site: default_site(),
            url_template: default_url_template(),
            timeout_secs: default_timeout(),
            per_page: default_per_page(),
        }
    }
}

fn default_site() -> String {
    DEFAULT_SITE.to_string()
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_per_page() -> usize {
    MAX_PER_PAGE
}

/// Aggregation and cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartSection {
    /// Tag required on production queries (default: occon).
    #[serde(default = "default_event_tag")]
    pub event_tag: String,
    /// Per-bucket result cap on debug runs (default: 30).
    #[serde(default = "default_debug_limit")]
    pub debug_limit: usize,
    /// Cache validity window in seconds (default: 600).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            event_tag: default_event_tag(),
            debug_limit: default_debug_limit(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_event_tag() -> String {
    DEFAULT_EVENT_TAG.to_string()
}

fn default_debug_limit() -> usize {
    DEFAULT_DEBUG_LIMIT
}

fn default_cache_ttl() -> u64 {
    600
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.occon-chart/config.toml`
    /// 3. `/etc/occon-chart/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ChartError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ChartError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ChartError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".occon-chart").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/occon-chart/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Client settings for the Wikidot source.
    pub fn wikidot_config(&self) -> WikidotConfig {
        WikidotConfig::new()
            .url_template(&self.wikidot.url_template)
            .timeout(Duration::from_secs(self.wikidot.timeout_secs))
            .per_page(self.wikidot.per_page)
    }

    /// Settings for the chart service.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new()
            .site(&self.wikidot.site)
            .event_tag(&self.chart.event_tag)
            .debug_limit(self.chart.debug_limit)
            .cache(CacheConfig::new().ttl(Duration::from_secs(self.chart.cache_ttl_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.wikidot.site, "scp-jp");
        assert_eq!(config.wikidot.url_template, "https://{site}.wikidot.com");
        assert_eq!(config.wikidot.timeout_secs, 60);
        assert_eq!(config.wikidot.per_page, 250);
        assert_eq!(config.chart.event_tag, "occon");
        assert_eq!(config.chart.debug_limit, 30);
        assert_eq!(config.chart.cache_ttl_secs, 600);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        // Defaults preserved
        assert_eq!(config.wikidot.site, "scp-jp");
        assert_eq!(config.chart.cache_ttl_secs, 600);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"

            [wikidot]
            site = "scp-wiki"
            url_template = "http://{site}.example.test"
            timeout_secs = 10
            per_page = 100

            [chart]
            event_tag = "occon2026"
            debug_limit = 5
            cache_ttl_secs = 120
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:9000");
        assert_eq!(config.wikidot.site, "scp-wiki");
        assert_eq!(config.wikidot.timeout_secs, 10);
        assert_eq!(config.chart.event_tag, "occon2026");
        assert_eq!(config.chart.debug_limit, 5);

        let wikidot = config.wikidot_config();
        assert_eq!(wikidot.site_url("scp-wiki"), "http://scp-wiki.example.test");
        assert_eq!(wikidot.timeout, Duration::from_secs(10));
        assert_eq!(wikidot.per_page, 100);

        let service = config.service_config();
        assert_eq!(service.site, "scp-wiki");
        assert_eq!(service.event_tag, "occon2026");
        assert_eq!(service.debug_limit, 5);
        assert_eq!(service.cache.ttl, Duration::from_secs(120));
    }

    #[test]
    fn oversized_page_size_is_clamped() {
        let toml = r#"
            [wikidot]
            per_page = 9999
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.wikidot_config().per_page, MAX_PER_PAGE);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chart]\ndebug_limit = 7\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.chart.debug_limit, 7);
        assert_eq!(config.server.address, "127.0.0.1:8000");
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chart\ndebug_limit = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }
}
