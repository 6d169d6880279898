//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: LIBRARY_)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/library-api/{service_name}/config.toml
//! 4. System directory: /etc/library-api/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Paging limits applied to collection requests
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Hypermedia / content negotiation settings
    #[serde(default)]
    pub hypermedia: HypermediaConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Paging limits
///
/// Requested page sizes above `max_page_size` are reduced to it, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Hypermedia settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypermediaConfig {
    /// Vendor media type that switches responses to the link-embedding shape
    #[serde(default = "default_media_type")]
    pub media_type: String,

    /// Header carrying pagination metadata for collection responses
    #[serde(default = "default_pagination_header")]
    pub pagination_header: String,

    /// Absolute origin prefixed to every generated link
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for HypermediaConfig {
    fn default() -> Self {
        Self {
            media_type: default_media_type(),
            pagination_header: default_pagination_header(),
            base_url: default_base_url(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    20
}

fn default_media_type() -> String {
    "application/vnd.library.hateoas+json".to_string()
}

fn default_pagination_header() -> String {
    "X-Pagination".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found is used):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/library-api/{service_name}/config.toml
    /// 3. System directory: /etc/library-api/{service_name}/config.toml
    ///
    /// Environment variables (LIBRARY_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        Self::load_for_service("library-api")
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("LIBRARY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses XDG directories and loads directly from the given path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("LIBRARY_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would make paging meaningless
    fn validate(&self) -> Result<()> {
        let paging = &self.pagination;
        if paging.max_page_size == 0 {
            return Err(crate::error::Error::configuration(
                "pagination.max_page_size must be at least 1",
            ));
        }
        if paging.default_page_size == 0 || paging.default_page_size > paging.max_page_size {
            return Err(crate::error::Error::configuration(format!(
                "pagination.default_page_size must be between 1 and {}",
                paging.max_page_size
            )));
        }
        Ok(())
    }

    /// Find all possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        paths.push(PathBuf::from("config.toml"));

        let xdg_dirs = xdg::BaseDirectories::with_prefix("library-api");
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/library-api")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "library-api".to_string(),
                log_level: default_log_level(),
                environment: default_environment(),
            },
            pagination: PaginationConfig::default(),
            hypermedia: HypermediaConfig::default(),
        }
    }
}
