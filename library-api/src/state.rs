//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    links::RouteTable,
    mapping::PropertyMappingRegistry,
};

/// Read-only state shared across handlers
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    mappings: Arc<PropertyMappingRegistry>,
    routes: Arc<RouteTable>,
}

impl AppState {
    /// Build the state for `config`
    ///
    /// Registers the author and book property mappings and the library routes
    /// rooted at `hypermedia.base_url`.
    pub fn new(config: Config) -> Result<Self> {
        let mappings = PropertyMappingRegistry::library()?;
        let routes = RouteTable::library(config.hypermedia.base_url.clone());

        tracing::debug!(
            service = %config.service.name,
            base_url = %config.hypermedia.base_url,
            mappings = mappings.pairs().count(),
            "Application state ready"
        );

        Ok(Self::from_parts(config, mappings, routes))
    }

    /// Assemble state from pre-built parts
    #[must_use]
    pub fn from_parts(config: Config, mappings: PropertyMappingRegistry, routes: RouteTable) -> Self {
        Self {
            config: Arc::new(config),
            mappings: Arc::new(mappings),
            routes: Arc::new(routes),
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the property mapping registry
    #[must_use]
    pub fn mappings(&self) -> &PropertyMappingRegistry {
        &self.mappings
    }

    /// Get the route table used for link generation
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
