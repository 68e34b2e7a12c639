//! API context shared by every request
//!
//! Built once at startup from the configuration and the object store, then
//! injected as axum state. Nothing in it changes while the server runs.

use crate::config::{ApiConfig, ConfigError};
use crate::control::ControlDispatcher;
use crate::core::auth::AuthGate;
use crate::core::store::ObjectStore;
use crate::core::validation::Validator;
use crate::server::entity_registry::EndpointRegistry;
use std::sync::Arc;

/// Immutable application context
#[derive(Clone, Debug)]
pub struct ApiContext {
    pub config: Arc<ApiConfig>,

    /// Exposed endpoints bound to the store
    pub registry: Arc<EndpointRegistry>,

    pub validator: Arc<Validator>,

    /// Authentication for every request except help
    pub auth: Arc<AuthGate>,

    pub control: Arc<ControlDispatcher>,
}

impl ApiContext {
    /// Build the context, resolving the auth provider from configuration
    pub fn new(config: ApiConfig, store: Arc<dyn ObjectStore>) -> Result<Self, ConfigError> {
        let auth = AuthGate::from_config(&config.auth.provider, &config.auth.params);
        Self::with_auth(config, store, auth)
    }

    /// Build the context with an explicit auth gate
    pub fn with_auth(
        config: ApiConfig,
        store: Arc<dyn ObjectStore>,
        auth: AuthGate,
    ) -> Result<Self, ConfigError> {
        let registry = EndpointRegistry::from_store(store.clone());
        if registry.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let validator = Validator::new(&config.illegal_object_name_chars);
        let control = ControlDispatcher::new(
            config.monitoring_bin.clone(),
            config.main_cfg.clone(),
            config.use_sudo,
            store,
        );

        tracing::info!(
            endpoints = registry.len(),
            provider = %auth.kind(),
            "API context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            validator: Arc::new(validator),
            auth: Arc::new(auth),
            control: Arc::new(control),
        })
    }

    /// Get endpoint names registered in the context
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.registry.endpoint_names()
    }
}
