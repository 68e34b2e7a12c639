//! ServerBuilder for fluent API to build the HTTP server

use super::exposure::RestExposure;
use super::host::ApiContext;
use crate::config::ApiConfig;
use crate::core::auth::AuthGate;
use crate::core::store::ObjectStore;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the REST server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(ApiConfig::load(path)?)
///     .with_store(InMemoryObjectStore::new())
///     .serve()
///     .await?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<dyn ObjectStore>>,
    auth: Option<AuthGate>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (defaults are used otherwise)
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the object store (required)
    pub fn with_store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a store that is also used elsewhere
    pub fn with_shared_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this auth gate instead of the configured provider
    pub fn with_auth(mut self, auth: AuthGate) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the request context
    pub fn build_context(self) -> Result<ApiContext> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("ObjectStore is required. Call .with_store()"))?;
        let config = self.config.unwrap_or_default();

        let context = match self.auth {
            Some(auth) => ApiContext::with_auth(config, store, auth)?,
            None => ApiContext::new(config, store)?,
        };
        Ok(context)
    }

    /// Build the final REST router
    pub fn build(self) -> Result<Router> {
        let context = self.build_context()?;
        Ok(RestExposure::build_router(context))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the configured `host:port` and handles SIGTERM and SIGINT
    /// (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let context = self.build_context()?;
        let addr = context.config.bind_address();
        let app = RestExposure::build_router(context);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
