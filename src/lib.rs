//! # restlos
//!
//! A REST API over the configuration objects of a Nagios-compatible
//! monitoring core.
//!
//! ## Features
//!
//! - **Object endpoints**: `GET`, `POST` (upsert by key attribute) and
//!   `DELETE` for hosts, services, groups, contacts, commands and time periods
//! - **Wildcard filters**: `?host_name=web*` style queries
//! - **Validation**: attribute whitelisting and illegal key characters
//! - **Control**: configuration verification and restart of the core
//! - **Pluggable authentication**: local argon2 users or LDAP (feature `ldap`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restlos::prelude::*;
//!
//! let config = ApiConfig::load(Path::new("/etc/restlos/config.yaml"))?;
//! let store = InMemoryObjectStore::new().with_output_dir(config.output_dir.clone());
//!
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_store(store)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod control;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ApiResult, AuthGate, AuthProvider, BatchResponse, Credentials, EndpointCatalog,
        EndpointDefinition, MatchKind, ObjectDefinitions, ObjectRecord, ObjectStore,
        OperationOutcome, Principal, ProviderKind, Query, StoredObject, Summary, Term, Validator,
    };

    // === Control ===
    pub use crate::control::{ControlAction, ControlDispatcher, ControlResponse, ControlResult};

    // === Storage ===
    pub use crate::storage::InMemoryObjectStore;

    // === Config ===
    pub use crate::config::{ApiConfig, AuthConfig, ConfigError, LogFormat, LoggingConfig};

    // === Server ===
    pub use crate::server::{ApiContext, EndpointRegistry, RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use std::path::Path;
    pub use uuid::Uuid;
}
