//! Core types: endpoint catalog, authentication, query translation,
//! validation and the upsert engine

pub mod auth;
pub mod catalog;
pub mod command_file;
pub mod error;
pub mod outcome;
pub mod query;
pub mod store;
pub mod upsert;
pub mod validation;

pub use auth::{AuthGate, AuthProvider, Credentials, Principal, ProviderKind};
pub use catalog::{EndpointCatalog, EndpointDefinition};
pub use error::{ApiError, ApiResult};
pub use outcome::{BatchResponse, OperationOutcome, Summary};
pub use query::{MatchKind, Query, Term};
pub use store::{ObjectDefinitions, ObjectRecord, ObjectStore, StoredObject};
pub use validation::Validator;

/// Tracing target of audit events
pub const AUDIT_TARGET: &str = "restlos::audit";
