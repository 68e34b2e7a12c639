//! HTTP server: endpoint registry, request context and REST exposure

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EndpointHandle, EndpointRegistry};
pub use exposure::RestExposure;
pub use host::ApiContext;
