//! Object store implementations

pub mod in_memory;
pub mod schema;

pub use in_memory::InMemoryObjectStore;
pub use schema::monitoring_object_definitions;
