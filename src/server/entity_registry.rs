//! Endpoint registry: one typed handle per exposed object type

use crate::core::catalog::{EndpointCatalog, EndpointDefinition};
use crate::core::error::{ApiError, ApiResult};
use crate::core::outcome::OperationOutcome;
use crate::core::query::Query;
use crate::core::store::{ObjectRecord, ObjectStore};
use crate::core::upsert;
use crate::core::validation::Validator;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An exposed object type bound to the store
#[derive(Clone)]
pub struct EndpointHandle {
    definition: EndpointDefinition,
    store: Arc<dyn ObjectStore>,
}

impl fmt::Debug for EndpointHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHandle")
            .field("definition", &self.definition)
            .finish()
    }
}

impl EndpointHandle {
    pub fn new(definition: EndpointDefinition, store: Arc<dyn ObjectStore>) -> Self {
        Self { definition, store }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &EndpointDefinition {
        &self.definition
    }

    pub fn key_attribute(&self) -> &str {
        &self.definition.key_attribute
    }

    /// Attributes of every object matching the query
    pub async fn list(&self, query: &Query) -> ApiResult<Vec<ObjectRecord>> {
        let objects = self
            .store
            .filter(self.name(), query)
            .await
            .map_err(|err| ApiError::PersistenceFailure {
                message: err.to_string(),
            })?;

        Ok(objects.into_iter().map(|object| object.attributes).collect())
    }

    /// Create or update one object by its key attribute
    pub async fn upsert(&self, validator: &Validator, record: &ObjectRecord) -> OperationOutcome {
        upsert::upsert(&self.definition, self.store.as_ref(), validator, record).await
    }

    /// Delete every object matching the query
    pub async fn delete_matching(&self, query: &Query) -> ApiResult<Vec<OperationOutcome>> {
        upsert::delete_matching(&self.definition, self.store.as_ref(), query).await
    }
}

/// Registry of all exposed endpoints, built once at startup
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    catalog: EndpointCatalog,
    handles: BTreeMap<String, EndpointHandle>,
}

impl EndpointRegistry {
    /// Build the registry from the store's declared object types
    pub fn from_store(store: Arc<dyn ObjectStore>) -> Self {
        let catalog = EndpointCatalog::from_definitions(&store.object_definitions());
        let handles = catalog
            .endpoints()
            .map(|definition| {
                (
                    definition.name.clone(),
                    EndpointHandle::new(definition.clone(), store.clone()),
                )
            })
            .collect();

        Self { catalog, handles }
    }

    /// Look up the handle of an endpoint
    pub fn handle(&self, endpoint: &str) -> ApiResult<&EndpointHandle> {
        self.handles
            .get(endpoint)
            .ok_or_else(|| ApiError::UnknownEndpoint {
                endpoint: endpoint.to_string(),
            })
    }

    pub fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }

    /// Get all exposed endpoint names
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.handles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
