//! Endpoint catalog: which object types are exposed, which attributes they
//! accept and which attribute identifies an object

use crate::core::error::{ApiError, ApiResult};
use crate::core::store::ObjectDefinitions;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Pseudo object type whose attributes are shared by every type
pub const ANY_OBJECT_TYPE: &str = "any";

/// Natural key attribute of every exposed object type
///
/// Must be extended whenever the store declares a new object type that
/// should be exposed.
pub const KEY_ATTRIBUTES: &[(&str, &str)] = &[
    ("hostgroup", "hostgroup_name"),
    ("hostextinfo", "host_name"),
    ("host", "host_name"),
    ("service", "service_description"),
    ("servicegroup", "servicegroup_name"),
    ("contact", "contact_name"),
    ("contactgroup", "contactgroup_name"),
    ("timeperiod", "timeperiod_name"),
    ("command", "command_name"),
];

/// Look up the key attribute of an object type in the static table
pub fn key_attribute_for(object_type: &str) -> Option<&'static str> {
    KEY_ATTRIBUTES
        .iter()
        .find(|(name, _)| *name == object_type)
        .map(|(_, key)| *key)
}

/// An exposed object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDefinition {
    pub name: String,
    pub attributes: BTreeSet<String>,
    pub key_attribute: String,
}

impl EndpointDefinition {
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }
}

/// All exposed object types, built once at startup
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    definitions: BTreeMap<String, EndpointDefinition>,
}

impl EndpointCatalog {
    /// Build the catalog from the store's declared object types
    ///
    /// The shared `any` attributes are merged into every type and `any`
    /// itself is not exposed. Types without an entry in [`KEY_ATTRIBUTES`]
    /// are skipped.
    pub fn from_definitions(definitions: &ObjectDefinitions) -> Self {
        let shared = definitions
            .get(ANY_OBJECT_TYPE)
            .cloned()
            .unwrap_or_default();

        let mut catalog = BTreeMap::new();
        for (name, attributes) in definitions {
            if name == ANY_OBJECT_TYPE {
                continue;
            }

            let Some(key_attribute) = key_attribute_for(name) else {
                tracing::warn!(object_type = %name, "no key attribute known, not exposing object type");
                continue;
            };

            let mut merged: BTreeSet<String> = attributes.union(&shared).cloned().collect();
            merged.insert(key_attribute.to_string());

            catalog.insert(
                name.clone(),
                EndpointDefinition {
                    name: name.clone(),
                    attributes: merged,
                    key_attribute: key_attribute.to_string(),
                },
            );
        }

        Self {
            definitions: catalog,
        }
    }

    pub fn definition_for(&self, name: &str) -> ApiResult<&EndpointDefinition> {
        self.definitions
            .get(name)
            .ok_or_else(|| ApiError::UnknownEndpoint {
                endpoint: name.to_string(),
            })
    }

    pub fn key_attribute(&self, name: &str) -> ApiResult<&str> {
        self.definition_for(name)
            .map(|definition| definition.key_attribute.as_str())
    }

    /// Exposed definitions in name order
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDefinition> {
        self.definitions.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn definitions() -> ObjectDefinitions {
        let mut defs = ObjectDefinitions::new();
        defs.insert("any".to_string(), attrs(&["use", "name", "register"]));
        defs.insert("host".to_string(), attrs(&["host_name", "address"]));
        defs.insert("command".to_string(), attrs(&["command_name", "command_line"]));
        defs.insert("hostdependency".to_string(), attrs(&["dependent_host_name"]));
        defs
    }

    #[test]
    fn test_any_is_merged_and_removed() {
        let catalog = EndpointCatalog::from_definitions(&definitions());

        assert!(catalog.definition_for("any").is_err());
        let host = catalog.definition_for("host").unwrap();
        assert!(host.has_attribute("use"));
        assert!(host.has_attribute("register"));
        assert!(host.has_attribute("address"));
    }

    #[test]
    fn test_types_without_key_are_skipped() {
        let catalog = EndpointCatalog::from_definitions(&definitions());
        assert_eq!(catalog.names(), vec!["command", "host"]);
    }

    #[test]
    fn test_key_attribute_lookup() {
        let catalog = EndpointCatalog::from_definitions(&definitions());
        assert_eq!(catalog.key_attribute("host").unwrap(), "host_name");
        assert_eq!(catalog.key_attribute("command").unwrap(), "command_name");
    }

    #[test]
    fn test_unknown_endpoint() {
        let catalog = EndpointCatalog::from_definitions(&definitions());
        match catalog.definition_for("hots") {
            Err(ApiError::UnknownEndpoint { endpoint }) => assert_eq!(endpoint, "hots"),
            other => panic!("Expected UnknownEndpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_key_attribute_always_legal() {
        let mut defs = ObjectDefinitions::new();
        defs.insert("timeperiod".to_string(), attrs(&["alias"]));
        let catalog = EndpointCatalog::from_definitions(&defs);
        assert!(
            catalog
                .definition_for("timeperiod")
                .unwrap()
                .has_attribute("timeperiod_name")
        );
    }

    #[test]
    fn test_static_key_table() {
        assert_eq!(key_attribute_for("service"), Some("service_description"));
        assert_eq!(key_attribute_for("hostextinfo"), Some("host_name"));
        assert_eq!(key_attribute_for("serviceescalation"), None);
    }
}
