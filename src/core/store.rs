//! The object store seam
//!
//! The store owns the monitoring configuration objects and how they are
//! persisted. The API only ever works on detached [`StoredObject`] copies:
//! it filters, sets attributes locally, then saves or deletes.

use crate::core::query::Query;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One configuration object as seen from the API: attribute name to value
pub type ObjectRecord = IndexMap<String, String>;

/// Object type name to its declared attribute names
///
/// May contain the pseudo type `any`, whose attributes apply to every type.
pub type ObjectDefinitions = BTreeMap<String, BTreeSet<String>>;

/// A detached copy of a store object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Object type (e.g. "host")
    pub object_type: String,

    /// Store identity, `None` until the object has been saved once
    pub id: Option<Uuid>,

    /// Attributes defined on this object
    pub attributes: ObjectRecord,

    /// Configuration file the object is written to, assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
}

impl StoredObject {
    /// Create a new, unsaved object of the given type
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            id: None,
            attributes: ObjectRecord::new(),
            filename: None,
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }

    /// Set an attribute, overwriting any previous value
    pub fn set_attribute(&mut self, attribute: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check whether every term of the query matches this object
    pub fn matches(&self, query: &Query) -> bool {
        query.matches(&self.attributes)
    }
}

/// Persistence operations over monitoring configuration objects
///
/// Implementations provide whatever serialization concurrent access needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Declared object types and their attribute schemas
    fn object_definitions(&self) -> ObjectDefinitions;

    /// All objects of `object_type` matching `query`, in store order
    async fn filter(&self, object_type: &str, query: &Query) -> Result<Vec<StoredObject>>;

    /// Persist an object, creating it when it has no identity yet
    async fn save(&self, object: &StoredObject) -> Result<StoredObject>;

    /// Remove a persisted object
    async fn delete(&self, object: &StoredObject) -> Result<()>;

    /// Locate the external command file declared by the main configuration file
    async fn find_command_file(&self, main_cfg: &Path) -> Result<PathBuf> {
        crate::core::command_file::locate(main_cfg).await
    }

    /// Ask the monitoring core to restart through its command file
    async fn restart_program(&self, command_file: &Path) -> Result<()> {
        crate::core::command_file::submit(command_file, "RESTART_PROGRAM").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::translate;

    #[test]
    fn test_new_object_has_no_identity() {
        let object = StoredObject::new("host");
        assert!(object.is_new());
        assert!(object.attributes.is_empty());
        assert_eq!(object.object_type, "host");
        assert!(object.filename.is_none());
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut object = StoredObject::new("host");
        object.set_attribute("address", "10.0.0.1");
        object.set_attribute("address", "10.0.0.2");
        assert_eq!(object.get("address"), Some("10.0.0.2"));
        assert_eq!(object.attributes.len(), 1);
    }

    #[test]
    fn test_matches_query() {
        let mut object = StoredObject::new("host");
        object.set_attribute("host_name", "web01");

        let query = translate([("host_name".to_string(), "web*".to_string())]);
        assert!(object.matches(&query));

        let query = translate([("address".to_string(), "*".to_string())]);
        assert!(!object.matches(&query));
    }

    struct EmptyStore;

    #[async_trait]
    impl ObjectStore for EmptyStore {
        fn object_definitions(&self) -> ObjectDefinitions {
            ObjectDefinitions::new()
        }

        async fn filter(&self, _object_type: &str, _query: &Query) -> Result<Vec<StoredObject>> {
            Ok(Vec::new())
        }

        async fn save(&self, object: &StoredObject) -> Result<StoredObject> {
            Ok(object.clone())
        }

        async fn delete(&self, _object: &StoredObject) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_restart_goes_through_command_file() {
        let dir = tempfile::tempdir().unwrap();
        let main_cfg = dir.path().join("nagios.cfg");
        std::fs::write(&main_cfg, "command_file=nagios.cmd\n").unwrap();
        std::fs::write(dir.path().join("nagios.cmd"), "").unwrap();

        let store = EmptyStore;
        let command_file = store.find_command_file(&main_cfg).await.unwrap();
        assert_eq!(command_file, dir.path().join("nagios.cmd"));

        store.restart_program(&command_file).await.unwrap();
        let written = std::fs::read_to_string(&command_file).unwrap();
        assert!(written.ends_with(" RESTART_PROGRAM\n"));
    }
}
