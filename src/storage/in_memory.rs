//! In-memory implementation of ObjectStore for testing and development

use crate::core::catalog::key_attribute_for;
use crate::core::query::Query;
use crate::core::store::{ObjectDefinitions, ObjectStore, StoredObject};
use crate::storage::schema::monitoring_object_definitions;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory object store
///
/// Keeps objects in insertion order. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<IndexMap<Uuid, StoredObject>>>,
    definitions: ObjectDefinitions,
    output_dir: Option<PathBuf>,
}

impl InMemoryObjectStore {
    /// Create an empty store declaring the monitoring object types
    pub fn new() -> Self {
        Self::with_definitions(monitoring_object_definitions())
    }

    /// Create an empty store declaring custom object types
    pub fn with_definitions(definitions: ObjectDefinitions) -> Self {
        Self {
            objects: Arc::new(RwLock::new(IndexMap::new())),
            definitions,
            output_dir: None,
        }
    }

    /// Directory new objects are assigned to
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// File a new object is assigned to: `<output_dir>/<type>s/<key>.cfg`
    fn filename_for(&self, object: &StoredObject, id: &Uuid) -> Option<PathBuf> {
        let output_dir = self.output_dir.as_ref()?;
        let name = key_attribute_for(&object.object_type)
            .and_then(|key| object.get(key))
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string());

        Some(
            output_dir
                .join(format!("{}s", object.object_type))
                .join(format!("{}.cfg", name)),
        )
    }

    pub fn len(&self) -> Result<usize> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(objects.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn object_definitions(&self) -> ObjectDefinitions {
        self.definitions.clone()
    }

    async fn filter(&self, object_type: &str, query: &Query) -> Result<Vec<StoredObject>> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(objects
            .values()
            .filter(|object| object.object_type == object_type && object.matches(query))
            .cloned()
            .collect())
    }

    async fn save(&self, object: &StoredObject) -> Result<StoredObject> {
        if !self.definitions.contains_key(&object.object_type) {
            return Err(anyhow!("Unknown object type: {}", object.object_type));
        }

        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let mut saved = object.clone();
        match object.id {
            Some(id) => {
                let current = objects
                    .get(&id)
                    .ok_or_else(|| anyhow!("Object not found: {}", id))?;
                saved.filename = current.filename.clone();
                objects.insert(id, saved.clone());
            }
            None => {
                let id = Uuid::new_v4();
                saved.id = Some(id);
                saved.filename = self.filename_for(&saved, &id);
                objects.insert(id, saved.clone());
            }
        }

        Ok(saved)
    }

    async fn delete(&self, object: &StoredObject) -> Result<()> {
        let id = object
            .id
            .ok_or_else(|| anyhow!("Object has never been saved"))?;

        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        objects
            .shift_remove(&id)
            .ok_or_else(|| anyhow!("Object not found: {}", id))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::translate;
    use std::path::Path;

    fn host(name: &str, address: &str) -> StoredObject {
        let mut object = StoredObject::new("host");
        object.set_attribute("host_name", name);
        object.set_attribute("address", address);
        object
    }

    #[tokio::test]
    async fn test_save_assigns_identity() {
        let store = InMemoryObjectStore::new();

        let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();

        assert!(!saved.is_new());
        assert_eq!(saved.get("host_name"), Some("web01"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_existing_replaces() {
        let store = InMemoryObjectStore::new();
        let mut saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();

        saved.set_attribute("address", "10.0.0.2");
        store.save(&saved).await.unwrap();

        let found = store.filter("host", &Query::all()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("address"), Some("10.0.0.2"));
    }

    #[tokio::test]
    async fn test_save_unknown_type_fails() {
        let store = InMemoryObjectStore::new();
        let result = store.save(&StoredObject::new("widget")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_save_deleted_object_fails() {
        let store = InMemoryObjectStore::new();
        let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();
        store.delete(&saved).await.unwrap();

        assert!(store.save(&saved).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_by_type_and_query() {
        let store = InMemoryObjectStore::new();
        store.save(&host("web01", "10.0.0.1")).await.unwrap();
        store.save(&host("web02", "10.0.0.2")).await.unwrap();
        store.save(&host("db01", "10.0.1.1")).await.unwrap();

        let mut command = StoredObject::new("command");
        command.set_attribute("command_name", "web_check");
        store.save(&command).await.unwrap();

        let query = translate([("host_name".to_string(), "web*".to_string())]);
        let found = store.filter("host", &query).await.unwrap();
        let names: Vec<&str> = found.iter().filter_map(|o| o.get("host_name")).collect();
        assert_eq!(names, vec!["web01", "web02"]);

        let all_hosts = store.filter("host", &Query::all()).await.unwrap();
        assert_eq!(all_hosts.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_keeps_order() {
        let store = InMemoryObjectStore::new();
        store.save(&host("a", "1")).await.unwrap();
        let b = store.save(&host("b", "2")).await.unwrap();
        store.save(&host("c", "3")).await.unwrap();

        store.delete(&b).await.unwrap();

        let found = store.filter("host", &Query::all()).await.unwrap();
        let names: Vec<&str> = found.iter().filter_map(|o| o.get("host_name")).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_delete_unsaved_or_missing_fails() {
        let store = InMemoryObjectStore::new();
        assert!(store.delete(&host("web01", "10.0.0.1")).await.is_err());

        let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();
        store.delete(&saved).await.unwrap();
        assert!(store.delete(&saved).await.is_err());
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_new_objects_get_filename_in_output_dir() {
        let store = InMemoryObjectStore::new().with_output_dir("/etc/nagios/objects/api");

        let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();
        assert_eq!(
            saved.filename.as_deref(),
            Some(Path::new("/etc/nagios/objects/api/hosts/web01.cfg"))
        );

        // renaming the key does not move the object
        let mut renamed = saved.clone();
        renamed.set_attribute("host_name", "web99");
        let resaved = store.save(&renamed).await.unwrap();
        assert_eq!(resaved.filename, saved.filename);
    }

    #[tokio::test]
    async fn test_no_output_dir_no_filename() {
        let store = InMemoryObjectStore::new();
        let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();
        assert!(saved.filename.is_none());
    }
}
