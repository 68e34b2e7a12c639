//! Shared test harness for object store backends
//!
//! Provides helpers for building monitoring objects and the
//! `object_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod object_store_tests;

use restlos::core::store::{ObjectStore, StoredObject};

/// Build an unsaved host object
pub fn host(name: &str, address: &str) -> StoredObject {
    let mut object = StoredObject::new("host");
    object.set_attribute("host_name", name);
    object.set_attribute("address", address);
    object
}

/// Build an unsaved command object
pub fn command(name: &str, line: &str) -> StoredObject {
    let mut object = StoredObject::new("command");
    object.set_attribute("command_name", name);
    object.set_attribute("command_line", line);
    object
}

/// Save a batch of objects, returning the persisted copies
pub async fn save_all(store: &dyn ObjectStore, objects: Vec<StoredObject>) -> Vec<StoredObject> {
    let mut saved = Vec::with_capacity(objects.len());
    for object in objects {
        saved.push(store.save(&object).await.unwrap());
    }
    saved
}

/// Key values of a list of objects, in order
pub fn keys<'a>(objects: &'a [StoredObject], key: &str) -> Vec<&'a str> {
    objects.iter().filter_map(|o| o.get(key)).collect()
}
