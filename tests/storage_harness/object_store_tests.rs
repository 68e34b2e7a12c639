//! Macro-generated test suite for `ObjectStore` contract validation.
//!
//! The `object_store_tests!` macro generates a test module that validates any
//! `ObjectStore` implementation declaring the monitoring object types:
//! identity assignment, filtering, updates, deletion and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use restlos::storage::InMemoryObjectStore;
//!
//! object_store_tests!(InMemoryObjectStore::new());
//! ```

/// Generate a full `ObjectStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent access test, the returned store must also implement
/// `Clone + 'static`.
#[macro_export]
macro_rules! object_store_tests {
    ($factory:expr) => {
        mod object_store_contract_tests {
            use super::*;
            use restlos::core::query::{Query, translate};
            use restlos::core::store::{ObjectStore, StoredObject};

            fn query(pairs: &[(&str, &str)]) -> Query {
                translate(
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string())),
                )
            }

            // ==================================================================
            // Schema
            // ==================================================================

            #[test]
            fn test_declares_monitoring_types() {
                let store = $factory;
                let definitions = store.object_definitions();

                assert!(definitions["host"].contains("host_name"));
                assert!(definitions["service"].contains("service_description"));
                assert!(definitions["command"].contains("command_line"));
            }

            // ==================================================================
            // Save
            // ==================================================================

            #[tokio::test]
            async fn test_save_assigns_identity() {
                let store = $factory;
                let object = host("web01", "10.0.0.1");
                assert!(object.is_new());

                let saved = store.save(&object).await.unwrap();

                assert!(!saved.is_new());
                assert_eq!(saved.get("host_name"), Some("web01"));
            }

            #[tokio::test]
            async fn test_save_existing_updates_in_place() {
                let store = $factory;
                let mut saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();

                saved.set_attribute("address", "10.0.0.9");
                let updated = store.save(&saved).await.unwrap();

                assert_eq!(updated.id, saved.id);
                let all = store.filter("host", &Query::all()).await.unwrap();
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].get("address"), Some("10.0.0.9"));
            }

            #[tokio::test]
            async fn test_save_unknown_type_fails() {
                let store = $factory;
                let mut object = StoredObject::new("widget");
                object.set_attribute("widget_name", "x");

                assert!(store.save(&object).await.is_err());
            }

            #[tokio::test]
            async fn test_save_after_delete_fails() {
                let store = $factory;
                let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();
                store.delete(&saved).await.unwrap();

                assert!(store.save(&saved).await.is_err());
            }

            // ==================================================================
            // Filter
            // ==================================================================

            #[tokio::test]
            async fn test_filter_empty_store() {
                let store = $factory;
                let all = store.filter("host", &Query::all()).await.unwrap();
                assert!(all.is_empty());
            }

            #[tokio::test]
            async fn test_filter_separates_types() {
                let store = $factory;
                save_all(
                    &store,
                    vec![
                        host("web01", "10.0.0.1"),
                        command("check_ping", "$USER1$/check_ping"),
                    ],
                )
                .await;

                let hosts = store.filter("host", &Query::all()).await.unwrap();
                let commands = store.filter("command", &Query::all()).await.unwrap();

                assert_eq!(keys(&hosts, "host_name"), vec!["web01"]);
                assert_eq!(keys(&commands, "command_name"), vec!["check_ping"]);
            }

            #[tokio::test]
            async fn test_filter_match_kinds() {
                let store = $factory;
                save_all(
                    &store,
                    vec![
                        host("web01", "10.0.0.1"),
                        host("web02", "10.0.0.2"),
                        host("db01", "10.0.1.1"),
                    ],
                )
                .await;

                let exact = store.filter("host", &query(&[("host_name", "web02")])).await.unwrap();
                let prefix = store.filter("host", &query(&[("host_name", "web*")])).await.unwrap();
                let suffix = store.filter("host", &query(&[("host_name", "*01")])).await.unwrap();
                let contains = store.filter("host", &query(&[("address", "*1.1*")])).await.unwrap();

                assert_eq!(keys(&exact, "host_name"), vec!["web02"]);
                assert_eq!(keys(&prefix, "host_name"), vec!["web01", "web02"]);
                assert_eq!(keys(&suffix, "host_name"), vec!["web01", "db01"]);
                assert_eq!(keys(&contains, "host_name"), vec!["db01"]);
            }

            #[tokio::test]
            async fn test_filter_all_terms_must_match() {
                let store = $factory;
                save_all(&store, vec![host("web01", "10.0.0.1"), host("web02", "10.0.0.2")]).await;

                let both = query(&[("host_name", "web*"), ("address", "*.2")]);
                let found = store.filter("host", &both).await.unwrap();

                assert_eq!(keys(&found, "host_name"), vec!["web02"]);
            }

            #[tokio::test]
            async fn test_filter_missing_attribute_never_matches() {
                let store = $factory;
                save_all(&store, vec![host("web01", "10.0.0.1")]).await;

                let found = store.filter("host", &query(&[("alias", "*")])).await.unwrap();
                assert!(found.is_empty());
            }

            // ==================================================================
            // Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_keeps_remaining_order() {
                let store = $factory;
                let saved = save_all(
                    &store,
                    vec![
                        host("web01", "10.0.0.1"),
                        host("web02", "10.0.0.2"),
                        host("web03", "10.0.0.3"),
                    ],
                )
                .await;

                store.delete(&saved[1]).await.unwrap();

                let remaining = store.filter("host", &Query::all()).await.unwrap();
                assert_eq!(keys(&remaining, "host_name"), vec!["web01", "web03"]);
            }

            #[tokio::test]
            async fn test_delete_unsaved_fails() {
                let store = $factory;
                assert!(store.delete(&host("web01", "10.0.0.1")).await.is_err());
            }

            #[tokio::test]
            async fn test_delete_twice_fails() {
                let store = $factory;
                let saved = store.save(&host("web01", "10.0.0.1")).await.unwrap();

                store.delete(&saved).await.unwrap();
                assert!(store.delete(&saved).await.is_err());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let store = $factory;
                let mut handles = Vec::new();

                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        let name = format!("web{:02}", i);
                        store.save(&host(&name, "10.0.0.1")).await.unwrap();
                    }));
                }

                for handle in handles {
                    handle.await.unwrap();
                }

                let all = store.filter("host", &Query::all()).await.unwrap();
                assert_eq!(all.len(), 10);
            }
        }
    };
}
