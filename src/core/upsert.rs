//! Create-or-update by natural key, and batch deletion
//!
//! Each record is resolved and saved on its own: a failing record never
//! affects the others and nothing is rolled back. Updates are
//! last-write-wins: attributes absent from the record are left untouched.

use crate::core::catalog::EndpointDefinition;
use crate::core::error::{ApiError, ApiResult};
use crate::core::outcome::OperationOutcome;
use crate::core::query::Query;
use crate::core::store::{ObjectRecord, ObjectStore, StoredObject};
use crate::core::validation::Validator;

/// Store one record, creating the object when its key is not known yet
pub async fn upsert(
    definition: &EndpointDefinition,
    store: &dyn ObjectStore,
    validator: &Validator,
    record: &ObjectRecord,
) -> OperationOutcome {
    let object_type = definition.name.as_str();
    let key_attribute = definition.key_attribute.as_str();

    let Some(key_value) = record.get(key_attribute) else {
        return OperationOutcome::bad_request(format!(
            "required key for {} object not set: {}",
            object_type, key_attribute
        ));
    };

    let existing = match store
        .filter(object_type, &Query::exact(key_attribute, key_value.as_str()))
        .await
    {
        Ok(existing) => existing,
        Err(err) => {
            return OperationOutcome::internal(format!(
                "unable to look up {} object {}: {}",
                object_type, key_value, err
            ));
        }
    };

    let mut target = existing
        .into_iter()
        .next()
        .unwrap_or_else(|| StoredObject::new(object_type));

    let validation = validator.validate_record(definition, record);
    if !validation.is_success() {
        return validation;
    }

    for (attribute, value) in record {
        target.set_attribute(attribute.as_str(), value.as_str());
    }

    match store.save(&target).await {
        Ok(_) => OperationOutcome::ok(format!(
            "successfully stored {} object: {}",
            object_type, key_value
        )),
        Err(err) => {
            tracing::debug!(object_type, key = %key_value, error = %err, "failed to store object");
            OperationOutcome::internal(format!(
                "unable to save {} object {}: {}",
                object_type, key_value, err
            ))
        }
    }
}

/// Delete every object matching the query, one outcome per object
///
/// A failing lookup aborts the whole request; a failing delete only fails
/// its own outcome.
pub async fn delete_matching(
    definition: &EndpointDefinition,
    store: &dyn ObjectStore,
    query: &Query,
) -> ApiResult<Vec<OperationOutcome>> {
    let object_type = definition.name.as_str();
    let objects = store
        .filter(object_type, query)
        .await
        .map_err(|err| ApiError::PersistenceFailure {
            message: err.to_string(),
        })?;

    let mut outcomes = Vec::with_capacity(objects.len());
    for object in objects {
        let key = object
            .get(&definition.key_attribute)
            .unwrap_or_default()
            .to_string();

        let outcome = match store.delete(&object).await {
            Ok(()) => OperationOutcome::ok(format!(
                "successfully deleted {} object: {}",
                object_type, key
            )),
            Err(err) => {
                tracing::debug!(object_type, key = %key, error = %err, "failed to delete object");
                OperationOutcome::internal(format!(
                    "unable to delete {} object {}: {}",
                    object_type, key, err
                ))
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
