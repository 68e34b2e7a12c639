//! Record filters
//!
//! These filters turn JSON request bodies into [`ObjectRecord`]s before
//! validation.

use crate::core::store::ObjectRecord;
use serde_json::Value;

/// Filter: convert a scalar JSON value to its attribute text
///
/// Strings are kept verbatim, numbers and booleans use their JSON text.
/// `null`, arrays and objects have no attribute representation.
pub fn attribute_value(attribute: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(format!("attribute {} must not be null", attribute)),
        Value::Array(_) | Value::Object(_) => Err(format!(
            "attribute {} must be a string, number or boolean",
            attribute
        )),
    }
}

/// Filter: convert one JSON object of a request body into a record
pub fn object_record(value: &Value) -> Result<ObjectRecord, String> {
    let Some(map) = value.as_object() else {
        return Err("each object must be a JSON object".to_string());
    };

    map.iter()
        .map(|(attribute, value)| Ok((attribute.clone(), attribute_value(attribute, value)?)))
        .collect()
}
