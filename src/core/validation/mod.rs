//! Validation of filters and records before they reach the store
//!
//! Filters that fail validation reject the whole request; records that fail
//! validation only fail their own outcome.

pub mod filters;
pub mod validators;

use crate::core::catalog::EndpointDefinition;
use crate::core::error::{ApiError, ApiResult};
use crate::core::outcome::OperationOutcome;
use crate::core::store::ObjectRecord;

/// Characters the monitoring core rejects in object names
pub const DEFAULT_ILLEGAL_CHARS: &str = "`~!$%^&*|'\"<>?,()=";

/// Attribute and key value checks for one deployment
#[derive(Debug, Clone)]
pub struct Validator {
    illegal_chars: Vec<char>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_ILLEGAL_CHARS)
    }
}

impl Validator {
    pub fn new(illegal_chars: &str) -> Self {
        Self {
            illegal_chars: illegal_chars.chars().collect(),
        }
    }

    /// Validate request filters (`GET`/`DELETE` query arguments)
    pub fn validate_filters<'a, I>(&self, definition: &EndpointDefinition, filters: I) -> ApiResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (attribute, value) in filters {
            if validators::known_attribute(definition, attribute).is_err() {
                return Err(ApiError::UnknownAttribute {
                    endpoint: definition.name.clone(),
                    attribute: attribute.to_string(),
                });
            }

            self.check_key_value(definition, attribute, value)?;
        }
        Ok(())
    }

    /// Validate an incoming record, returning a 200 or 400 outcome
    pub fn validate_record(&self, definition: &EndpointDefinition, record: &ObjectRecord) -> OperationOutcome {
        for (attribute, value) in record {
            if validators::known_attribute(definition, attribute).is_err() {
                return OperationOutcome::bad_request(format!(
                    "invalid {} attribute: {}",
                    definition.name, attribute
                ));
            }

            if let Err(err) = self.check_key_value(definition, attribute, value) {
                return OperationOutcome::bad_request(err.to_string());
            }
        }
        OperationOutcome::ok(format!("valid {} object", definition.name))
    }

    fn check_key_value(&self, definition: &EndpointDefinition, attribute: &str, value: &str) -> ApiResult<()> {
        if attribute != definition.key_attribute {
            return Ok(());
        }

        validators::legal_characters(&self.illegal_chars, value).map_err(|character| {
            ApiError::InvalidKeyValue {
                attribute: attribute.to_string(),
                value: value.to_string(),
                character,
            }
        })
    }
}
