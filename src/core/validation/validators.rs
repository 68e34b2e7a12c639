//! Reusable attribute validators
//!
//! These checks are combined by [`Validator`](super::Validator) for both
//! request filters and incoming records.

use crate::core::catalog::EndpointDefinition;

/// Prefix of custom variables, accepted on every object type
pub const CUSTOM_ATTRIBUTE_PREFIX: char = '_';

/// Wildcard character, always accepted in key values
pub const WILDCARD: char = '*';

/// Validator: attribute must belong to the endpoint (or be a custom variable)
pub fn known_attribute(definition: &EndpointDefinition, attribute: &str) -> Result<(), String> {
    if attribute.starts_with(CUSTOM_ATTRIBUTE_PREFIX) || definition.has_attribute(attribute) {
        Ok(())
    } else {
        Err(format!("unknown attribute: {}", attribute))
    }
}

/// Validator: value must not contain any illegal character
///
/// Returns the first offending character. The wildcard is never illegal.
pub fn legal_characters(illegal: &[char], value: &str) -> Result<(), char> {
    match value
        .chars()
        .find(|c| *c != WILDCARD && illegal.contains(c))
    {
        Some(c) => Err(c),
        None => Ok(()),
    }
}
