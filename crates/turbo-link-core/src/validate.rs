//! Field-level checks used by the mail validation pipeline.
//!
//! Each helper raises [`CoreError::Validation`] naming the offending field.

use crate::{CoreError, Result};

/// Fails unless `value` holds at least one character.
pub fn require_non_empty_string(value: &str, field_name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CoreError::validation(format!(
            "{} must be a non empty string",
            field_name
        )));
    }
    Ok(())
}

/// Fails unless `values` holds at least one element.
pub fn require_non_empty_array<T>(values: &[T], field_name: &str) -> Result<()> {
    if values.is_empty() {
        return Err(CoreError::validation(format!(
            "{} must be a non empty array",
            field_name
        )));
    }
    Ok(())
}
