//! Input validation for collection and field names
//!
//! Names reach the server verbatim, so they are checked before a collection
//! handle is created:
//! - Collection names: non-empty, bounded length, no null bytes, no `$`, no
//!   `system.` prefix
//! - Declared field names: non-empty, bounded length, no null bytes, no `$`
//!   prefix, no `.` (dots are path separators)

use crate::Result;
use docquery_common::DocQueryError;
use tracing::warn;

/// Maximum allowed length for collection names (MongoDB limit is 255, we're more conservative)
const MAX_COLLECTION_NAME_LENGTH: usize = 120;

/// Maximum allowed length for field names
const MAX_FIELD_NAME_LENGTH: usize = 1024;

/// Validated collection name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCollectionName {
    name: String,
}

impl ValidatedCollectionName {
    /// Creates a new validated collection name
    ///
    /// # Errors
    /// Returns a validation error if the name is empty, longer than 120
    /// characters, contains null bytes or `$`, or starts with `system.`.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(DocQueryError::Validation(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(DocQueryError::Validation(format!(
                "Collection name exceeds maximum length of {} characters: '{}'",
                MAX_COLLECTION_NAME_LENGTH, name
            )));
        }

        if name.contains('\0') {
            return Err(DocQueryError::Validation(
                "Collection name cannot contain null bytes".to_string(),
            ));
        }

        if name.starts_with("system.") {
            return Err(DocQueryError::Validation(format!(
                "Collection name cannot start with 'system.' (reserved): '{}'",
                name
            )));
        }

        if name.contains('$') {
            return Err(DocQueryError::Validation(format!(
                "Collection name cannot contain '$' character: '{}'",
                name
            )));
        }

        if name.contains("..") || name.contains("//") {
            warn!(collection = %name, "collection name contains suspicious pattern");
        }

        Ok(ValidatedCollectionName {
            name: name.to_string(),
        })
    }

    /// Returns the validated collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl AsRef<str> for ValidatedCollectionName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ValidatedCollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validates a single declared field name (one path segment)
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocQueryError::Validation(
            "Field name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_FIELD_NAME_LENGTH {
        return Err(DocQueryError::Validation(format!(
            "Field name exceeds maximum length of {} characters",
            MAX_FIELD_NAME_LENGTH
        )));
    }

    if name.contains('\0') {
        return Err(DocQueryError::Validation(
            "Field name cannot contain null bytes".to_string(),
        ));
    }

    if name.starts_with('$') {
        return Err(DocQueryError::Validation(format!(
            "Field name cannot start with '$' (reserved for operators): '{}'",
            name
        )));
    }

    if name.contains('.') {
        return Err(DocQueryError::Validation(format!(
            "Field name cannot contain '.' (path separator): '{}'",
            name
        )));
    }

    Ok(())
}
