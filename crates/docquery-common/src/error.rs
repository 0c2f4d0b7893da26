//! Error types for docquery

use thiserror::Error;

/// Result type alias for docquery operations
pub type Result<T> = std::result::Result<T, DocQueryError>;

/// Unified error type for all docquery operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocQueryError {
    // Translation errors. Raised before anything reaches the wire.

    /// A field path does not exist on the declared entity schema
    #[error("Unresolved field '{path}' on entity '{entity}'")]
    UnresolvedField { path: String, entity: String },

    /// Two predicates on the same path cannot share one filter document
    #[error("Conflicting predicates on '{path}'")]
    ConflictingPredicate { path: String },

    /// `$in` / `$nin` / `$all` given no values
    #[error("Empty value set for {operator} on '{path}'")]
    EmptySet { path: String, operator: &'static str },

    /// Server process could not be launched
    #[error("Launch error: {0}")]
    Launch(String),

    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection timeout - retryable
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocQueryError {
    /// Returns true if this error is potentially retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DocQueryError::Connection(_) | DocQueryError::Timeout(_)
        )
    }

    /// Returns true if the query was rejected during translation
    pub fn is_translation_error(&self) -> bool {
        matches!(
            self,
            DocQueryError::UnresolvedField { .. }
                | DocQueryError::ConflictingPredicate { .. }
                | DocQueryError::EmptySet { .. }
        )
    }
}

impl From<std::io::Error> for DocQueryError {
    fn from(err: std::io::Error) -> Self {
        DocQueryError::Internal(format!("I/O error: {}", err))
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for DocQueryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } => DocQueryError::Timeout(err.to_string()),
            ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
                DocQueryError::Connection(err.to_string())
            }
            _ => DocQueryError::MongoDB(err.to_string()),
        }
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::ser::Error> for DocQueryError {
    fn from(err: bson::ser::Error) -> Self {
        DocQueryError::Serialization(format!("BSON serialization error: {}", err))
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::de::Error> for DocQueryError {
    fn from(err: bson::de::Error) -> Self {
        DocQueryError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unresolved_field() {
        let err = DocQueryError::UnresolvedField {
            path: "Statistics.Likes".to_string(),
            entity: "Post".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unresolved field 'Statistics.Likes' on entity 'Post'"
        );
    }

    #[test]
    fn test_error_display_conflicting_predicate() {
        let err = DocQueryError::ConflictingPredicate {
            path: "Title".to_string(),
        };
        assert_eq!(err.to_string(), "Conflicting predicates on 'Title'");
    }

    #[test]
    fn test_error_display_empty_set() {
        let err = DocQueryError::EmptySet {
            path: "Tags".to_string(),
            operator: "$in",
        };
        assert_eq!(err.to_string(), "Empty value set for $in on 'Tags'");
    }

    #[test]
    fn test_error_display_launch() {
        let err = DocQueryError::Launch("mongod not found".to_string());
        assert_eq!(err.to_string(), "Launch error: mongod not found");
    }

    #[test]
    fn test_error_display_connection() {
        let err = DocQueryError::Connection("timeout".to_string());
        assert_eq!(err.to_string(), "Connection error: timeout");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DocQueryError = io_err.into();
        assert!(matches!(err, DocQueryError::Internal(_)));
    }

    #[test]
    fn test_is_retryable() {
        assert!(DocQueryError::Connection("test".to_string()).is_retryable());
        assert!(DocQueryError::Timeout("test".to_string()).is_retryable());
        assert!(!DocQueryError::Launch("test".to_string()).is_retryable());
        assert!(!DocQueryError::Query("test".to_string()).is_retryable());
        assert!(!DocQueryError::ConflictingPredicate {
            path: "a".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_is_translation_error() {
        assert!(DocQueryError::EmptySet {
            path: "Tags".to_string(),
            operator: "$nin"
        }
        .is_translation_error());
        assert!(DocQueryError::UnresolvedField {
            path: "x".to_string(),
            entity: "Post".to_string()
        }
        .is_translation_error());
        assert!(!DocQueryError::MongoDB("boom".to_string()).is_translation_error());
    }
}
