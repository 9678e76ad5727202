//! Error types for the crate

use thiserror::Error;

/// Main error type returned by client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unit conversion error
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// Query construction or validation error
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Store collaborator error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal contract violation
    ///
    /// Indicates a programming error (for example a sample type that does not
    /// resolve to a quantity-valued category), not a recoverable condition.
    #[error("Precondition violated: {0}")]
    Precondition(String),
}

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// No known linear factor relates the two units
    #[error("Incompatible units: cannot convert {from} to {to}")]
    Incompatible {
        /// Source unit identifier
        from: String,
        /// Target unit identifier
        to: String,
    },
}

/// Query construction and validation errors
///
/// All variants are raised at construction time, never during bucket
/// iteration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Aggregation queries require both time bounds
    #[error("Aggregation query requires both start and end time")]
    MissingTimeRange,

    /// Time range validation failed
    #[error("Invalid time range: start {start} > end {end}")]
    InvalidTimeRange {
        /// Start instant (RFC 3339)
        start: String,
        /// End instant (RFC 3339)
        end: String,
    },

    /// Aggregation mode identifier not in the registry
    #[error("Unsupported aggregation mode: {0}")]
    UnsupportedAggregation(String),

    /// A query parameter is malformed
    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter {
        /// Parameter name
        field: String,
        /// Description of the problem
        message: String,
    },
}

/// Errors reported by the store collaborator
///
/// The core never retries; these surface to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store failed to execute the underlying query
    #[error("Store execution failed: {0}")]
    Execution(String),

    /// The store rejected the operation for lack of authorization
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store is not reachable or not initialized
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store dropped the completion without resolving it
    #[error("Store completion dropped without resolution")]
    CompletionDropped,

    /// The store resolved the same completion more than once
    #[error("Store resolved a completion more than once")]
    DoubleResolution,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(UnitError::Incompatible {
            from: "kcal".to_string(),
            to: "m".to_string(),
        });
        let display = format!("{}", err);
        assert!(display.contains("kcal"));
        assert!(display.contains("m"));
    }

    #[test]
    fn test_query_error_conversion() {
        let err: Error = QueryError::MissingTimeRange.into();
        assert!(matches!(err, Error::Query(QueryError::MissingTimeRange)));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Execution("database handle closed".to_string());
        assert!(err.to_string().contains("database handle closed"));
    }
}
