//! Error types for the dq-guard validation engine.
//!
//! All fallible operations return [`DqError`]. Configuration problems (a suite
//! that references a column the dataset lacks, an unknown rule kind, a pattern
//! that does not compile) are fatal and surface immediately. Malformed cell
//! values are never errors: rules count them as unexpected rows instead.

use thiserror::Error;

/// The main error type for dq-guard.
#[derive(Error, Debug)]
pub enum DqError {
    /// A suite references a column that is not part of the dataset.
    #[error("Column '{column}' not found in dataset (available: {available})")]
    UnknownColumn {
        /// The column the expectation asked for
        column: String,
        /// Comma separated list of the dataset's columns
        available: String,
    },

    /// A suite definition names a rule kind the engine does not know.
    #[error("Unsupported rule kind '{kind}'")]
    UnsupportedRuleKind { kind: String },

    /// A column has an Arrow type that no rule can read.
    #[error("Column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    /// A `MatchesPattern` expectation carries a regex that does not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A `Between` expectation whose bounds cannot be satisfied.
    #[error("Invalid bounds for column '{column}': {message}")]
    InvalidBounds { column: String, message: String },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A persisted artifact that the caller required is absent.
    #[error("Artifact not found: {path}")]
    MissingArtifact { path: String },

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, DqError>`.
pub type Result<T> = std::result::Result<T, DqError>;

impl DqError {
    /// Creates an unknown column error listing the columns that do exist.
    pub fn unknown_column<I, S>(column: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available = available
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownColumn {
            column: column.into(),
            available,
        }
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates an invalid bounds error.
    pub fn invalid_bounds(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBounds {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors the caller must fix in the suite or dataset.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumn { .. }
                | Self::UnsupportedRuleKind { .. }
                | Self::UnsupportedColumnType { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidBounds { .. }
                | Self::Configuration(_)
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<DqError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                DqError::Internal(inner) => DqError::Internal(format!("{msg}: {inner}")),
                other => DqError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unknown_column_lists_available() {
        let err = DqError::unknown_column("Price", ["Item", "Quantity"]);
        assert_eq!(
            err.to_string(),
            "Column 'Price' not found in dataset (available: Item, Quantity)"
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = DqError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_data_source_error() {
        let err = DqError::data_source("CSV", "Invalid file format");
        assert_eq!(err.to_string(), "Data source error: Invalid file format");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_missing_artifact_is_not_configuration() {
        let err = DqError::MissingArtifact {
            path: "results.json".to_string(),
        };
        assert_eq!(err.to_string(), "Artifact not found: results.json");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(DqError::Internal("Something went wrong".to_string()))
        }

        let err = failing_operation()
            .context("During suite evaluation")
            .unwrap_err();
        assert!(err.to_string().contains("During suite evaluation"));
        assert!(err.to_string().contains("Something went wrong"));
    }
}
