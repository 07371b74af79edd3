//! Prelude for commonly used types and traits in dq-guard.

pub use crate::core::{Expectation, ExpectationSuite, ValidationEngine, ValidationReport};
pub use crate::error::{DqError, ErrorContext, Result};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::sources::DataSource;
