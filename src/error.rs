//! Error types for trueno-chart operations.
//!
//! Computations over chart data are total: degenerate or malformed data yields
//! degenerate output, never an error. Errors are reserved for structural misuse
//! (reading chart state outside a provider) and for the configuration surface.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-chart operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Chart state was read outside of a [`ChartProvider`](crate::state::ChartProvider) scope.
    #[error("chart state must be read within a ChartProvider render scope")]
    MissingProvider,

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_provider_display() {
        let err = Error::MissingProvider;
        assert!(err.to_string().contains("ChartProvider"));
    }

    #[test]
    fn test_config_parse_includes_line() {
        let err = Error::ConfigParse { line: 4, message: "invalid type".to_string() };
        let display = err.to_string();
        assert!(display.contains("line 4"));
        assert!(display.contains("invalid type"));
    }

    #[test]
    fn test_scale_domain() {
        let err = Error::ScaleDomain("Log scale domain must be positive".to_string());
        assert!(err.to_string().contains("positive"));
    }
}
