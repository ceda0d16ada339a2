//! Error types for proxymesh

use thiserror::Error;

/// Main error type for proxymesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh handed to an operation cannot be processed at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for proxymesh operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error was raised by input or parameter validation,
    /// i.e. before any mesh was modified.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::InvalidParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("reduction percentage 120 is outside [0, 100]".into());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: reduction percentage 120 is outside [0, 100]"
        );
        assert!(err.is_validation());

        let err = Error::UnsupportedFormat("stl".into());
        assert!(!err.is_validation());
    }
}
