//! Error types for the lobsynth pipeline.

use thiserror::Error;

/// Core error type shared by every lobsynth crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Not enough snapshots to build a single labeled window
    #[error("Insufficient data: {available} records available, more than {required} required")]
    InsufficientData {
        /// Number of records supplied
        available: usize,
        /// Record count that must be exceeded (sequence length + horizon)
        required: usize,
    },

    /// Two inputs that must be index-aligned have different lengths
    #[error("Length mismatch: {what} ({left} vs {right})")]
    LengthMismatch {
        /// Description of the compared inputs
        what: &'static str,
        /// Length of the first input
        left: usize,
        /// Length of the second input
        right: usize,
    },

    /// Declared counts disagree with the data actually present
    #[error("Size mismatch in {what}: expected {expected}, found {actual}")]
    SizeMismatch {
        /// Which file or section was being read
        what: String,
        /// Size implied by the header or the paired input
        expected: u64,
        /// Size actually present
        actual: u64,
    },

    /// Structurally valid input carrying an invalid value
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("updates_per_second must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: updates_per_second must be positive"
        );
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = Error::InsufficientData {
            available: 15,
            required: 15,
        };
        assert!(err.to_string().contains("Insufficient data"));
        assert!(err.to_string().contains("15"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "features.bin");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(msg) if msg.contains("features.bin")));
    }
}
