//! Error types for txstat.
//!
//! Every failure is fatal to the run: nothing is retried or recovered
//! locally. The variants mirror the failure modes of the pipeline stages:
//! unreadable input, malformed rows, a segment label that never occurred,
//! and invalid configuration.

use thiserror::Error;

/// Result type alias for txstat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Input file could not be opened or read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A row of the transaction log did not parse.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A configured segment label was absent from the data.
    #[error("segment {0:?} not present in input")]
    MissingSegment(String),

    /// Configuration failed validation or could not be loaded.
    #[error("invalid config: {0}")]
    Config(String),

    /// The report payload could not be serialized.
    #[error("report serialization failed: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_line_number() {
        let err = Error::Parse {
            line: 17,
            message: "expected 4 columns, got 3".into(),
        };
        assert_eq!(err.to_string(), "parse error at line 17: expected 4 columns, got 3");
    }

    #[test]
    fn missing_segment_names_the_label() {
        let err = Error::MissingSegment("AF".into());
        assert!(err.to_string().contains("\"AF\""));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
