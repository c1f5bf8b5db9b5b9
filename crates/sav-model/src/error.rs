use thiserror::Error;

/// Errors raised by a source file implementation.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content could not be parsed.
    #[error("invalid source file: {message}")]
    InvalidFormat { message: String },

    /// The metadata section has not been loaded yet.
    #[error("metadata section is not loaded")]
    MetadataNotLoaded,

    /// The data section has not been loaded yet.
    #[error("data section is not loaded")]
    DataNotLoaded,

    /// Row index outside `1..=count`.
    #[error("row {row} out of range (1..={count})")]
    RowOutOfRange { row: usize, count: usize },

    /// A numeric read hit a text cell.
    #[error("cell at row {row} is not numeric: '{raw}'")]
    NotNumeric { row: usize, raw: String },

    /// The source handle was already closed.
    #[error("source file is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::invalid_format("bad header");
        assert_eq!(format!("{err}"), "invalid source file: bad header");

        let err = SourceError::RowOutOfRange { row: 7, count: 5 };
        assert_eq!(format!("{err}"), "row 7 out of range (1..=5)");
    }
}
