//! Error types for table adaptation.

use sav_model::SourceError;
use thiserror::Error;

/// A name, label or category contains a non-printable character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("string contains a non-printable character: {value:?}")]
pub struct InvalidCharacterError {
    /// The offending text, unmodified.
    pub value: String,
}

/// Why a single cell could not be converted.
#[derive(Debug, Error)]
pub enum ConversionCause {
    /// The source failed to produce the cell.
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("unparsable date '{raw}'")]
    Date { raw: String },

    #[error("unparsable date-time '{raw}'")]
    DateTime { raw: String },

    #[error("'{raw}' is not an integer")]
    Integer { raw: String },

    #[error("'{raw}' is not a decimal number")]
    Decimal { raw: String },
}

/// A cell of a variable could not be converted to its canonical value.
#[derive(Debug, Error)]
#[error("failed to convert value of variable '{variable}' at row {row}: {cause}")]
pub struct ValueConversionError {
    pub variable: String,
    pub row: usize,
    #[source]
    pub cause: ConversionCause,
}

/// Errors raised while adapting a source file into a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The metadata section could not be loaded.
    #[error("failed to load metadata in file {file}")]
    MetadataLoad {
        file: String,
        #[source]
        source: SourceError,
    },

    /// The data section could not be loaded.
    #[error("failed to load data in file {file}")]
    DataLoad {
        file: String,
        #[source]
        source: SourceError,
    },

    /// The identifier variable is blank at some row.
    #[error("empty entity identifier found in variable '{variable}' at row {row}")]
    EmptyIdentifier { variable: String, row: usize },

    #[error(transparent)]
    InvalidCharacter(#[from] InvalidCharacterError),

    #[error(transparent)]
    ValueConversion(#[from] ValueConversionError),

    /// A variable descriptor could not be built.
    ///
    /// `position` is 1-based and counts the identifier variable's slot.
    #[error("failed to create variable '{variable}' at position {position}")]
    VariableDescriptor {
        variable: String,
        position: usize,
        #[source]
        source: InvalidCharacterError,
    },

    /// The configured identifier variable does not exist.
    #[error("identifier variable '{name}' not found in file {file}")]
    UnknownIdentifierVariable { name: String, file: String },

    /// The file declares no variables, so there is no identifier column.
    #[error("file {file} has no variables")]
    NoVariables { file: String },

    /// No value set exists for the entity.
    #[error("no value set for entity {entity}")]
    UnknownEntity { entity: String },

    /// A descriptor does not point at a variable of this table's file.
    #[error("variable '{name}' does not belong to table {table}")]
    UnknownVariable { name: String, table: String },

    /// The file timestamp could not be read.
    #[error("failed to read timestamps of file {file}")]
    Timestamp {
        file: String,
        #[source]
        source: SourceError,
    },

    /// The table was used after disposal.
    #[error("table {table} has been disposed")]
    Disposed { table: String },
}

pub type Result<T> = std::result::Result<T, TableError>;
