//! Capabilities a parsed statistical file must expose.
//!
//! Row indices are 1-based throughout, matching how observations are numbered
//! in the data section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::{Measure, VariableKind};

/// A value label declared on a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCategory {
    /// Category key as stored in the value-label table.
    pub code: String,
    #[serde(default)]
    pub label: String,
    /// Raw numeric value, meaningful for numeric variables.
    #[serde(default)]
    pub numeric_value: f64,
    /// Raw string value, meaningful for string variables.
    #[serde(default)]
    pub string_value: String,
}

impl SourceCategory {
    pub fn numeric(value: f64, label: impl Into<String>) -> Self {
        Self {
            code: value.to_string(),
            label: label.into(),
            numeric_value: value,
            string_value: String::new(),
        }
    }

    pub fn string(value: impl Into<String>, label: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            code: value.clone(),
            label: label.into(),
            numeric_value: f64::NAN,
            string_value: value,
        }
    }
}

/// Variable descriptor and cell access of a parsed source file.
pub trait SourceVariable {
    /// Variable name, unique within the file.
    fn name(&self) -> &str;

    fn label(&self) -> Option<&str>;

    fn kind(&self) -> VariableKind;

    /// Declared display width.
    fn width(&self) -> u32;

    /// Declared number of decimals.
    fn decimals(&self) -> u32;

    /// Short (8 character) name.
    fn short_name(&self) -> &str;

    fn measure(&self) -> Measure;

    /// Format specification such as `F8.2` or `A20`.
    fn format(&self) -> String {
        format_code(self.kind(), self.width(), self.decimals())
    }

    /// Value labels in declaration order.
    fn categories(&self) -> &[SourceCategory];

    /// Whether `value` is a declared missing-value code of a numeric variable.
    fn is_numeric_missing_code(&self, value: f64) -> bool;

    /// Whether `value` is a declared missing-value code of a string variable.
    fn is_string_missing_code(&self, value: &str) -> bool;

    /// Number of observation rows.
    fn observation_count(&self) -> usize;

    /// Raw double stored at `row`. System-missing is NaN.
    fn numeric_value(&self, row: usize) -> Result<f64>;

    /// Cell at `row` rendered with the variable's display format.
    fn formatted_value(&self, row: usize) -> Result<String>;

    fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }
}

/// A parsed statistical file with separately loaded metadata and data sections.
pub trait SourceFile {
    type Variable: SourceVariable;

    /// File name used in diagnostics.
    fn file_name(&self) -> &str;

    fn variable_count(&self) -> usize;

    fn variable(&self, index: usize) -> Option<&Self::Variable>;

    fn is_metadata_loaded(&self) -> bool;

    fn load_metadata(&mut self) -> Result<()>;

    fn is_data_loaded(&self) -> bool;

    fn load_data(&mut self) -> Result<()>;

    /// Last modification time of the underlying file.
    fn last_modified(&self) -> Result<DateTime<Utc>>;

    /// Release the underlying handle.
    fn close(&mut self) -> Result<()>;
}

/// Build a format specification from kind, width and decimals.
pub fn format_code(kind: VariableKind, width: u32, decimals: u32) -> String {
    match kind {
        VariableKind::String => format!("A{width}"),
        VariableKind::Numeric(format) if decimals > 0 => {
            format!("{}{width}.{decimals}", format.code())
        }
        VariableKind::Numeric(format) => format!("{}{width}", format.code()),
    }
}
