use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display format of a numeric source variable.
///
/// The engine treats the five plain formats as raw doubles and the date formats
/// as formatted tokens to be parsed. `Time` and `Other` cover the remaining
/// display formats, which are passed through as formatted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericFormat {
    /// `COMMAw.d`: thousands separated by commas.
    Comma,
    /// `DOLLARw.d`: currency.
    Dollar,
    /// `DOTw.d`: thousands separated by dots.
    Dot,
    /// `Fw.d`: the default numeric format.
    Fixed,
    /// `Ew.d`: scientific notation.
    Scientific,
    /// `ADATEw`: American date, `mm/dd/yyyy`.
    ADate,
    /// `DATEw`: international date, `dd-MMM-yyyy`.
    Date,
    /// `DATETIMEw`: `dd-MMM-yyyy hh:mm:ss`.
    DateTime,
    /// `TIMEw`: time of day or duration.
    Time,
    /// Any other display format (percent, custom currency, ...).
    Other,
}

impl NumericFormat {
    /// Returns true for formats whose cells are read as raw doubles.
    pub fn is_plain(&self) -> bool {
        matches!(
            self,
            NumericFormat::Comma
                | NumericFormat::Dollar
                | NumericFormat::Dot
                | NumericFormat::Fixed
                | NumericFormat::Scientific
        )
    }

    /// Format code prefix as written in a format specification (`F8.2`, `ADATE10`).
    pub fn code(&self) -> &'static str {
        match self {
            NumericFormat::Comma => "COMMA",
            NumericFormat::Dollar => "DOLLAR",
            NumericFormat::Dot => "DOT",
            NumericFormat::Fixed => "F",
            NumericFormat::Scientific => "E",
            NumericFormat::ADate => "ADATE",
            NumericFormat::Date => "DATE",
            NumericFormat::DateTime => "DATETIME",
            NumericFormat::Time => "TIME",
            NumericFormat::Other => "N",
        }
    }
}

impl fmt::Display for NumericFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for NumericFormat {
    type Err = String;

    /// Parse a format code prefix, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMMA" => Ok(NumericFormat::Comma),
            "DOLLAR" => Ok(NumericFormat::Dollar),
            "DOT" => Ok(NumericFormat::Dot),
            "F" | "FIXED" => Ok(NumericFormat::Fixed),
            "E" | "SCIENTIFIC" => Ok(NumericFormat::Scientific),
            "ADATE" => Ok(NumericFormat::ADate),
            "DATE" => Ok(NumericFormat::Date),
            "DATETIME" => Ok(NumericFormat::DateTime),
            "TIME" => Ok(NumericFormat::Time),
            "" => Err("empty format code".to_string()),
            _ => Ok(NumericFormat::Other),
        }
    }
}

/// Storage kind of a source variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "format", rename_all = "lowercase")]
pub enum VariableKind {
    Numeric(NumericFormat),
    String,
}

impl VariableKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, VariableKind::Numeric(_))
    }

    /// Numeric display format, `None` for string variables.
    pub fn numeric_format(&self) -> Option<NumericFormat> {
        match self {
            VariableKind::Numeric(format) => Some(*format),
            VariableKind::String => None,
        }
    }
}

/// Measurement level declared for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Nominal,
    Ordinal,
    Scale,
    #[default]
    Unknown,
}

impl Measure {
    pub fn label(&self) -> &'static str {
        match self {
            Measure::Nominal => "Nominal",
            Measure::Ordinal => "Ordinal",
            Measure::Scale => "Scale",
            Measure::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
