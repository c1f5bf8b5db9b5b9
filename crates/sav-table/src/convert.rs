//! Cell conversion from source representation to canonical values.
//!
//! Plain numeric formats are read as raw doubles, so display formatting such as
//! currency symbols or thousands separators never reaches the table. Date formats
//! are read as their display token and re-emitted in ISO 8601 extended form.
//!
//! System-missing numbers become the empty string. A date token that cannot be
//! parsed is an error rather than an absent value.

use chrono::{NaiveDate, NaiveDateTime};

use sav_model::{NumericFormat, SourceVariable, Value, ValueType, VariableKind};

use crate::error::{ConversionCause, ValueConversionError};

/// `ADATE`: `mm/dd/yy` and `mm/dd/yyyy`. Two-digit years are tried first since
/// `%Y` also accepts two digits.
const ADATE_PATTERNS: &[&str] = &["%m/%d/%y", "%m/%d/%Y"];

/// `DATE`: `dd-MMM-yy`, `dd-MMM-yyyy` and the blank/slash separated variants.
const DATE_PATTERNS: &[&str] = &[
    "%d-%b-%y", "%d-%b-%Y", "%d %b %y", "%d %b %Y", "%d/%b/%y", "%d/%b/%Y",
];

/// `DATETIME`: `dd-MMM-yyyy hh:mm[:ss[.fff]]`.
const DATETIME_PATTERNS: &[&str] = &[
    "%d-%b-%y %H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S%.f",
    "%d-%b-%y %H:%M",
    "%d-%b-%Y %H:%M",
];

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Convert the cell at `row` (1-based) to its canonical string, possibly empty.
pub fn convert<V>(variable: &V, row: usize) -> Result<String, ValueConversionError>
where
    V: SourceVariable + ?Sized,
{
    convert_cell(variable, row).map_err(|cause| ValueConversionError {
        variable: variable.name().to_string(),
        row,
        cause,
    })
}

/// Convert the cell at `row` and type it as `value_type`.
pub fn convert_typed<V>(
    variable: &V,
    value_type: ValueType,
    row: usize,
) -> Result<Value, ValueConversionError>
where
    V: SourceVariable + ?Sized,
{
    convert_cell(variable, row)
        .and_then(|canonical| typed_value(value_type, &canonical))
        .map_err(|cause| ValueConversionError {
            variable: variable.name().to_string(),
            row,
            cause,
        })
}

fn convert_cell<V>(variable: &V, row: usize) -> Result<String, ConversionCause>
where
    V: SourceVariable + ?Sized,
{
    let kind = variable.kind();
    if let VariableKind::Numeric(format) = kind
        && format.is_plain()
    {
        let value = variable.numeric_value(row)?;
        return Ok(if value.is_nan() {
            String::new()
        } else {
            value.to_string()
        });
    }
    let raw = variable.formatted_value(row)?;
    convert_formatted(kind, raw)
}

/// Convert a display-formatted cell.
///
/// Blank cells and string variables are returned unchanged.
pub fn convert_formatted(kind: VariableKind, raw: String) -> Result<String, ConversionCause> {
    let format = match kind {
        VariableKind::String => return Ok(raw),
        VariableKind::Numeric(format) => format,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(raw);
    }
    match format {
        NumericFormat::ADate => parse_date(trimmed, ADATE_PATTERNS)
            .map(|date| date.format(ISO_DATE).to_string()),
        NumericFormat::Date => {
            parse_date(trimmed, DATE_PATTERNS).map(|date| date.format(ISO_DATE).to_string())
        }
        NumericFormat::DateTime => {
            parse_datetime(trimmed).map(|datetime| datetime.format(ISO_DATETIME).to_string())
        }
        NumericFormat::Comma
        | NumericFormat::Dollar
        | NumericFormat::Dot
        | NumericFormat::Fixed
        | NumericFormat::Scientific
        | NumericFormat::Time
        | NumericFormat::Other => Ok(raw),
    }
}

fn parse_date(token: &str, patterns: &[&str]) -> Result<NaiveDate, ConversionCause> {
    patterns
        .iter()
        .find_map(|pattern| NaiveDate::parse_from_str(token, pattern).ok())
        .ok_or_else(|| ConversionCause::Date {
            raw: token.to_string(),
        })
}

fn parse_datetime(token: &str) -> Result<NaiveDateTime, ConversionCause> {
    DATETIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(token, pattern).ok())
        .ok_or_else(|| ConversionCause::DateTime {
            raw: token.to_string(),
        })
}

/// Type a canonical string. Blank input is [`Value::Null`].
pub fn typed_value(value_type: ValueType, canonical: &str) -> Result<Value, ConversionCause> {
    let trimmed = canonical.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    match value_type {
        ValueType::Text => Ok(Value::Text(canonical.to_string())),
        ValueType::Integer => parse_integer(trimmed).map(Value::Integer),
        ValueType::Decimal => trimmed
            .parse::<f64>()
            .map(Value::Decimal)
            .map_err(|_| ConversionCause::Decimal {
                raw: trimmed.to_string(),
            }),
        ValueType::Date => NaiveDate::parse_from_str(trimmed, ISO_DATE)
            .map(Value::Date)
            .map_err(|_| ConversionCause::Date {
                raw: trimmed.to_string(),
            }),
        ValueType::DateTime => NaiveDateTime::parse_from_str(trimmed, ISO_DATETIME)
            .map(Value::DateTime)
            .map_err(|_| ConversionCause::DateTime {
                raw: trimmed.to_string(),
            }),
    }
}

fn parse_integer(raw: &str) -> Result<i64, ConversionCause> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    // Raw doubles of whole numbers may carry an exponent.
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        _ => Err(ConversionCause::Integer {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Cell, MemoryVariable};

    fn numeric(format: NumericFormat, cells: Vec<Cell>) -> MemoryVariable {
        MemoryVariable::numeric("V", format).with_cells(cells)
    }

    #[test]
    fn plain_numeric_uses_raw_double() {
        let var = numeric(
            NumericFormat::Dollar,
            vec![Cell::Number(1234.5), Cell::Number(3.0), Cell::Missing],
        );
        assert_eq!(convert(&var, 1).unwrap(), "1234.5");
        assert_eq!(convert(&var, 2).unwrap(), "3");
        assert_eq!(convert(&var, 3).unwrap(), "");
    }

    #[test]
    fn nan_is_empty_not_error() {
        let var = numeric(NumericFormat::Fixed, vec![Cell::Number(f64::NAN)]);
        assert_eq!(convert(&var, 1).unwrap(), "");
    }

    #[test]
    fn adate_and_date_tokens() {
        assert_eq!(
            convert_formatted(
                VariableKind::Numeric(NumericFormat::ADate),
                "10/28/1990".to_string()
            )
            .unwrap(),
            "1990-10-28"
        );
        assert_eq!(
            convert_formatted(
                VariableKind::Numeric(NumericFormat::ADate),
                "02/03/04".to_string()
            )
            .unwrap(),
            "2004-02-03"
        );
        assert_eq!(
            convert_formatted(
                VariableKind::Numeric(NumericFormat::Date),
                " 28-OCT-1990 ".to_string()
            )
            .unwrap(),
            "1990-10-28"
        );
    }

    #[test]
    fn datetime_tokens() {
        let kind = VariableKind::Numeric(NumericFormat::DateTime);
        assert_eq!(
            convert_formatted(kind, "28-OCT-1990 13:05:09".to_string()).unwrap(),
            "1990-10-28T13:05:09"
        );
        assert_eq!(
            convert_formatted(kind, "28-OCT-1990 13:05".to_string()).unwrap(),
            "1990-10-28T13:05:00"
        );
        assert_eq!(
            convert_formatted(kind, "28-OCT-1990 13:05:09.25".to_string()).unwrap(),
            "1990-10-28T13:05:09.250"
        );
    }

    #[test]
    fn malformed_date_is_an_error() {
        let var = MemoryVariable::numeric("DOB", NumericFormat::Date)
            .with_cells(vec![Cell::Text("31-FOO-2001".to_string())]);
        let err = convert(&var, 1).unwrap_err();
        assert_eq!(err.variable, "DOB");
        assert_eq!(err.row, 1);
        assert!(matches!(err.cause, ConversionCause::Date { .. }));
    }

    #[test]
    fn blank_and_string_values_pass_through() {
        let kind = VariableKind::Numeric(NumericFormat::Date);
        assert_eq!(convert_formatted(kind, "   ".to_string()).unwrap(), "   ");
        assert_eq!(
            convert_formatted(VariableKind::String, "10/28/1990 ".to_string()).unwrap(),
            "10/28/1990 "
        );
        let time = VariableKind::Numeric(NumericFormat::Time);
        assert_eq!(convert_formatted(time, "13:05".to_string()).unwrap(), "13:05");
    }

    #[test]
    fn typed_values() {
        assert_eq!(typed_value(ValueType::Integer, "3").unwrap(), Value::Integer(3));
        assert_eq!(typed_value(ValueType::Integer, "1e3").unwrap(), Value::Integer(1000));
        assert!(typed_value(ValueType::Integer, "3.5").is_err());
        assert_eq!(typed_value(ValueType::Decimal, "2.25").unwrap(), Value::Decimal(2.25));
        assert_eq!(typed_value(ValueType::Date, "").unwrap(), Value::Null);
        assert_eq!(
            typed_value(ValueType::Date, "1990-10-28").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(1990, 10, 28).unwrap())
        );
        assert_eq!(
            typed_value(ValueType::Text, "abc").unwrap(),
            Value::Text("abc".to_string())
        );
    }
}
