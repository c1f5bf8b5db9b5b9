use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// A canonical, typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (system-missing number or blank cell).
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Renders the canonical string form; `Null` renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// Value of one variable for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Single(Value),
    /// One value per occurrence row, in row order.
    Sequence(Vec<Value>),
}

impl VariableValue {
    pub fn is_sequence(&self) -> bool {
        matches!(self, VariableValue::Sequence(_))
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Single(value) => write!(f, "{value}"),
            VariableValue::Sequence(values) => {
                write!(f, "[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Decimal(1.5).to_string(), "1.5");
        let date = NaiveDate::from_ymd_opt(1990, 10, 28).unwrap();
        assert_eq!(Value::Date(date).to_string(), "1990-10-28");
        let datetime = date.and_hms_opt(13, 5, 0).unwrap();
        assert_eq!(Value::DateTime(datetime).to_string(), "1990-10-28T13:05:00");
    }

    #[test]
    fn sequence_display() {
        let value = VariableValue::Sequence(vec![Value::Integer(1), Value::Null, Value::Integer(3)]);
        assert_eq!(value.to_string(), "[1, , 3]");
        assert!(value.is_sequence());
    }
}
