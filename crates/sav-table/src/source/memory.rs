//! In-memory source file.
//!
//! Holds variable descriptors and cells that were parsed elsewhere. Numeric cells
//! of date and time variables are rendered the way the statistical package
//! displays them: seconds since 1582-10-14 in the variable's display format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use sav_model::{
    Measure, NumericFormat, SourceCategory, SourceError, SourceFile, SourceVariable, VariableKind,
};

/// A raw cell of the data section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    /// System-missing.
    Missing,
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// User-missing value declaration of a variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingValues {
    #[default]
    None,
    /// Up to three discrete numeric codes.
    Discrete { values: Vec<f64> },
    /// An inclusive numeric range.
    Range { low: f64, high: f64 },
    /// An inclusive numeric range plus one discrete code.
    RangeAndValue { low: f64, high: f64, value: f64 },
    /// Discrete string codes.
    Strings { values: Vec<String> },
}

impl MissingValues {
    pub fn is_numeric_missing(&self, value: f64) -> bool {
        match self {
            MissingValues::Discrete { values } => values.contains(&value),
            MissingValues::Range { low, high } => (*low..=*high).contains(&value),
            MissingValues::RangeAndValue {
                low,
                high,
                value: code,
            } => (*low..=*high).contains(&value) || *code == value,
            MissingValues::None | MissingValues::Strings { .. } => false,
        }
    }

    /// String codes compare without trailing blanks.
    pub fn is_string_missing(&self, value: &str) -> bool {
        match self {
            MissingValues::Strings { values } => values
                .iter()
                .any(|code| code.trim_end() == value.trim_end()),
            _ => false,
        }
    }
}

fn default_width() -> u32 {
    8
}

/// A variable with its column of cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryVariable {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub kind: VariableKind,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub decimals: u32,
    /// Defaults to the first eight characters of the name.
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub measure: Measure,
    #[serde(default)]
    pub categories: Vec<SourceCategory>,
    #[serde(default)]
    pub missing: MissingValues,
    #[serde(skip)]
    cells: Vec<Cell>,
}

impl MemoryVariable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            width: default_width(),
            decimals: 0,
            short_name: None,
            measure: Measure::default(),
            categories: Vec::new(),
            missing: MissingValues::default(),
            cells: Vec::new(),
        }
    }

    pub fn numeric(name: impl Into<String>, format: NumericFormat) -> Self {
        Self::new(name, VariableKind::Numeric(format))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::String)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: u32, decimals: u32) -> Self {
        self.width = width;
        self.decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: SourceCategory) -> Self {
        self.categories.push(category);
        self
    }

    #[must_use]
    pub fn with_missing(mut self, missing: MissingValues) -> Self {
        self.missing = missing;
        self
    }

    #[must_use]
    pub fn with_cells(mut self, cells: Vec<Cell>) -> Self {
        self.cells = cells;
        self
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cell(&self, row: usize) -> sav_model::Result<&Cell> {
        row.checked_sub(1)
            .and_then(|idx| self.cells.get(idx))
            .ok_or(SourceError::RowOutOfRange {
                row,
                count: self.cells.len(),
            })
    }

    fn render_number(&self, value: f64) -> sav_model::Result<String> {
        if value.is_nan() {
            return Ok(String::new());
        }
        let format = match self.kind {
            VariableKind::String => return Ok(value.to_string()),
            VariableKind::Numeric(format) => format,
        };
        let decimals = self.decimals as usize;
        let rendered = match format {
            NumericFormat::ADate => calendar_time(value)?.format("%m/%d/%Y").to_string(),
            NumericFormat::Date => calendar_time(value)?
                .format("%d-%b-%Y")
                .to_string()
                .to_uppercase(),
            NumericFormat::DateTime => calendar_time(value)?
                .format("%d-%b-%Y %H:%M:%S")
                .to_string()
                .to_uppercase(),
            NumericFormat::Time => clock_time(value)?,
            NumericFormat::Scientific => format!("{value:.decimals$E}"),
            NumericFormat::Comma
            | NumericFormat::Dollar
            | NumericFormat::Dot
            | NumericFormat::Fixed
            | NumericFormat::Other => format!("{value:.decimals$}"),
        };
        Ok(rendered)
    }
}

/// Origin of the package's calendar: seconds are counted from this instant.
fn gregorian_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1582, 10, 14)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn calendar_time(seconds: f64) -> sav_model::Result<NaiveDateTime> {
    let millis = (seconds * 1000.0).round();
    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| gregorian_epoch().checked_add_signed(delta))
        .ok_or_else(|| SourceError::invalid_format(format!("date value {seconds} out of range")))
}

fn clock_time(seconds: f64) -> sav_model::Result<String> {
    let rounded = seconds.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(SourceError::invalid_format(format!(
            "time value {seconds} out of range"
        )));
    }
    let total = rounded as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    Ok(format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    ))
}

impl SourceVariable for MemoryVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn kind(&self) -> VariableKind {
        self.kind
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn decimals(&self) -> u32 {
        self.decimals
    }

    fn short_name(&self) -> &str {
        match &self.short_name {
            Some(short) => short,
            None => match self.name.char_indices().nth(8) {
                Some((end, _)) => &self.name[..end],
                None => &self.name,
            },
        }
    }

    fn measure(&self) -> Measure {
        self.measure
    }

    fn categories(&self) -> &[SourceCategory] {
        &self.categories
    }

    fn is_numeric_missing_code(&self, value: f64) -> bool {
        self.missing.is_numeric_missing(value)
    }

    fn is_string_missing_code(&self, value: &str) -> bool {
        self.missing.is_string_missing(value)
    }

    fn observation_count(&self) -> usize {
        self.cells.len()
    }

    fn numeric_value(&self, row: usize) -> sav_model::Result<f64> {
        match self.cell(row)? {
            Cell::Number(value) => Ok(*value),
            Cell::Missing => Ok(f64::NAN),
            Cell::Text(text) if text.trim().is_empty() => Ok(f64::NAN),
            Cell::Text(text) => text.trim().parse().map_err(|_| SourceError::NotNumeric {
                row,
                raw: text.clone(),
            }),
        }
    }

    fn formatted_value(&self, row: usize) -> sav_model::Result<String> {
        match self.cell(row)? {
            Cell::Number(value) => self.render_number(*value),
            Cell::Text(text) => Ok(text.clone()),
            Cell::Missing => Ok(String::new()),
        }
    }
}

/// A source file held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemorySourceFile {
    name: String,
    variables: Vec<MemoryVariable>,
    last_modified: DateTime<Utc>,
    metadata_loaded: bool,
    data_loaded: bool,
    closed: bool,
}

impl MemorySourceFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            last_modified: Utc::now(),
            metadata_loaded: false,
            data_loaded: false,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_variable(mut self, variable: MemoryVariable) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn with_last_modified(mut self, timestamp: DateTime<Utc>) -> Self {
        self.last_modified = timestamp;
        self
    }

    pub fn set_variables(&mut self, variables: Vec<MemoryVariable>) {
        self.variables = variables;
    }

    /// Distribute row-major cells into the variables' columns.
    pub fn set_rows(&mut self, rows: Vec<Vec<Cell>>) -> sav_model::Result<()> {
        let width = self.variables.len();
        for variable in &mut self.variables {
            variable.cells = Vec::with_capacity(rows.len());
        }
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(SourceError::invalid_format(format!(
                    "row {} has {} cells, expected {width}",
                    idx + 1,
                    row.len()
                )));
            }
            for (variable, cell) in self.variables.iter_mut().zip(row) {
                variable.cells.push(cell);
            }
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl SourceFile for MemorySourceFile {
    type Variable = MemoryVariable;

    fn file_name(&self) -> &str {
        &self.name
    }

    fn variable_count(&self) -> usize {
        self.variables.len()
    }

    fn variable(&self, index: usize) -> Option<&MemoryVariable> {
        self.variables.get(index)
    }

    fn is_metadata_loaded(&self) -> bool {
        self.metadata_loaded
    }

    fn load_metadata(&mut self) -> sav_model::Result<()> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        self.metadata_loaded = true;
        Ok(())
    }

    fn is_data_loaded(&self) -> bool {
        self.data_loaded
    }

    fn load_data(&mut self) -> sav_model::Result<()> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        if !self.metadata_loaded {
            return Err(SourceError::MetadataNotLoaded);
        }
        self.data_loaded = true;
        Ok(())
    }

    fn last_modified(&self) -> sav_model::Result<DateTime<Utc>> {
        Ok(self.last_modified)
    }

    fn close(&mut self) -> sav_model::Result<()> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dates_from_gregorian_seconds() {
        // 1990-10-28 is 12_876_451_200 seconds after 1582-10-14.
        let seconds = 12_876_451_200.0;
        let adate = MemoryVariable::numeric("D", NumericFormat::ADate)
            .with_cells(vec![Cell::Number(seconds)]);
        assert_eq!(adate.formatted_value(1).unwrap(), "10/28/1990");

        let date = MemoryVariable::numeric("D", NumericFormat::Date)
            .with_cells(vec![Cell::Number(seconds)]);
        assert_eq!(date.formatted_value(1).unwrap(), "28-OCT-1990");

        let datetime = MemoryVariable::numeric("D", NumericFormat::DateTime)
            .with_cells(vec![Cell::Number(seconds + 3_723.0)]);
        assert_eq!(datetime.formatted_value(1).unwrap(), "28-OCT-1990 01:02:03");
    }

    #[test]
    fn renders_plain_numbers_with_decimals() {
        let var = MemoryVariable::numeric("W", NumericFormat::Fixed)
            .with_width(8, 2)
            .with_cells(vec![Cell::Number(72.5), Cell::Missing]);
        assert_eq!(var.formatted_value(1).unwrap(), "72.50");
        assert_eq!(var.formatted_value(2).unwrap(), "");
        assert!(var.numeric_value(2).unwrap().is_nan());
    }

    #[test]
    fn renders_clock_times() {
        let var = MemoryVariable::numeric("T", NumericFormat::Time)
            .with_cells(vec![Cell::Number(3_723.0), Cell::Number(-61.0)]);
        assert_eq!(var.formatted_value(1).unwrap(), "01:02:03");
        assert_eq!(var.formatted_value(2).unwrap(), "-00:01:01");
    }

    #[test]
    fn out_of_range_time_is_invalid() {
        let var = MemoryVariable::numeric("T", NumericFormat::Time).with_cells(vec![
            Cell::Number(-1e300),
            Cell::Number(1e300),
            Cell::Number(f64::INFINITY),
        ]);
        for row in 1..=3 {
            assert!(matches!(
                var.formatted_value(row),
                Err(SourceError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn row_out_of_range() {
        let var = MemoryVariable::string("S").with_cells(vec![Cell::from("a")]);
        assert!(matches!(
            var.formatted_value(0),
            Err(SourceError::RowOutOfRange { row: 0, count: 1 })
        ));
        assert!(var.formatted_value(2).is_err());
    }

    #[test]
    fn missing_value_declarations() {
        let range = MissingValues::RangeAndValue {
            low: 90.0,
            high: 99.0,
            value: -1.0,
        };
        assert!(range.is_numeric_missing(95.0));
        assert!(range.is_numeric_missing(-1.0));
        assert!(!range.is_numeric_missing(1.0));

        let strings = MissingValues::Strings {
            values: vec!["NA  ".to_string()],
        };
        assert!(strings.is_string_missing("NA"));
        assert!(!strings.is_numeric_missing(0.0));
    }

    #[test]
    fn short_name_defaults_to_prefix() {
        let var = MemoryVariable::string("QUESTIONNAIRE_ITEM");
        assert_eq!(var.short_name(), "QUESTION");
        let var = MemoryVariable::string("AGE");
        assert_eq!(var.short_name(), "AGE");
    }

    #[test]
    fn set_rows_checks_width() {
        let mut file = MemorySourceFile::new("test.sav")
            .with_variable(MemoryVariable::string("ID"))
            .with_variable(MemoryVariable::numeric("AGE", NumericFormat::Fixed));
        file.set_rows(vec![vec![Cell::from("A"), Cell::Number(30.0)]])
            .unwrap();
        assert_eq!(file.variable(1).unwrap().observation_count(), 1);
        assert!(file.set_rows(vec![vec![Cell::from("A")]]).is_err());
    }
}
