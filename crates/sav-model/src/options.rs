//! Configuration options for table adaptation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity type used when none (or a blank one) is configured.
pub const DEFAULT_ENTITY_TYPE: &str = "Participant";

/// Options controlling how a source file is adapted into a table.
///
/// Field names match the JSON parameter object accepted by embedding systems:
///
/// ```
/// use sav_model::TableOptions;
///
/// let options: TableOptions =
///     serde_json::from_str(r#"{"entity_type": "Visit", "locale": "en"}"#).unwrap();
/// assert_eq!(options.entity_type(), "Visit");
/// assert_eq!(options.locale(), Some("en"));
/// assert_eq!(options.id_variable(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Entity type of the table's entities.
    pub entity_type: Option<String>,

    /// Locale tag attached to labels.
    pub locale: Option<String>,

    /// Name of the identifier variable. When unset the first variable is used.
    pub id_variable: Option<String>,

    /// Treat the table as repeated-measures even when no identifier repeats.
    pub multilines: bool,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_id_variable(mut self, name: impl Into<String>) -> Self {
        self.id_variable = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_multilines(mut self, enable: bool) -> Self {
        self.multilines = enable;
        self
    }

    /// Trimmed entity type, [`DEFAULT_ENTITY_TYPE`] when blank.
    pub fn entity_type(&self) -> &str {
        non_blank(self.entity_type.as_deref()).unwrap_or(DEFAULT_ENTITY_TYPE)
    }

    pub fn locale(&self) -> Option<&str> {
        non_blank(self.locale.as_deref())
    }

    pub fn id_variable(&self) -> Option<&str> {
        non_blank(self.id_variable.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Table timestamps. Creation time is not recoverable from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub last_update: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entity_type_defaults() {
        assert_eq!(TableOptions::new().entity_type(), "Participant");
        assert_eq!(
            TableOptions::new().with_entity_type("   ").entity_type(),
            "Participant"
        );
        assert_eq!(
            TableOptions::new().with_entity_type(" Visit ").entity_type(),
            "Visit"
        );
    }

    #[test]
    fn parses_json_parameters() {
        let options: TableOptions = serde_json::from_str(
            r#"{"entity_type": "", "id_variable": "ID", "multilines": true}"#,
        )
        .expect("parse options");
        assert_eq!(options.entity_type(), "Participant");
        assert_eq!(options.id_variable(), Some("ID"));
        assert!(options.multilines);
        assert_eq!(options.locale(), None);
    }
}
