use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical value type of a table variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Integer,
    Decimal,
    Date,
    DateTime,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
            ValueType::DateTime => "datetime",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Decimal)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, optionally namespaced and localized, metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
    pub locale: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            value: value.into(),
            locale: None,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.map(str::to_string);
        self
    }

    fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }
}

/// A category (value label) of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// True when the category value is a declared missing-value code.
    pub missing: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            missing: false,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.matches(None, "label"))
            .map(|attr| attr.value.as_str())
    }
}

/// Descriptive metadata of one table variable.
///
/// Built once when the table is initialised and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub entity_type: String,
    /// Dense position among the table variables (identifier variable excluded).
    pub index: usize,
    /// Position of the backing variable in the source file.
    pub source_position: usize,
    pub attributes: Vec<Attribute>,
    pub categories: Vec<Category>,
    pub repeatable: bool,
    pub occurrence_group: Option<String>,
}

impl VariableDescriptor {
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            entity_type: entity_type.into(),
            index: 0,
            source_position: 0,
            attributes: Vec::new(),
            categories: Vec::new(),
            repeatable: false,
            occurrence_group: None,
        }
    }

    /// Look up an attribute by namespace and name.
    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| attr.matches(namespace, name))
    }

    pub fn label(&self) -> Option<&str> {
        self.attribute(None, "label").map(|attr| attr.value.as_str())
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.name == name)
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }
}
