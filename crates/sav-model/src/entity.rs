use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique record of a table, identified by the identifier variable's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: String,
    pub identifier: String,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.identifier)
    }
}

/// Identifier to the 1-based rows where it occurs, in row order.
///
/// Identifiers iterate in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIndex {
    entries: Vec<(String, Vec<usize>)>,
    positions: HashMap<String, usize>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `row` for `identifier`. Returns true when the identifier is new.
    pub fn record(&mut self, identifier: &str, row: usize) -> bool {
        if let Some(&position) = self.positions.get(identifier) {
            self.entries[position].1.push(row);
            return false;
        }
        self.positions
            .insert(identifier.to_string(), self.entries.len());
        self.entries.push((identifier.to_string(), vec![row]));
        true
    }

    pub fn rows(&self, identifier: &str) -> Option<&[usize]> {
        self.positions
            .get(identifier)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any identifier occurs on more than one row.
    pub fn has_repeats(&self) -> bool {
        self.entries.iter().any(|(_, rows)| rows.len() > 1)
    }

    /// Identifiers in order of first appearance.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(identifier, _)| identifier.as_str())
    }
}
