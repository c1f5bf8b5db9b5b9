//! Entity resolution over the identifier column.

use sav_model::{Entity, EntityIndex, SourceVariable};
use tracing::debug;

use crate::convert::convert;
use crate::error::{Result, TableError};

/// Entities of a table and the rows each one occupies.
#[derive(Debug, Clone, Default)]
pub struct EntityResolution {
    /// Entities in order of first appearance.
    pub entities: Vec<Entity>,
    pub index: EntityIndex,
    /// True when some identifier occurs on more than one row.
    pub multiline: bool,
}

impl EntityResolution {
    pub fn rows(&self, identifier: &str) -> Option<&[usize]> {
        self.index.rows(identifier)
    }
}

/// Scan the identifier column once, in row order.
///
/// A blank identifier stops the scan and nothing is returned.
pub fn resolve<V>(id_variable: &V, entity_type: &str) -> Result<EntityResolution>
where
    V: SourceVariable + ?Sized,
{
    let mut index = EntityIndex::new();
    let rows = id_variable.observation_count();

    for row in 1..=rows {
        let converted = convert(id_variable, row)?;
        let identifier = converted.trim();
        if identifier.is_empty() {
            return Err(TableError::EmptyIdentifier {
                variable: id_variable.name().to_string(),
                row,
            });
        }
        index.record(identifier, row);
    }

    let resolution = EntityResolution {
        entities: index
            .identifiers()
            .map(|identifier| Entity::new(entity_type, identifier))
            .collect(),
        multiline: index.has_repeats(),
        index,
    };

    debug!(
        variable = id_variable.name(),
        rows,
        entities = resolution.entities.len(),
        multiline = resolution.multiline,
        "Resolved entities"
    );
    Ok(resolution)
}
