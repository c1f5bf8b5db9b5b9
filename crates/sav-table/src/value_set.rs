//! Per-entity access to converted values.

use sav_model::{Entity, SourceFile, SourceVariable, VariableDescriptor, VariableValue};

use crate::convert::convert_typed;
use crate::error::{Result, TableError};

/// Values of one entity across the table variables.
///
/// Values are converted from the source on every call. Repeated values are
/// not cached.
pub struct ValueSet<'a, S: SourceFile> {
    table: &'a str,
    source: &'a S,
    entity: Entity,
    rows: &'a [usize],
    variables: &'a [VariableDescriptor],
}

impl<'a, S: SourceFile> ValueSet<'a, S> {
    pub(crate) fn new(
        table: &'a str,
        source: &'a S,
        entity: Entity,
        rows: &'a [usize],
        variables: &'a [VariableDescriptor],
    ) -> Self {
        Self {
            table,
            source,
            entity,
            rows,
            variables,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// 1-based source rows of the entity, in row order.
    pub fn rows(&self) -> &[usize] {
        self.rows
    }

    /// Value of `descriptor` for this entity.
    ///
    /// Repeatable variables yield one value per occurrence row; other variables
    /// yield the value of the first occurrence.
    pub fn value(&self, descriptor: &VariableDescriptor) -> Result<VariableValue> {
        let variable = self
            .source
            .variable(descriptor.source_position)
            .filter(|variable| variable.name() == descriptor.name)
            .ok_or_else(|| TableError::UnknownVariable {
                name: descriptor.name.clone(),
                table: self.table.to_string(),
            })?;

        if descriptor.repeatable {
            let values = self
                .rows
                .iter()
                .map(|&row| convert_typed(variable, descriptor.value_type, row))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            return Ok(VariableValue::Sequence(values));
        }

        let &row = self
            .rows
            .first()
            .ok_or_else(|| TableError::UnknownEntity {
                entity: self.entity.to_string(),
            })?;
        Ok(VariableValue::Single(convert_typed(
            variable,
            descriptor.value_type,
            row,
        )?))
    }

    /// Value of the variable named `name`, `None` when the table has no such variable.
    pub fn value_of(&self, name: &str) -> Result<Option<VariableValue>> {
        self.variables
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| self.value(descriptor))
            .transpose()
    }

    /// Every table variable with its value, in variable order.
    pub fn values(
        &self,
    ) -> impl Iterator<Item = (&'a VariableDescriptor, Result<VariableValue>)> + '_ {
        self.variables
            .iter()
            .map(move |descriptor| (descriptor, self.value(descriptor)))
    }
}
