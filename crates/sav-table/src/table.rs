//! Table adapter over a source file.
//!
//! Loading happens lazily and at most once per table:
//!
//! ```text
//! Unloaded -> MetadataLoaded -> DataLoaded -> Resolved -> Initialised
//! ```
//!
//! Metadata is loaded when the table is opened, to locate the identifier
//! variable. The first entity listing loads the data section and resolves
//! entities. The first variable listing or value-set lookup builds the
//! variable descriptors, which depend on whether the table is multiline.

use std::path::Path;

use sav_model::{
    Entity, SourceFile, SourceVariable, TableOptions, Timestamps, VariableDescriptor,
};
use tracing::{debug, info, warn};

use crate::descriptor::{DescriptorContext, build_descriptor};
use crate::entities::{EntityResolution, resolve};
use crate::error::{Result, TableError};
use crate::source::JsonSourceFile;
use crate::value_set::ValueSet;

#[derive(Debug)]
struct Catalog {
    resolution: EntityResolution,
    variables: Vec<VariableDescriptor>,
}

#[derive(Debug)]
enum LoadState {
    Unloaded,
    MetadataLoaded,
    DataLoaded,
    Resolved(EntityResolution),
    Initialised(Box<Catalog>),
}

impl LoadState {
    fn resolution(&self) -> Option<&EntityResolution> {
        match self {
            LoadState::Resolved(resolution) => Some(resolution),
            LoadState::Initialised(catalog) => Some(&catalog.resolution),
            LoadState::Unloaded | LoadState::MetadataLoaded | LoadState::DataLoaded => None,
        }
    }

    fn catalog(&self) -> Option<&Catalog> {
        match self {
            LoadState::Initialised(catalog) => Some(catalog),
            _ => None,
        }
    }
}

/// An entity/variable/value table backed by an exclusively owned source file.
///
/// The source is closed by [`SavTable::dispose`], or on drop when the caller
/// did not dispose explicitly.
pub struct SavTable<S: SourceFile> {
    name: String,
    source: S,
    options: TableOptions,
    id_index: usize,
    state: LoadState,
    disposed: bool,
}

impl<S: SourceFile> SavTable<S> {
    /// Open a table and load the source's metadata section.
    ///
    /// Fails when the metadata cannot be loaded, the file has no variables, or
    /// the configured identifier variable does not exist. The source is closed
    /// on failure.
    pub fn open(name: impl Into<String>, source: S, options: TableOptions) -> Result<Self> {
        let mut table = Self {
            name: name.into(),
            source,
            options,
            id_index: 0,
            state: LoadState::Unloaded,
            disposed: false,
        };
        table.load_metadata()?;
        table.id_index = table.locate_id_variable()?;
        debug!(
            table = %table.name,
            file = table.source.file_name(),
            id_variable = table.id_variable_name(),
            "Opened table"
        );
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_type(&self) -> &str {
        self.options.entity_type()
    }

    /// Position of the identifier variable in the source file.
    pub fn id_variable_index(&self) -> usize {
        self.id_index
    }

    pub fn id_variable_name(&self) -> &str {
        self.source
            .variable(self.id_index)
            .map(|variable| variable.name())
            .unwrap_or_default()
    }

    /// Entities in order of first appearance.
    pub fn entities(&mut self) -> Result<&[Entity]> {
        self.ensure_resolved()?;
        Ok(self
            .state
            .resolution()
            .map(|resolution| resolution.entities.as_slice())
            .unwrap_or_default())
    }

    /// True when configured as multiline or when an identifier repeats.
    pub fn is_multiline(&mut self) -> Result<bool> {
        self.ensure_resolved()?;
        let detected = self
            .state
            .resolution()
            .is_some_and(|resolution| resolution.multiline);
        Ok(self.options.multilines || detected)
    }

    /// Descriptors of every variable except the identifier variable.
    pub fn variables(&mut self) -> Result<&[VariableDescriptor]> {
        self.initialise()?;
        Ok(self
            .state
            .catalog()
            .map(|catalog| catalog.variables.as_slice())
            .unwrap_or_default())
    }

    pub fn variable(&mut self, name: &str) -> Result<Option<&VariableDescriptor>> {
        Ok(self
            .variables()?
            .iter()
            .find(|descriptor| descriptor.name == name))
    }

    pub fn has_value_set(&mut self, entity: &Entity) -> Result<bool> {
        let entity_type = self.options.entity_type().to_string();
        self.ensure_resolved()?;
        Ok(entity.entity_type == entity_type
            && self
                .state
                .resolution()
                .is_some_and(|resolution| resolution.index.contains(&entity.identifier)))
    }

    /// Values of `entity` across the table variables.
    pub fn value_set(&mut self, entity: &Entity) -> Result<ValueSet<'_, S>> {
        self.initialise()?;
        let unknown = || TableError::UnknownEntity {
            entity: entity.to_string(),
        };
        if entity.entity_type != self.options.entity_type() {
            return Err(unknown());
        }
        let catalog = self.state.catalog().ok_or_else(unknown)?;
        let rows = catalog
            .resolution
            .rows(&entity.identifier)
            .ok_or_else(unknown)?;
        Ok(ValueSet::new(
            &self.name,
            &self.source,
            entity.clone(),
            rows,
            &catalog.variables,
        ))
    }

    /// Last update from the file's modification time. Creation time is unknown.
    pub fn timestamps(&self) -> Result<Timestamps> {
        self.check_open()?;
        let last_update =
            self.source
                .last_modified()
                .map_err(|source| TableError::Timestamp {
                    file: self.source.file_name().to_string(),
                    source,
                })?;
        Ok(Timestamps {
            last_update: Some(last_update),
            created: None,
        })
    }

    /// Build the variable descriptors. Idempotent.
    pub fn initialise(&mut self) -> Result<()> {
        self.ensure_resolved()?;
        let LoadState::Resolved(resolution) = &self.state else {
            return Ok(());
        };
        let multiline = self.options.multilines || resolution.multiline;
        let variables = self.build_variables(multiline)?;
        if let LoadState::Resolved(resolution) =
            std::mem::replace(&mut self.state, LoadState::DataLoaded)
        {
            self.state = LoadState::Initialised(Box::new(Catalog {
                resolution,
                variables,
            }));
        }
        Ok(())
    }

    /// Release the source file. Close failures are logged, never returned.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        match self.source.close() {
            Ok(()) => debug!(table = %self.name, "Closed source file"),
            Err(error) => warn!(
                table = %self.name,
                file = self.source.file_name(),
                error = %error,
                "Error occurred while closing source file"
            ),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn check_open(&self) -> Result<()> {
        if self.disposed {
            return Err(TableError::Disposed {
                table: self.name.clone(),
            });
        }
        Ok(())
    }

    fn ensure_resolved(&mut self) -> Result<()> {
        self.check_open()?;
        loop {
            match self.state {
                LoadState::Unloaded => self.load_metadata()?,
                LoadState::MetadataLoaded => self.load_data()?,
                LoadState::DataLoaded => self.resolve_entities()?,
                LoadState::Resolved(_) | LoadState::Initialised(_) => return Ok(()),
            }
        }
    }

    fn load_metadata(&mut self) -> Result<()> {
        if !self.source.is_metadata_loaded() {
            self.source
                .load_metadata()
                .map_err(|source| TableError::MetadataLoad {
                    file: self.source.file_name().to_string(),
                    source,
                })?;
            debug!(
                file = self.source.file_name(),
                variables = self.source.variable_count(),
                "Loaded metadata"
            );
        }
        self.state = LoadState::MetadataLoaded;
        Ok(())
    }

    fn load_data(&mut self) -> Result<()> {
        if !self.source.is_data_loaded() {
            self.source
                .load_data()
                .map_err(|source| TableError::DataLoad {
                    file: self.source.file_name().to_string(),
                    source,
                })?;
            debug!(file = self.source.file_name(), "Loaded data");
        }
        self.state = LoadState::DataLoaded;
        Ok(())
    }

    fn resolve_entities(&mut self) -> Result<()> {
        let id_variable = self.source.variable(self.id_index).ok_or_else(|| {
            TableError::NoVariables {
                file: self.source.file_name().to_string(),
            }
        })?;
        let resolution = resolve(id_variable, self.options.entity_type())?;
        info!(
            table = %self.name,
            file = self.source.file_name(),
            rows = id_variable.observation_count(),
            entities = resolution.entities.len(),
            multiline = resolution.multiline,
            "Resolved table entities"
        );
        self.state = LoadState::Resolved(resolution);
        Ok(())
    }

    fn locate_id_variable(&self) -> Result<usize> {
        let count = self.source.variable_count();
        if count == 0 {
            return Err(TableError::NoVariables {
                file: self.source.file_name().to_string(),
            });
        }
        let Some(name) = self.options.id_variable() else {
            return Ok(0);
        };
        (0..count)
            .find(|&position| {
                self.source
                    .variable(position)
                    .is_some_and(|variable| variable.name() == name)
            })
            .ok_or_else(|| TableError::UnknownIdentifierVariable {
                name: name.to_string(),
                file: self.source.file_name().to_string(),
            })
    }

    fn build_variables(&self, multiline: bool) -> Result<Vec<VariableDescriptor>> {
        let context = DescriptorContext {
            entity_type: self.options.entity_type(),
            locale: self.options.locale(),
            occurrence_group: multiline.then_some(self.name.as_str()),
        };
        let count = self.source.variable_count();
        let mut variables = Vec::with_capacity(count.saturating_sub(1));
        for position in (0..count).filter(|&position| position != self.id_index) {
            let Some(variable) = self.source.variable(position) else {
                continue;
            };
            let descriptor = build_descriptor(variable, variables.len(), position, &context)
                .map_err(|source| TableError::VariableDescriptor {
                    variable: variable.name().to_string(),
                    position: position + 1,
                    source,
                })?;
            variables.push(descriptor);
        }
        Ok(variables)
    }
}

impl SavTable<JsonSourceFile> {
    /// Open a table over a JSON source dump, named after the file stem.
    pub fn open_json(path: impl AsRef<Path>, options: TableOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = JsonSourceFile::open(path).map_err(|source| TableError::MetadataLoad {
            file: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.file_name().to_string());
        Self::open(name, source, options)
    }
}

impl<S: SourceFile> Drop for SavTable<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: SourceFile> std::fmt::Debug for SavTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavTable")
            .field("name", &self.name)
            .field("file", &self.source.file_name())
            .field("id_index", &self.id_index)
            .field("state", &self.state)
            .field("disposed", &self.disposed)
            .finish()
    }
}
