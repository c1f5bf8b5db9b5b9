//! JSON source dump reader.
//!
//! A dump carries the output of an external statistical file parser:
//!
//! ```json
//! {
//!   "variables": [
//!     { "name": "ID", "kind": { "type": "string" }, "width": 10 },
//!     { "name": "DOB", "kind": { "type": "numeric", "format": "adate" }, "width": 10 }
//!   ],
//!   "data": [["P-001", "10/28/1990"], ["P-002", null]]
//! }
//! ```
//!
//! The `variables` section is read by [`SourceFile::load_metadata`] and the `data`
//! section by [`SourceFile::load_data`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use sav_model::{SourceError, SourceFile};

use super::memory::{Cell, MemorySourceFile, MemoryVariable};

#[derive(Deserialize)]
struct MetadataSection {
    variables: Vec<MemoryVariable>,
}

#[derive(Deserialize)]
struct DataSection {
    #[serde(default)]
    data: Vec<Vec<Cell>>,
}

/// A source file backed by a JSON dump on disk.
#[derive(Debug)]
pub struct JsonSourceFile {
    path: PathBuf,
    inner: MemorySourceFile,
}

impl JsonSourceFile {
    /// Open a dump. Nothing is read until a section is loaded.
    pub fn open(path: impl AsRef<Path>) -> sav_model::Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            inner: MemorySourceFile::new(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_section<T>(&self) -> sav_model::Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if self.inner.is_closed() {
            return Err(SourceError::Closed);
        }
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|error| SourceError::invalid_format(error.to_string()))
    }
}

impl SourceFile for JsonSourceFile {
    type Variable = MemoryVariable;

    fn file_name(&self) -> &str {
        self.inner.file_name()
    }

    fn variable_count(&self) -> usize {
        self.inner.variable_count()
    }

    fn variable(&self, index: usize) -> Option<&MemoryVariable> {
        self.inner.variable(index)
    }

    fn is_metadata_loaded(&self) -> bool {
        self.inner.is_metadata_loaded()
    }

    fn load_metadata(&mut self) -> sav_model::Result<()> {
        let section: MetadataSection = self.read_section()?;
        let mut seen = HashSet::new();
        for variable in &section.variables {
            if !seen.insert(variable.name.as_str()) {
                return Err(SourceError::invalid_format(format!(
                    "duplicate variable name: {}",
                    variable.name
                )));
            }
        }
        debug!(
            path = %self.path.display(),
            variables = section.variables.len(),
            "Read metadata section"
        );
        self.inner.set_variables(section.variables);
        self.inner.load_metadata()
    }

    fn is_data_loaded(&self) -> bool {
        self.inner.is_data_loaded()
    }

    fn load_data(&mut self) -> sav_model::Result<()> {
        if !self.inner.is_metadata_loaded() {
            return Err(SourceError::MetadataNotLoaded);
        }
        let section: DataSection = self.read_section()?;
        debug!(
            path = %self.path.display(),
            rows = section.data.len(),
            "Read data section"
        );
        self.inner.set_rows(section.data)?;
        self.inner.load_data()
    }

    fn last_modified(&self) -> sav_model::Result<DateTime<Utc>> {
        let modified = fs::metadata(&self.path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    fn close(&mut self) -> sav_model::Result<()> {
        self.inner.close()
    }
}
