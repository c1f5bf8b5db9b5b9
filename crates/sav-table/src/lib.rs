//! Adapts SAV statistical files into entity/variable/value tables.
//!
//! A [`SavTable`] wraps a [`SourceFile`](sav_model::SourceFile). One variable
//! holds the entity identifier; every other variable becomes a
//! [`VariableDescriptor`](sav_model::VariableDescriptor). When an identifier
//! occurs on several rows the table is multiline and each variable yields one
//! value per occurrence.
//!
//! ```no_run
//! use sav_model::TableOptions;
//! use sav_table::SavTable;
//!
//! let mut table = SavTable::open_json("survey.json", TableOptions::default())?;
//! let entities = table.entities()?.to_vec();
//! for entity in &entities {
//!     let value_set = table.value_set(entity)?;
//!     for (variable, value) in value_set.values() {
//!         println!("{entity} {} = {}", variable.name, value?);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod charset;
pub mod convert;
pub mod descriptor;
pub mod entities;
pub mod error;
pub mod source;
pub mod table;
pub mod value_set;

pub use entities::EntityResolution;
pub use error::{ConversionCause, InvalidCharacterError, Result, TableError, ValueConversionError};
pub use source::{Cell, JsonSourceFile, MemorySourceFile, MemoryVariable, MissingValues};
pub use table::SavTable;
pub use value_set::ValueSet;
