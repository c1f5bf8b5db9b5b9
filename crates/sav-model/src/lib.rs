//! Data model for adapting SAV statistical files into entity/variable/value tables.
//!
//! The binary file parser is an external collaborator. It is consumed through the
//! [`SourceFile`] and [`SourceVariable`] traits, and everything derived from it
//! (descriptors, entities, typed values) is defined here.

pub mod entity;
pub mod error;
pub mod format;
pub mod options;
pub mod source;
pub mod value;
pub mod variable;

pub use entity::{Entity, EntityIndex};
pub use error::{Result, SourceError};
pub use format::{Measure, NumericFormat, VariableKind};
pub use options::{DEFAULT_ENTITY_TYPE, TableOptions, Timestamps};
pub use source::{SourceCategory, SourceFile, SourceVariable, format_code};
pub use value::{Value, VariableValue};
pub use variable::{Attribute, Category, ValueType, VariableDescriptor};
