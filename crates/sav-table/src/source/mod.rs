//! Bundled source file implementations.

mod json;
mod memory;

pub use json::JsonSourceFile;
pub use memory::{Cell, MemorySourceFile, MemoryVariable, MissingValues};
