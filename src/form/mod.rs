//! Form Model
//!
//! Typed field descriptors, dependency declarations, and the ordered
//! field collection the engine traverses.

pub mod field;
pub mod schema;

pub use field::{Dependency, Field, FieldKind, Form};
pub use schema::{DependencyDef, FieldDef, FormFile, FormMeta};
