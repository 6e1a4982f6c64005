//! Validation Engine
//!
//! Rule resolution, single-field validation, cascading dependency
//! validation, and full-form aggregation.

pub mod engine;
pub mod registry;

pub use engine::{
    FieldOutcome, FormEngine, Outcome, ValidationReport, cascade_validate, validate_all,
    validate_field,
};
pub use registry::{Predicate, ValidatorRegistry};
