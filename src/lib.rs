//! Form Validation Engine
//!
//! Cascading dependency validation for form-like field collections.
//!
//! This library provides:
//! - A typed field model with dependency declarations
//! - A validator registry of built-in and caller-supplied predicates
//! - Breadth-first cascading re-validation of dependent fields
//! - Full-form aggregation gating a two-state submission machine
//! - A transport boundary with lifecycle hooks

pub mod config;
pub mod form;
pub mod presentation;
pub mod submit;
pub mod validation;

// Re-exports for clean public API
pub use config::EngineConfig;
pub use form::{Dependency, Field, FieldKind, Form, FormFile};
pub use presentation::{ClassPresenter, NullPresenter, Presenter, Signal};
pub use submit::{BodyFormat, SubmissionGate, SubmitStatus, Transport};
pub use validation::{FormEngine, Outcome, ValidationReport, ValidatorRegistry};
