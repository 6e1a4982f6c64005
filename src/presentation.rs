//! Presentation Boundary
//!
//! The engine reports tri-state signals; presenters translate them into
//! visual state. [`ClassPresenter`] is the class-marker implementation
//! matching the configured valid/invalid class lists.

use crate::config::EngineConfig;
use crate::form::Field;
use crate::validation::Outcome;

/// Three-state presentation signal.
///
/// `Neutral` means "assert nothing": remove both valid and invalid
/// markers rather than claiming either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Valid,
    Invalid,
    Neutral,
}

impl From<Outcome> for Signal {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Valid => Signal::Valid,
            Outcome::Invalid => Signal::Invalid,
            Outcome::NotApplicable => Signal::Neutral,
        }
    }
}

/// Receives per-field signals as validation progresses.
pub trait Presenter {
    fn apply(&mut self, field: &mut Field, signal: Signal);
}

/// Presenter that maintains class markers on the field itself.
#[derive(Debug, Clone)]
pub struct ClassPresenter {
    valid_classes: Vec<String>,
    invalid_classes: Vec<String>,
}

impl ClassPresenter {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            valid_classes: config.valid_classes.clone(),
            invalid_classes: config.invalid_classes.clone(),
        }
    }
}

impl Presenter for ClassPresenter {
    fn apply(&mut self, field: &mut Field, signal: Signal) {
        match signal {
            Signal::Valid => {
                add_classes(field, &self.valid_classes);
                remove_classes(field, &self.invalid_classes);
            }
            Signal::Invalid => {
                remove_classes(field, &self.valid_classes);
                add_classes(field, &self.invalid_classes);
            }
            Signal::Neutral => {
                remove_classes(field, &self.valid_classes);
                remove_classes(field, &self.invalid_classes);
            }
        }
    }
}

/// Presenter that discards signals, for callers driving their own UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply(&mut self, _field: &mut Field, _signal: Signal) {}
}

fn add_classes(field: &mut Field, classes: &[String]) {
    for class in classes {
        if !field.classes.contains(class) {
            field.classes.push(class.clone());
        }
    }
}

fn remove_classes(field: &mut Field, classes: &[String]) {
    field.classes.retain(|c| !classes.contains(c));
}
