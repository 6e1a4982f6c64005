//! Configuration for the form validation engine.
//!
//! Handles:
//! - Command-line argument parsing for the `formval` binary
//! - Per-engine configuration (validators, hooks, behaviors, markers)

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::validation::Predicate;

/// Command-line arguments for the `formval` binary
#[derive(Debug, Parser)]
#[command(name = "formval")]
#[command(about = "Validate form definitions and dry-run submissions")]
#[command(version)]
pub struct Args {
    /// Form definition TOML file
    pub definition: PathBuf,

    /// Override a field value before validating, `field=value`
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub overrides: Vec<String>,

    /// Run the submission gate against a dry-run transport
    #[arg(long)]
    pub submit: bool,

    /// Serialize the submission body as JSON instead of url-encoded
    #[arg(long)]
    pub json: bool,

    /// Log level for the engine
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

impl Args {
    /// Parse `field=value` override pairs.
    pub fn parsed_overrides(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for raw in &self.overrides {
            match raw.split_once('=') {
                Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
                None => bail!("override `{raw}` is not of the form field=value"),
            }
        }
        Ok(pairs)
    }
}

/// Caller hooks invoked after a submission resolves.
#[derive(Default)]
pub struct SubmitHooks {
    pub after_submit: Option<Box<dyn FnMut()>>,
    pub submit_error: Option<Box<dyn FnMut()>>,
}

impl SubmitHooks {
    pub(crate) fn fire_after_submit(&mut self) {
        if let Some(hook) = self.after_submit.as_mut() {
            hook();
        }
    }

    pub(crate) fn fire_submit_error(&mut self) {
        if let Some(hook) = self.submit_error.as_mut() {
            hook();
        }
    }
}

impl std::fmt::Debug for SubmitHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitHooks")
            .field("after_submit", &self.after_submit.is_some())
            .field("submit_error", &self.submit_error.is_some())
            .finish()
    }
}

/// Per-engine configuration, constructed once per form instance and
/// passed by reference to every component.
pub struct EngineConfig {
    /// Caller-supplied validators, merged into the registry at engine
    /// construction
    pub validators: HashMap<String, Predicate>,
    pub hooks: SubmitHooks,
    /// Trigger behaviors for validating fields
    pub validation_behavior: Vec<String>,
    /// Class markers added on a valid outcome
    pub valid_classes: Vec<String>,
    /// Class markers added on an invalid outcome
    pub invalid_classes: Vec<String>,
    /// Stop running a field's rule list at the first failure. Off by
    /// default so side-effecting validators always fire.
    pub short_circuit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validators: HashMap::new(),
            hooks: SubmitHooks::default(),
            validation_behavior: vec!["change".to_string(), "focusout".to_string()],
            valid_classes: Vec::new(),
            invalid_classes: vec!["invalid".to_string()],
            short_circuit: false,
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks)
            .field("validation_behavior", &self.validation_behavior)
            .field("valid_classes", &self.valid_classes)
            .field("invalid_classes", &self.invalid_classes)
            .field("short_circuit", &self.short_circuit)
            .finish()
    }
}
