//! Core validation logic.
//!
//! Three entry points with increasing scope:
//! - [`validate_field`]: one field against its rules and dependency
//!   condition.
//! - [`cascade_validate`]: breadth-first re-validation of a changed
//!   field and every field transitively depending on it.
//! - [`validate_all`]: flat full-form pass used when gating submission.

use std::collections::{HashSet, VecDeque};

use crate::config::EngineConfig;
use crate::form::{Dependency, Field, Form};
use crate::presentation::Presenter;
use crate::submit::{BodyFormat, GateState, SubmissionGate, SubmitStatus, Transport};
use crate::validation::ValidatorRegistry;

/// Result of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
    /// The field's dependency condition currently excludes it from
    /// validation. Non-blocking for aggregation.
    NotApplicable,
}

impl Outcome {
    /// Whether this outcome blocks submission.
    pub fn blocks(self) -> bool {
        self == Outcome::Invalid
    }
}

/// One field's outcome within a cascade or full-form pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub key: String,
    pub outcome: Outcome,
}

/// Result of a full-form pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub overall_valid: bool,
    pub outcomes: Vec<FieldOutcome>,
}

impl ValidationReport {
    pub fn outcome_for(&self, key: &str) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.outcome)
    }
}

/// How a field's dependency condition evaluates right now.
enum Applicability {
    Applies,
    Excluded,
    MissingController,
}

fn applicability(form: &Form, field: &Field) -> Applicability {
    let (controller_id, check) = match &field.dependency {
        Dependency::None => return Applicability::Applies,
        Dependency::OnChecked { controller } => (controller, Check::Checked),
        Dependency::OnValue { controller, equals } => (controller, Check::Value(equals)),
        Dependency::OnEnabled { controller } => (controller, Check::Enabled),
    };
    let Some(controller) = form.controller(controller_id) else {
        return Applicability::MissingController;
    };
    let applies = match check {
        Check::Checked => controller.enabled && controller.checked,
        Check::Value(equals) => controller.enabled && controller.value == *equals,
        Check::Enabled => controller.enabled,
    };
    if applies {
        Applicability::Applies
    } else {
        Applicability::Excluded
    }
}

enum Check<'a> {
    Checked,
    Value(&'a str),
    Enabled,
}

/// Run a field's rule list against its current value.
///
/// All listed rules run and their results are AND-combined; a failing
/// rule does not skip later ones unless `short_circuit` is configured.
/// Unresolved rule names contribute true and are logged once per run.
fn run_rules(
    field: &Field,
    registry: &ValidatorRegistry,
    config: &EngineConfig,
) -> bool {
    let mut valid = true;
    for rule in &field.rules {
        match registry.resolve(rule) {
            Some(predicate) => {
                valid = predicate(&field.value) && valid;
            }
            None => {
                log::warn!("unresolved validator `{rule}` on field `{}`", field.key());
            }
        }
        if config.short_circuit && !valid {
            break;
        }
    }
    valid
}

/// Validate a single field against its dependency condition and rules.
///
/// A missing dependency controller yields `NotApplicable` here; the
/// cascade excludes such fields from the run entirely instead.
pub fn validate_field(
    form: &Form,
    registry: &ValidatorRegistry,
    config: &EngineConfig,
    field: &Field,
) -> Outcome {
    match applicability(form, field) {
        Applicability::Excluded => Outcome::NotApplicable,
        Applicability::MissingController => {
            log::warn!(
                "field `{}` depends on missing field `{}`",
                field.key(),
                field.dependency.controller().unwrap_or_default()
            );
            Outcome::NotApplicable
        }
        Applicability::Applies => {
            if run_rules(field, registry, config) {
                Outcome::Valid
            } else {
                Outcome::Invalid
            }
        }
    }
}

/// Breadth-first re-validation starting from a changed field.
///
/// Every field reachable over dependency edges is validated at most
/// once; membership in the visited set is recorded at enqueue time, so
/// cyclic declarations cannot enqueue a field twice.
/// Direct dependents of the start field are validated before any of
/// their own dependents, siblings in declaration order. The presenter
/// is invoked synchronously for each field before the loop continues.
pub fn cascade_validate(
    form: &mut Form,
    registry: &ValidatorRegistry,
    config: &EngineConfig,
    start_key: &str,
    presenter: &mut dyn Presenter,
) -> Vec<FieldOutcome> {
    let mut results = Vec::new();
    let Some(start) = form.index_of(start_key) else {
        log::warn!("cascade requested for unknown field `{start_key}`");
        return results;
    };

    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    queue.push_back(start);
    visited.insert(form.field_at(start).key().to_string());

    while let Some(idx) = queue.pop_front() {
        let field = form.field_at(idx);
        let key = field.key().to_string();
        log::debug!("validating `{key}`");

        // A dangling controller reference excludes the field from this run.
        if let Applicability::MissingController = applicability(form, field) {
            log::warn!(
                "field `{key}` depends on missing field `{}`, skipping",
                field.dependency.controller().unwrap_or_default()
            );
            continue;
        }

        // Enqueue dependents not already seen. Dependency edges are
        // declared against ids, so keyless-by-id fields have none.
        if let Some(id) = form.field_at(idx).id.clone() {
            for dep_idx in form.dependents_of(&id) {
                let dep_key = form.field_at(dep_idx).key().to_string();
                if visited.insert(dep_key) {
                    queue.push_back(dep_idx);
                }
            }
        }

        let field = form.field_at(idx);
        if !field.validates() {
            log::debug!("`{key}` carries no rules, traversal only");
            continue;
        }
        let outcome = validate_field(form, registry, config, field);
        presenter.apply(form.field_at_mut(idx), outcome.into());
        results.push(FieldOutcome { key, outcome });
    }

    results
}

/// Flat full-form pass over every validating field.
///
/// Not a cascade: each field is validated independently and outcomes
/// are AND-combined, with `NotApplicable` counting as a pass but
/// signalling `Neutral` to the presenter.
pub fn validate_all(
    form: &mut Form,
    registry: &ValidatorRegistry,
    config: &EngineConfig,
    presenter: &mut dyn Presenter,
) -> ValidationReport {
    let mut overall_valid = true;
    let mut outcomes = Vec::new();

    for idx in 0..form.len() {
        let field = form.field_at(idx);
        if !field.validates() {
            continue;
        }
        let key = field.key().to_string();
        let outcome = validate_field(form, registry, config, field);
        overall_valid = overall_valid && !outcome.blocks();
        presenter.apply(form.field_at_mut(idx), outcome.into());
        outcomes.push(FieldOutcome { key, outcome });
    }

    ValidationReport {
        overall_valid,
        outcomes,
    }
}

/// One form session: the field collection plus the configuration and
/// registry every component reads. Constructed once per form, no
/// process-wide state.
pub struct FormEngine {
    pub form: Form,
    pub registry: ValidatorRegistry,
    pub config: EngineConfig,
    gate: SubmissionGate,
}

impl FormEngine {
    pub fn new(form: Form, mut config: EngineConfig) -> Self {
        let mut registry = ValidatorRegistry::new();
        for (name, predicate) in config.validators.drain() {
            registry.register(name, predicate);
        }
        Self {
            form,
            registry,
            config,
            gate: SubmissionGate::new(),
        }
    }

    /// Validate the whole form and hand off to the transport on success.
    pub fn submit(
        &mut self,
        transport: &mut dyn Transport,
        presenter: &mut dyn Presenter,
        format: BodyFormat,
    ) -> anyhow::Result<SubmitStatus> {
        self.gate.submit(
            &mut self.form,
            &self.registry,
            &mut self.config,
            transport,
            presenter,
            format,
        )
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn validate_field(&self, key: &str) -> Option<Outcome> {
        let field = self.form.get(key)?;
        Some(validate_field(&self.form, &self.registry, &self.config, field))
    }

    pub fn cascade_validate(
        &mut self,
        start_key: &str,
        presenter: &mut dyn Presenter,
    ) -> Vec<FieldOutcome> {
        cascade_validate(
            &mut self.form,
            &self.registry,
            &self.config,
            start_key,
            presenter,
        )
    }

    pub fn validate_all(&mut self, presenter: &mut dyn Presenter) -> ValidationReport {
        validate_all(&mut self.form, &self.registry, &self.config, presenter)
    }

    /// Trigger behaviors for a field: its own override if declared,
    /// otherwise the configured list.
    pub fn trigger_behaviors(&self, key: &str) -> Vec<String> {
        match self.form.get(key).and_then(|f| f.behavior.clone()) {
            Some(behavior) => vec![behavior],
            None => self.config.validation_behavior.clone(),
        }
    }
}
