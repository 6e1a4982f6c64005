//! Submission gate.
//!
//! Two-state machine governing the whole submission sequence. Fields
//! are disabled only while a submission is in flight and re-enabled on
//! every exit path, so the form can never stay stuck disabled.

use anyhow::{Result, bail};

use crate::config::EngineConfig;
use crate::form::Form;
use crate::presentation::Presenter;
use crate::submit::serialize::{BodyFormat, default_headers, serialize_form};
use crate::submit::transport::{
    LifecycleHooks, PostRequest, Stage, Transport, TransportOutcome,
};
use crate::validation::{ValidationReport, ValidatorRegistry, engine::validate_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    InFlight,
}

/// How a submission attempt resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitStatus {
    /// A submission was already in flight; nothing happened
    AlreadyInFlight,
    /// Aggregate validation failed; the transport was never invoked
    Rejected(ValidationReport),
    /// The transport was invoked and the lifecycle ran to completion
    Completed {
        outcome: TransportOutcome,
        stages: Vec<Stage>,
    },
}

/// The state machine gating submission.
#[derive(Debug)]
pub struct SubmissionGate {
    state: GateState,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Validate the whole form and, if it passes, serialize and hand
    /// off to the transport.
    ///
    /// Sequence: aggregate-validate → serialize → disable all fields →
    /// transport → caller hooks → re-enable. On validation failure the
    /// transport is never invoked and fields are re-enabled
    /// immediately. A submit while one is in flight is a logged no-op.
    pub fn submit(
        &mut self,
        form: &mut Form,
        registry: &ValidatorRegistry,
        config: &mut EngineConfig,
        transport: &mut dyn Transport,
        presenter: &mut dyn Presenter,
        format: BodyFormat,
    ) -> Result<SubmitStatus> {
        if self.state != GateState::Idle {
            log::warn!("submit ignored, a submission is already in flight");
            return Ok(SubmitStatus::AlreadyInFlight);
        }

        let report = validate_all(form, registry, config, presenter);
        if !report.overall_valid {
            log::info!("form `{}` not valid, submission rejected", form.name);
            form.set_all_enabled(true);
            return Ok(SubmitStatus::Rejected(report));
        }

        let Some(url) = form.action.clone() else {
            bail!("form `{}` declares no action to submit to", form.name);
        };

        // Serialize before disabling: disabled fields never serialize.
        let body = serialize_form(form, format);
        let request = PostRequest {
            url,
            body,
            headers: default_headers(format),
        };

        log::info!("form `{}` valid, submitting", form.name);
        self.state = GateState::InFlight;
        form.set_all_enabled(false);

        let mut hooks = LifecycleHooks::new();
        let outcome = transport.post(&request, &mut hooks);
        hooks.finish(outcome);

        match outcome {
            TransportOutcome::Success => {
                log::info!("form `{}` submitted successfully", form.name);
                config.hooks.fire_after_submit();
            }
            TransportOutcome::Failure => {
                log::warn!("error submitting form `{}`", form.name);
                config.hooks.fire_submit_error();
            }
        }

        form.set_all_enabled(true);
        self.state = GateState::Idle;

        Ok(SubmitStatus::Completed {
            outcome,
            stages: hooks.into_trace(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Dependency, Field, FieldKind};
    use crate::presentation::NullPresenter;

    fn field(id: &str, value: &str, rules: &[&str]) -> Field {
        Field {
            id: Some(id.to_string()),
            name: Some(id.to_string()),
            kind: FieldKind::Text,
            value: value.to_string(),
            selected: Vec::new(),
            checked: false,
            enabled: true,
            rules: rules.iter().map(|r| r.to_string()).collect(),
            dependency: Dependency::None,
            behavior: None,
            classes: Vec::new(),
        }
    }

    fn form(fields: Vec<Field>) -> Form {
        Form::new(
            "t".to_string(),
            Some("https://example.test/submit".to_string()),
            fields,
        )
        .unwrap()
    }

    struct RecordingTransport {
        requests: Vec<PostRequest>,
    }

    impl Transport for RecordingTransport {
        fn post(&mut self, request: &PostRequest, hooks: &mut LifecycleHooks) -> TransportOutcome {
            hooks.before_send();
            self.requests.push(request.clone());
            hooks.after_send();
            TransportOutcome::Success
        }
    }

    #[test]
    fn test_invalid_form_never_reaches_transport() {
        let mut form = form(vec![field("a", "", &["not-empty"])]);
        let registry = ValidatorRegistry::new();
        let mut config = EngineConfig::default();
        let mut transport = RecordingTransport { requests: vec![] };
        let mut gate = SubmissionGate::new();

        let status = gate
            .submit(
                &mut form,
                &registry,
                &mut config,
                &mut transport,
                &mut NullPresenter,
                BodyFormat::UrlEncoded,
            )
            .unwrap();

        assert!(matches!(status, SubmitStatus::Rejected(_)));
        assert!(transport.requests.is_empty());
        assert!(form.fields().iter().all(|f| f.enabled));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_valid_form_submits_and_reenables() {
        let mut form = form(vec![field("a", "hello", &["not-empty"])]);
        let registry = ValidatorRegistry::new();
        let mut config = EngineConfig::default();
        let mut transport = RecordingTransport { requests: vec![] };
        let mut gate = SubmissionGate::new();

        let status = gate
            .submit(
                &mut form,
                &registry,
                &mut config,
                &mut transport,
                &mut NullPresenter,
                BodyFormat::Json,
            )
            .unwrap();

        let SubmitStatus::Completed { outcome, stages } = status else {
            panic!("expected a completed submission");
        };
        assert_eq!(outcome, TransportOutcome::Success);
        // Transport fired before/after send; the gate's finishing guard
        // dispatched success and complete.
        assert_eq!(
            stages,
            vec![
                Stage::BeforeSend,
                Stage::AfterSend,
                Stage::Success,
                Stage::Complete
            ]
        );

        let request = &transport.requests[0];
        assert_eq!(request.url, "https://example.test/submit");
        assert_eq!(request.body, r#"{"a":"hello"}"#);
        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "application/json"
        );
        assert!(form.fields().iter().all(|f| f.enabled));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_reentrant_submit_is_noop() {
        let mut form = form(vec![field("a", "hello", &["not-empty"])]);
        let registry = ValidatorRegistry::new();
        let mut config = EngineConfig::default();
        let mut transport = RecordingTransport { requests: vec![] };
        let mut gate = SubmissionGate::new();
        gate.state = GateState::InFlight;

        let status = gate
            .submit(
                &mut form,
                &registry,
                &mut config,
                &mut transport,
                &mut NullPresenter,
                BodyFormat::UrlEncoded,
            )
            .unwrap();

        assert_eq!(status, SubmitStatus::AlreadyInFlight);
        assert!(transport.requests.is_empty());
        assert_eq!(gate.state(), GateState::InFlight);
    }

    #[test]
    fn test_failure_fires_submit_error_hook_and_reenables() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct FailingTransport;
        impl Transport for FailingTransport {
            fn post(
                &mut self,
                _request: &PostRequest,
                hooks: &mut LifecycleHooks,
            ) -> TransportOutcome {
                hooks.before_send();
                hooks.after_send();
                TransportOutcome::Failure
            }
        }

        let errored = Rc::new(Cell::new(false));
        let probe = errored.clone();
        let mut config = EngineConfig::default();
        config.hooks.submit_error = Some(Box::new(move || probe.set(true)));

        let mut form = form(vec![field("a", "hello", &["not-empty"])]);
        let registry = ValidatorRegistry::new();
        let mut gate = SubmissionGate::new();

        let status = gate
            .submit(
                &mut form,
                &registry,
                &mut config,
                &mut FailingTransport,
                &mut NullPresenter,
                BodyFormat::UrlEncoded,
            )
            .unwrap();

        let SubmitStatus::Completed { outcome, stages } = status else {
            panic!("expected a completed submission");
        };
        assert_eq!(outcome, TransportOutcome::Failure);
        assert!(stages.contains(&Stage::Error));
        assert!(stages.contains(&Stage::Complete));
        assert!(errored.get());
        assert!(form.fields().iter().all(|f| f.enabled));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_missing_action_is_an_error() {
        let mut form =
            Form::new("t".to_string(), None, vec![field("a", "x", &["not-empty"])]).unwrap();
        let registry = ValidatorRegistry::new();
        let mut config = EngineConfig::default();
        let mut transport = RecordingTransport { requests: vec![] };
        let mut gate = SubmissionGate::new();

        let result = gate.submit(
            &mut form,
            &registry,
            &mut config,
            &mut transport,
            &mut NullPresenter,
            BodyFormat::UrlEncoded,
        );
        assert!(result.is_err());
        assert!(transport.requests.is_empty());
    }
}
