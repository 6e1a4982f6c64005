//! Transport boundary.
//!
//! The engine never performs network I/O itself; the gate hands a
//! serialized request plus lifecycle hooks to a [`Transport`]
//! implementation. [`LifecycleHooks`] records the firing order and
//! guarantees `complete` fires exactly once after `success` or `error`,
//! even against a transport that never touches the hooks.

use std::collections::HashMap;

/// A fully prepared submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub body: String,
    /// Header names are lower-cased before the request is built
    pub headers: HashMap<String, String>,
}

/// How the transport attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    Success,
    Failure,
}

/// Lifecycle stages in firing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BeforeSend,
    AfterSend,
    Success,
    Error,
    Complete,
}

/// Callbacks and bookkeeping for one submission attempt.
#[derive(Default)]
pub struct LifecycleHooks {
    pub on_before_send: Option<Box<dyn FnMut()>>,
    pub on_after_send: Option<Box<dyn FnMut()>>,
    pub on_success: Option<Box<dyn FnMut()>>,
    pub on_error: Option<Box<dyn FnMut()>>,
    pub on_complete: Option<Box<dyn FnMut()>>,
    trace: Vec<Stage>,
    dispatched: bool,
    completed: bool,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire before the request is dispatched.
    pub fn before_send(&mut self) {
        self.trace.push(Stage::BeforeSend);
        if let Some(hook) = self.on_before_send.as_mut() {
            hook();
        }
    }

    /// Fire after the request has been dispatched.
    pub fn after_send(&mut self) {
        self.trace.push(Stage::AfterSend);
        if let Some(hook) = self.on_after_send.as_mut() {
            hook();
        }
    }

    /// Fire `success` or `error` for the outcome, then `complete`.
    /// Subsequent calls are no-ops.
    pub fn dispatch(&mut self, outcome: TransportOutcome) {
        if self.dispatched {
            return;
        }
        self.dispatched = true;
        match outcome {
            TransportOutcome::Success => {
                self.trace.push(Stage::Success);
                if let Some(hook) = self.on_success.as_mut() {
                    hook();
                }
            }
            TransportOutcome::Failure => {
                self.trace.push(Stage::Error);
                if let Some(hook) = self.on_error.as_mut() {
                    hook();
                }
            }
        }
        self.complete();
    }

    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.trace.push(Stage::Complete);
        if let Some(hook) = self.on_complete.as_mut() {
            hook();
        }
    }

    /// Called by the gate once the transport returns: dispatches the
    /// outcome if the transport did not, so `complete` always fires.
    pub(crate) fn finish(&mut self, outcome: TransportOutcome) {
        self.dispatch(outcome);
        self.complete();
    }

    /// Stages fired so far, in order.
    pub fn trace(&self) -> &[Stage] {
        &self.trace
    }

    pub(crate) fn into_trace(self) -> Vec<Stage> {
        self.trace
    }
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("trace", &self.trace)
            .field("dispatched", &self.dispatched)
            .field("completed", &self.completed)
            .finish()
    }
}

/// Delivers a prepared request and drives the lifecycle hooks.
pub trait Transport {
    fn post(&mut self, request: &PostRequest, hooks: &mut LifecycleHooks) -> TransportOutcome;
}

/// Transport that logs the request instead of sending it. Used by the
/// CLI for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunTransport;

impl Transport for DryRunTransport {
    fn post(&mut self, request: &PostRequest, hooks: &mut LifecycleHooks) -> TransportOutcome {
        hooks.before_send();
        log::info!("POST {} ({} bytes)", request.url, request.body.len());
        for (name, value) in &request.headers {
            log::debug!("header {name}: {value}");
        }
        hooks.after_send();
        hooks.dispatch(TransportOutcome::Success);
        TransportOutcome::Success
    }
}
