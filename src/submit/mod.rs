//! Submission Pipeline
//!
//! Serialization, the transport boundary, and the two-state gate that
//! orchestrates validate → serialize → transport → re-enable.

pub mod gate;
pub mod serialize;
pub mod transport;

pub use gate::{GateState, SubmissionGate, SubmitStatus};
pub use serialize::{BodyFormat, default_headers, normalize_headers, serialize_form};
pub use transport::{DryRunTransport, LifecycleHooks, PostRequest, Stage, Transport, TransportOutcome};
