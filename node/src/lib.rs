//! Attestation service.
//!
//! Wraps the attestation engine so that every operation, its clock read, and
//! the facts it emits are applied as one unit under a single lock. The result
//! is a totally ordered operation log: concurrent callers are serialized and
//! each observes the full post-state of whoever went first.

pub mod config;
pub mod error;
pub mod event_log;
pub mod metrics;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use event_log::{EventLog, SequencedEvent};
pub use metrics::ServiceMetrics;
pub use service::{AttestationService, DefaultService};
