//! Workflow core for CMEP request snapshots.
//!
//! This crate holds the pure, client-side interpretation of a
//! medical-certificate request: given an immutable snapshot of the
//! server-authoritative record, derive everything the surrounding UI needs
//! to render the workflow: per-phase visual status, action affordances,
//! blocking explanations, the close-eligibility checklist, and the
//! operative-state progress strip.
//!
//! This crate focuses on:
//! - the request snapshot domain model and its strict JSON wire boundary
//! - deterministic, total classification functions over a snapshot
//! - affordance derivation that never re-computes permissions
//!
//! **No transport, no authorization**: the server decides which actions are
//! permitted and ships them with every snapshot; this crate only interprets
//! that copy. Write orchestration lives in `cmep-core`.

pub mod affordance;
pub mod closure;
pub mod phase;
pub mod progress;
pub mod snapshot;
pub mod wire;

// Re-export facades
pub use wire::SnapshotCodec;

// Re-export public domain-level types
pub use affordance::{explain_disabled, is_allowed};
pub use closure::{missing_close_requirements, CloseRequirement};
pub use phase::{Phase, PhaseStatus, WorkflowOverview};
pub use progress::{progress_strip, ProgressStep, StepStatus};
pub use snapshot::{
    ActionToken, Assignment, Assignments, CertificateState, OperativeState, PaymentRecord,
    PaymentState, PermittedActions, RequestSnapshot, RoleKind,
};

/// Errors returned by the workflow boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Type alias for Results that can fail with a [`WorkflowError`].
pub type WorkflowResult<T> = Result<T, WorkflowError>;
