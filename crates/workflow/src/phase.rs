//! Workflow state classifier.
//!
//! Maps a [`RequestSnapshot`] to a per-phase visual status for the three
//! dependent work tracks of a request (administrative management, payment,
//! medical evaluation), plus the human-readable notes shown when a phase
//! is waiting on something.
//!
//! Every function here is pure and total: defined for every reachable
//! snapshot, no side effects, no I/O, and safe to call redundantly on each
//! render. These statuses are a presentation concern only; they must never
//! stand in for a permission check (see [`crate::affordance`]).

use crate::snapshot::{OperativeState, PaymentState, RequestSnapshot};

/// Visual status of one workflow phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseStatus {
    /// The phase's work is done (or moot on a cancelled request).
    Completed,
    /// The phase is actionable right now.
    InProgress,
    /// Nothing upstream is missing, but the phase has not started.
    Pending,
    /// An upstream phase must advance before this one can start.
    Blocked,
}

impl PhaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Completed => "completed",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Pending => "pending",
            PhaseStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three dependent work tracks rendered as separate UI blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Administrative,
    Payment,
    Evaluation,
}

impl Phase {
    /// Classify this phase for the given snapshot.
    pub fn status(self, snapshot: &RequestSnapshot) -> PhaseStatus {
        match self {
            Phase::Administrative => administrative_status(snapshot),
            Phase::Payment => payment_status(snapshot),
            Phase::Evaluation => evaluation_status(snapshot),
        }
    }

    /// The waiting note for this phase, if one applies.
    pub fn note(self, snapshot: &RequestSnapshot) -> Option<&'static str> {
        match self {
            Phase::Administrative => None,
            Phase::Payment => payment_note(snapshot),
            Phase::Evaluation => evaluation_note(snapshot),
        }
    }
}

/// Note shown while the payment phase waits on the administrative phase.
pub const PAYMENT_BLOCKED_NOTE: &str = "Available once a manager is assigned.";

/// Note shown while the evaluation phase waits on payment.
pub const EVALUATION_BLOCKED_NOTE: &str =
    "Available once payment is registered and a doctor is assigned.";

/// Note shown when only the doctor assignment remains before evaluation.
pub const EVALUATION_PENDING_NOTE: &str = "Payment registered; doctor assignment pending.";

/// Administrative management phase.
///
/// - completed: a manager is currently assigned
/// - in_progress: no manager yet (actionable from creation, never blocked)
/// - pending: cancelled before anyone was assigned
pub fn administrative_status(snapshot: &RequestSnapshot) -> PhaseStatus {
    if snapshot.operative_state == OperativeState::Cancelled {
        return if snapshot.manager().is_some() {
            PhaseStatus::Completed
        } else {
            PhaseStatus::Pending
        };
    }
    if snapshot.manager().is_some() {
        return PhaseStatus::Completed;
    }
    PhaseStatus::InProgress
}

/// Payment phase.
///
/// - completed: payment confirmed
/// - in_progress: manager assigned but not paid
/// - blocked: no manager yet
/// - pending: cancelled while unpaid
pub fn payment_status(snapshot: &RequestSnapshot) -> PhaseStatus {
    if snapshot.operative_state == OperativeState::Cancelled {
        return if snapshot.payment_state == PaymentState::Paid {
            PhaseStatus::Completed
        } else {
            PhaseStatus::Pending
        };
    }
    if snapshot.payment_state == PaymentState::Paid {
        return PhaseStatus::Completed;
    }
    if snapshot.manager().is_some() {
        return PhaseStatus::InProgress;
    }
    PhaseStatus::Blocked
}

/// Medical evaluation phase, gated on confirmed payment.
///
/// - completed: request closed (or cancelled with a doctor assigned)
/// - in_progress: doctor assigned
/// - pending: paid, doctor assignment is the single remaining step
/// - blocked: payment not confirmed yet
pub fn evaluation_status(snapshot: &RequestSnapshot) -> PhaseStatus {
    if snapshot.operative_state == OperativeState::Cancelled {
        return if snapshot.doctor().is_some() {
            PhaseStatus::Completed
        } else {
            PhaseStatus::Pending
        };
    }
    if snapshot.operative_state == OperativeState::Closed {
        return PhaseStatus::Completed;
    }
    if snapshot.doctor().is_some() {
        return PhaseStatus::InProgress;
    }
    if snapshot.payment_state == PaymentState::Paid {
        return PhaseStatus::Pending;
    }
    PhaseStatus::Blocked
}

/// Waiting note for the payment phase, if any.
pub fn payment_note(snapshot: &RequestSnapshot) -> Option<&'static str> {
    match payment_status(snapshot) {
        PhaseStatus::Blocked => Some(PAYMENT_BLOCKED_NOTE),
        _ => None,
    }
}

/// Waiting note for the evaluation phase, if any.
///
/// The pending note only applies on live requests; a cancelled request that
/// never reached evaluation has nothing left to wait for.
pub fn evaluation_note(snapshot: &RequestSnapshot) -> Option<&'static str> {
    match evaluation_status(snapshot) {
        PhaseStatus::Blocked => Some(EVALUATION_BLOCKED_NOTE),
        PhaseStatus::Pending if !snapshot.is_terminal() => Some(EVALUATION_PENDING_NOTE),
        _ => None,
    }
}

/// Whether the request is in a terminal state (closed or cancelled).
pub fn is_terminal(snapshot: &RequestSnapshot) -> bool {
    snapshot.is_terminal()
}

/// Rendering-ready aggregate of the three phase classifications.
///
/// Recomputed from the latest snapshot on every render; holds no state of
/// its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkflowOverview {
    pub administrative: PhaseStatus,
    pub payment: PhaseStatus,
    pub evaluation: PhaseStatus,
    pub payment_note: Option<&'static str>,
    pub evaluation_note: Option<&'static str>,
    pub terminal: bool,
}

impl WorkflowOverview {
    /// Classify all three phases of the given snapshot.
    pub fn of(snapshot: &RequestSnapshot) -> Self {
        Self {
            administrative: administrative_status(snapshot),
            payment: payment_status(snapshot),
            evaluation: evaluation_status(snapshot),
            payment_note: payment_note(snapshot),
            evaluation_note: evaluation_note(snapshot),
            terminal: snapshot.is_terminal(),
        }
    }
}
