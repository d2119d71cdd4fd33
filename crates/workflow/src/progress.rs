//! Operative-state progress strip.
//!
//! The request detail page renders the operative-state ladder
//! (Registered → ManagerAssigned → Paid → DoctorAssigned → Closed) as a
//! five-step strip with a short description per step. Cancelled requests
//! fall outside the ladder: every step shows as pending and the UI renders
//! a separate cancellation banner. This module produces the pure data for
//! that strip; styling belongs to the rendering layer.

use crate::snapshot::OperativeState;

/// Status of one step relative to the request's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// The request has moved past this step.
    Completed,
    /// The request is at this step right now.
    Current,
    /// The request has not reached this step.
    Pending,
}

/// One rendering-ready step of the progress strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressStep {
    pub state: OperativeState,
    pub label: &'static str,
    pub description: &'static str,
    pub status: StepStatus,
}

/// The ladder of operative states shown in the strip, in workflow order.
pub const STEP_ORDER: [OperativeState; 5] = [
    OperativeState::Registered,
    OperativeState::ManagerAssigned,
    OperativeState::Paid,
    OperativeState::DoctorAssigned,
    OperativeState::Closed,
];

fn label(state: OperativeState) -> &'static str {
    match state {
        OperativeState::Registered => "Registered",
        OperativeState::ManagerAssigned => "Manager assigned",
        OperativeState::Paid => "Paid",
        OperativeState::DoctorAssigned => "Doctor assigned",
        OperativeState::Closed => "Closed",
        OperativeState::Cancelled => "Cancelled",
    }
}

fn description(state: OperativeState) -> &'static str {
    match state {
        OperativeState::Registered => "Request created. A manager still needs to be assigned.",
        OperativeState::ManagerAssigned => "Manager assigned. Payment still needs to be registered.",
        OperativeState::Paid => "Payment registered. A doctor still needs to be assigned.",
        OperativeState::DoctorAssigned => "Doctor assigned. Awaiting evaluation and closure.",
        OperativeState::Closed => "Request completed and closed.",
        OperativeState::Cancelled => "Request cancelled.",
    }
}

/// Build the five-step strip for the given current state.
///
/// Steps before the current state are completed, the current one is
/// current, the rest pending. A cancelled request marks every step pending.
pub fn progress_strip(current: OperativeState) -> [ProgressStep; 5] {
    let current_index = STEP_ORDER.iter().position(|&s| s == current);

    STEP_ORDER.map(|state| {
        let status = match current_index {
            // Cancelled (or anything off the ladder) renders all-pending.
            None => StepStatus::Pending,
            Some(current_index) => {
                let step_index = STEP_ORDER
                    .iter()
                    .position(|&s| s == state)
                    .unwrap_or(usize::MAX);
                if step_index < current_index {
                    StepStatus::Completed
                } else if step_index == current_index {
                    StepStatus::Current
                } else {
                    StepStatus::Pending
                }
            }
        };
        ProgressStep {
            state,
            label: label(state),
            description: description(state),
            status,
        }
    })
}
