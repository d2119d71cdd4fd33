//! Action affordance gate.
//!
//! Decides how a write-action button renders: enabled when the server's
//! permitted-action set contains the token, and with which explanation when
//! it does not. [`is_allowed`] is a plain set-membership pass-through; it
//! must add no logic of its own, so that the server stays the only party
//! that ever decides permissions. [`explain_disabled`] draws only on
//! terminal state and phase classification, never on a re-derived
//! permission.

use crate::phase::{Phase, PhaseStatus};
use crate::snapshot::{ActionToken, OperativeState, RequestSnapshot};

/// Explanation shown when a request has been closed.
pub const CLOSED_NOTE: &str = "Request closed.";

/// Explanation shown when a request has been cancelled.
pub const CANCELLED_NOTE: &str = "Request cancelled.";

/// Fallback explanation when no more specific reason applies.
pub const UNAVAILABLE_NOTE: &str = "Not available at this time.";

/// Whether the server permits the given action on this snapshot.
///
/// Pure membership in the snapshot's permitted-action set; total for every
/// token and snapshot shape, and consulted afresh on every render.
pub fn is_allowed(snapshot: &RequestSnapshot, token: ActionToken) -> bool {
    snapshot.permitted_actions.contains(token)
}

/// The UI block, and therefore the phase, a token's button lives in.
pub fn governing_phase(token: ActionToken) -> Phase {
    match token {
        ActionToken::AssignManager
        | ActionToken::ChangeManager
        | ActionToken::EditFields
        | ActionToken::Cancel
        | ActionToken::Override => Phase::Administrative,
        ActionToken::RegisterPayment => Phase::Payment,
        ActionToken::AssignDoctor
        | ActionToken::ChangeDoctor
        | ActionToken::SetCertificateState
        | ActionToken::Close => Phase::Evaluation,
    }
}

/// Human-readable reason a disabled button shows.
///
/// Terminal snapshots explain themselves; otherwise a blocked governing
/// phase lends its blocked note; otherwise the generic fallback. Only
/// meaningful when [`is_allowed`] returned `false`, but harmless to call
/// either way.
pub fn explain_disabled(snapshot: &RequestSnapshot, token: ActionToken) -> &'static str {
    if snapshot.is_terminal() {
        return match snapshot.operative_state {
            OperativeState::Closed => CLOSED_NOTE,
            _ => CANCELLED_NOTE,
        };
    }
    let phase = governing_phase(token);
    if phase.status(snapshot) == PhaseStatus::Blocked {
        if let Some(note) = phase.note(snapshot) {
            return note;
        }
    }
    UNAVAILABLE_NOTE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{EVALUATION_BLOCKED_NOTE, PAYMENT_BLOCKED_NOTE};
    use crate::snapshot::{Assignment, PaymentState, PermittedActions, RequestSnapshot};
    use cmep_types::NonEmptyText;

    fn assignment(person_id: i64, name: &str) -> Assignment {
        Assignment {
            person_id,
            display_name: NonEmptyText::new(name).expect("valid name"),
        }
    }

    #[test]
    fn allowed_is_exact_set_membership() {
        let mut snapshot = RequestSnapshot::registered(1);
        snapshot.permitted_actions =
            [ActionToken::AssignManager, ActionToken::Cancel].into_iter().collect();

        assert!(is_allowed(&snapshot, ActionToken::AssignManager));
        assert!(is_allowed(&snapshot, ActionToken::Cancel));
        assert!(!is_allowed(&snapshot, ActionToken::Close));
        assert!(!is_allowed(&snapshot, ActionToken::Override));
    }

    #[test]
    fn absent_tokens_are_false_on_any_snapshot_shape() {
        // Empty permitted set, minimal snapshot: every token is simply false.
        let snapshot = RequestSnapshot::registered(1);
        for token in ActionToken::ALL {
            assert!(!is_allowed(&snapshot, token));
        }

        // Terminal snapshot with no assignments behaves the same.
        let mut cancelled = RequestSnapshot::registered(2);
        cancelled.operative_state = OperativeState::Cancelled;
        cancelled.permitted_actions = PermittedActions::new();
        for token in ActionToken::ALL {
            assert!(!is_allowed(&cancelled, token));
        }
    }

    #[test]
    fn terminal_requests_explain_their_finality() {
        let mut closed = RequestSnapshot::registered(1);
        closed.operative_state = OperativeState::Closed;
        assert_eq!(explain_disabled(&closed, ActionToken::Close), CLOSED_NOTE);
        assert_eq!(
            explain_disabled(&closed, ActionToken::RegisterPayment),
            CLOSED_NOTE
        );

        let mut cancelled = RequestSnapshot::registered(2);
        cancelled.operative_state = OperativeState::Cancelled;
        assert_eq!(
            explain_disabled(&cancelled, ActionToken::AssignDoctor),
            CANCELLED_NOTE
        );
    }

    #[test]
    fn blocked_phase_lends_its_note() {
        // No manager yet: payment block is blocked, evaluation block is
        // blocked; each token borrows its own block's note.
        let snapshot = RequestSnapshot::registered(1);
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::RegisterPayment),
            PAYMENT_BLOCKED_NOTE
        );
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::AssignDoctor),
            EVALUATION_BLOCKED_NOTE
        );
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::Close),
            EVALUATION_BLOCKED_NOTE
        );
    }

    #[test]
    fn administrative_tokens_fall_back_to_the_generic_note() {
        let snapshot = RequestSnapshot::registered(1);
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::AssignManager),
            UNAVAILABLE_NOTE
        );
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::EditFields),
            UNAVAILABLE_NOTE
        );
    }

    #[test]
    fn unblocked_phase_uses_the_generic_note() {
        let mut snapshot = RequestSnapshot::registered(1);
        snapshot.operative_state = OperativeState::ManagerAssigned;
        snapshot.assignments.manager = Some(assignment(10, "Ana Quispe"));
        snapshot.payment_state = PaymentState::Unpaid;

        // Payment phase is in_progress, so a disabled payment button has no
        // blocking reason to borrow.
        assert_eq!(
            explain_disabled(&snapshot, ActionToken::RegisterPayment),
            UNAVAILABLE_NOTE
        );
    }

    #[test]
    fn every_token_has_a_governing_phase() {
        for token in ActionToken::ALL {
            // Exhaustiveness is the real assertion; the match must not panic.
            let _ = governing_phase(token);
        }
        assert_eq!(governing_phase(ActionToken::RegisterPayment), Phase::Payment);
        assert_eq!(governing_phase(ActionToken::Close), Phase::Evaluation);
        assert_eq!(
            governing_phase(ActionToken::AssignManager),
            Phase::Administrative
        );
    }
}
