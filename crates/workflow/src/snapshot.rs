//! Domain model for request snapshots.
//!
//! A [`RequestSnapshot`] is an immutable, point-in-time copy of a request's
//! server-side record. It is created by a successful read, replaced
//! wholesale after every successful write, and never mutated in place.
//! Everything else in this crate is a pure projection over it.

use chrono::{DateTime, NaiveDate, Utc};
use cmep_types::{CurrencyCode, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Workflow enumerations
// ============================================================================

/// Server-authoritative workflow stage of a request.
///
/// Exactly one value at a time. The ladder runs
/// Registered → ManagerAssigned → Paid → DoctorAssigned → Closed, with
/// Cancelled reachable from any non-terminal stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperativeState {
    /// Request created, nobody assigned yet.
    Registered,
    /// An administrative manager has been assigned.
    ManagerAssigned,
    /// Payment confirmed by the server.
    Paid,
    /// A doctor has been assigned for the medical evaluation.
    DoctorAssigned,
    /// Request completed and closed. Terminal.
    Closed,
    /// Request cancelled. Terminal, may coexist with partial progress.
    Cancelled,
}

impl OperativeState {
    /// Whether no further transitions are expected from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, OperativeState::Closed | OperativeState::Cancelled)
    }

    /// The wire spelling of the state, also used for display.
    pub fn as_wire(self) -> &'static str {
        match self {
            OperativeState::Registered => "REGISTERED",
            OperativeState::ManagerAssigned => "MANAGER_ASSIGNED",
            OperativeState::Paid => "PAID",
            OperativeState::DoctorAssigned => "DOCTOR_ASSIGNED",
            OperativeState::Closed => "CLOSED",
            OperativeState::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OperativeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Server-derived payment summary for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Unpaid,
    Paid,
}

/// Outcome recorded for the medical certificate, once set.
///
/// An unset certificate state is modelled as `Option::None` on the
/// snapshot, not as a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateState {
    Approved,
    Observed,
}

/// Role kinds that can hold a current assignment on a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleKind {
    Manager,
    Doctor,
}

// ============================================================================
// Action tokens
// ============================================================================

/// Opaque write-action identifiers supplied by the server.
///
/// The server computes which of these are currently executable from role
/// and state; the client treats the shipped set as the sole source of
/// truth and never derives membership itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionToken {
    AssignManager,
    ChangeManager,
    AssignDoctor,
    ChangeDoctor,
    RegisterPayment,
    EditFields,
    SetCertificateState,
    Close,
    Cancel,
    Override,
}

impl ActionToken {
    /// Every token the client understands, in display order.
    pub const ALL: [ActionToken; 10] = [
        ActionToken::AssignManager,
        ActionToken::ChangeManager,
        ActionToken::AssignDoctor,
        ActionToken::ChangeDoctor,
        ActionToken::RegisterPayment,
        ActionToken::EditFields,
        ActionToken::SetCertificateState,
        ActionToken::Close,
        ActionToken::Cancel,
        ActionToken::Override,
    ];

    /// Convert to the wire format string.
    pub fn as_wire(self) -> &'static str {
        match self {
            ActionToken::AssignManager => "ASSIGN_MANAGER",
            ActionToken::ChangeManager => "CHANGE_MANAGER",
            ActionToken::AssignDoctor => "ASSIGN_DOCTOR",
            ActionToken::ChangeDoctor => "CHANGE_DOCTOR",
            ActionToken::RegisterPayment => "REGISTER_PAYMENT",
            ActionToken::EditFields => "EDIT_FIELDS",
            ActionToken::SetCertificateState => "SET_CERTIFICATE_STATE",
            ActionToken::Close => "CLOSE",
            ActionToken::Cancel => "CANCEL",
            ActionToken::Override => "OVERRIDE",
        }
    }

    /// Parse from the wire format string.
    ///
    /// Returns `None` for tokens this client does not understand; the wire
    /// boundary skips those rather than failing the whole snapshot.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "ASSIGN_MANAGER" => Some(ActionToken::AssignManager),
            "CHANGE_MANAGER" => Some(ActionToken::ChangeManager),
            "ASSIGN_DOCTOR" => Some(ActionToken::AssignDoctor),
            "CHANGE_DOCTOR" => Some(ActionToken::ChangeDoctor),
            "REGISTER_PAYMENT" => Some(ActionToken::RegisterPayment),
            "EDIT_FIELDS" => Some(ActionToken::EditFields),
            "SET_CERTIFICATE_STATE" => Some(ActionToken::SetCertificateState),
            "CLOSE" => Some(ActionToken::Close),
            "CANCEL" => Some(ActionToken::Cancel),
            "OVERRIDE" => Some(ActionToken::Override),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// The set of actions the server currently permits for a snapshot.
///
/// A thin wrapper over a finite set so that membership is a total,
/// exception-free check. Replaced together with the snapshot it arrived
/// on; never patched locally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermittedActions(BTreeSet<ActionToken>);

impl PermittedActions {
    /// Creates an empty set (no actions permitted).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the server permits the given action on this snapshot.
    pub fn contains(&self, token: ActionToken) -> bool {
        self.0.contains(&token)
    }

    /// Adds a token to the set.
    pub fn insert(&mut self, token: ActionToken) {
        self.0.insert(token);
    }

    /// Iterates the permitted tokens in their canonical order.
    pub fn iter(&self) -> impl Iterator<Item = ActionToken> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<ActionToken> for PermittedActions {
    fn from_iter<I: IntoIterator<Item = ActionToken>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Assignments and payments
// ============================================================================

/// The person currently holding a role on a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub person_id: i64,
    pub display_name: NonEmptyText,
}

/// Current assignees per role kind.
///
/// Each role has at most one current assignee; prior assignees live in a
/// separate append-only history that is not part of the snapshot model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignments {
    pub manager: Option<Assignment>,
    pub doctor: Option<Assignment>,
}

impl Assignments {
    /// The current assignee for the given role kind, if any.
    pub fn get(&self, role: RoleKind) -> Option<&Assignment> {
        match role {
            RoleKind::Manager => self.manager.as_ref(),
            RoleKind::Doctor => self.doctor.as_ref(),
        }
    }

    /// Whether the given role currently has an assignee.
    pub fn has(&self, role: RoleKind) -> bool {
        self.get(role).is_some()
    }
}

/// One recorded payment. Append-only from the client's viewpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRecord {
    /// Channel the payment arrived through (wallet, transfer, cash, ...).
    pub channel: Option<NonEmptyText>,
    /// Date the payment was made, as reported by the payer.
    pub paid_on: Option<NaiveDate>,
    pub amount: f64,
    pub currency: CurrencyCode,
    /// Transaction reference from the payment channel.
    pub reference: Option<NonEmptyText>,
    /// When the back office validated the payment, if it has.
    pub validated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Request snapshot
// ============================================================================

/// Immutable point-in-time copy of a request's server-side record.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSnapshot {
    pub request_id: i64,
    /// Human-facing request code, assigned by the server.
    pub code: Option<String>,
    pub operative_state: OperativeState,
    pub payment_state: PaymentState,
    /// `None` until an evaluation outcome has been recorded.
    pub certificate_state: Option<CertificateState>,
    /// Kind of attention requested (on-site, remote, ...). Free-form,
    /// server-validated; required before the request can be closed.
    pub attention_type: Option<NonEmptyText>,
    pub assignments: Assignments,
    pub payments: Vec<PaymentRecord>,
    pub permitted_actions: PermittedActions,
    /// Present only on cancelled requests.
    pub cancellation_reason: Option<NonEmptyText>,
}

impl RequestSnapshot {
    /// A freshly registered request: no assignments, no payments, nothing
    /// permitted yet. Useful as a baseline to build richer snapshots from.
    pub fn registered(request_id: i64) -> Self {
        Self {
            request_id,
            code: None,
            operative_state: OperativeState::Registered,
            payment_state: PaymentState::Unpaid,
            certificate_state: None,
            attention_type: None,
            assignments: Assignments::default(),
            payments: Vec::new(),
            permitted_actions: PermittedActions::new(),
            cancellation_reason: None,
        }
    }

    /// Whether no further transitions are expected for this request.
    pub fn is_terminal(&self) -> bool {
        self.operative_state.is_terminal()
    }

    /// The current manager assignment, if any.
    pub fn manager(&self) -> Option<&Assignment> {
        self.assignments.get(RoleKind::Manager)
    }

    /// The current doctor assignment, if any.
    pub fn doctor(&self) -> Option<&Assignment> {
        self.assignments.get(RoleKind::Doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_closed_and_cancelled() {
        assert!(OperativeState::Closed.is_terminal());
        assert!(OperativeState::Cancelled.is_terminal());
        assert!(!OperativeState::Registered.is_terminal());
        assert!(!OperativeState::ManagerAssigned.is_terminal());
        assert!(!OperativeState::Paid.is_terminal());
        assert!(!OperativeState::DoctorAssigned.is_terminal());
    }

    #[test]
    fn action_tokens_round_trip_through_wire_strings() {
        for token in ActionToken::ALL {
            assert_eq!(ActionToken::from_wire(token.as_wire()), Some(token));
        }
    }

    #[test]
    fn unknown_wire_token_parses_to_none() {
        assert_eq!(ActionToken::from_wire("REOPEN"), None);
        assert_eq!(ActionToken::from_wire(""), None);
        assert_eq!(ActionToken::from_wire("close"), None);
    }

    #[test]
    fn permitted_actions_membership_is_exact() {
        let actions: PermittedActions =
            [ActionToken::AssignManager, ActionToken::Cancel].into_iter().collect();
        assert!(actions.contains(ActionToken::AssignManager));
        assert!(actions.contains(ActionToken::Cancel));
        assert!(!actions.contains(ActionToken::Close));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn registered_baseline_has_nothing_recorded() {
        let snapshot = RequestSnapshot::registered(42);
        assert_eq!(snapshot.request_id, 42);
        assert_eq!(snapshot.operative_state, OperativeState::Registered);
        assert_eq!(snapshot.payment_state, PaymentState::Unpaid);
        assert!(snapshot.manager().is_none());
        assert!(snapshot.doctor().is_none());
        assert!(snapshot.payments.is_empty());
        assert!(snapshot.permitted_actions.is_empty());
        assert!(!snapshot.is_terminal());
    }

    #[test]
    fn assignments_lookup_by_role_kind() {
        let assignments = Assignments {
            manager: Some(Assignment {
                person_id: 7,
                display_name: NonEmptyText::new("Ana Quispe").expect("valid"),
            }),
            doctor: None,
        };
        assert!(assignments.has(RoleKind::Manager));
        assert!(!assignments.has(RoleKind::Doctor));
        assert_eq!(
            assignments.get(RoleKind::Manager).map(|a| a.person_id),
            Some(7)
        );
    }
}
