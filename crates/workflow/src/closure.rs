//! Close-eligibility pre-check.
//!
//! Before offering the close confirmation form, the UI checks that every
//! closing prerequisite is met and, when some are not, lists *all* of the
//! missing items rather than a generic refusal. This is a usability
//! contract only: the server remains the final arbiter and will reject an
//! ineligible close regardless of what this check said.

use crate::snapshot::RequestSnapshot;

/// One prerequisite for closing a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CloseRequirement {
    ManagerAssigned,
    AttentionTypeSet,
    PaymentRecorded,
    DoctorAssigned,
    CertificateStateSet,
}

impl CloseRequirement {
    /// Checklist wording shown to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            CloseRequirement::ManagerAssigned => "Manager assigned",
            CloseRequirement::AttentionTypeSet => "Attention type set",
            CloseRequirement::PaymentRecorded => "At least one payment recorded",
            CloseRequirement::DoctorAssigned => "Doctor assigned",
            CloseRequirement::CertificateStateSet => "Certificate state set",
        }
    }
}

impl std::fmt::Display for CloseRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every closing prerequisite not yet met by the snapshot.
///
/// Returns the complete list, in checklist order; an empty list means the
/// close confirmation form may be offered.
pub fn missing_close_requirements(snapshot: &RequestSnapshot) -> Vec<CloseRequirement> {
    let mut missing = Vec::new();
    if snapshot.manager().is_none() {
        missing.push(CloseRequirement::ManagerAssigned);
    }
    if snapshot.attention_type.is_none() {
        missing.push(CloseRequirement::AttentionTypeSet);
    }
    if snapshot.payments.is_empty() {
        missing.push(CloseRequirement::PaymentRecorded);
    }
    if snapshot.doctor().is_none() {
        missing.push(CloseRequirement::DoctorAssigned);
    }
    if snapshot.certificate_state.is_none() {
        missing.push(CloseRequirement::CertificateStateSet);
    }
    missing
}

/// Whether the close confirmation form may be offered.
pub fn close_form_available(snapshot: &RequestSnapshot) -> bool {
    missing_close_requirements(snapshot).is_empty()
}
