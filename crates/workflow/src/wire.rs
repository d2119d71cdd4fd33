//! Request snapshot wire model and JSON translation helpers.
//!
//! This module is the deserialization boundary of the crate: the remote
//! request-detail resource is parsed here, strictly, and every malformed
//! document is rejected before a snapshot ever reaches the classifier
//! (which is total over well-formed snapshots and never validates).
//!
//! Responsibilities:
//! - Define a strict wire model for serialisation/deserialisation
//! - Provide translation helpers between domain types and the wire model
//! - Validate snapshot structure and enforce required fields
//!
//! Notes:
//! - Unknown *keys* fail the parse (`deny_unknown_fields`): a shape drift
//!   between client and server must be loud.
//! - Unknown *action tokens* do not: the policy table grows server-side,
//!   and a token this client cannot name is simply one it will never
//!   enable. They are skipped with a warning.

use crate::snapshot::{
    ActionToken, Assignment, Assignments, CertificateState, OperativeState, PaymentRecord,
    PaymentState, PermittedActions, RequestSnapshot,
};
use crate::WorkflowError;
use chrono::{DateTime, NaiveDate, Utc};
use cmep_types::{CurrencyCode, NonEmptyText};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public SnapshotCodec operations
// ============================================================================

/// Request snapshot codec operations.
///
/// This is a zero-sized type used for namespacing snapshot parse/render
/// operations. All methods are associated functions.
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Parse a request snapshot from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path"
    /// (e.g. `payments[0].currency`) to the failing field when the JSON
    /// does not match the wire schema.
    ///
    /// # Arguments
    ///
    /// * `json_text` - JSON text expected to represent a request snapshot.
    ///
    /// # Returns
    ///
    /// Returns a [`RequestSnapshot`] with domain-level fields extracted
    /// from the document.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if:
    /// - the JSON does not represent a valid request snapshot,
    /// - any field has an unexpected type or enum value,
    /// - any unknown keys are present (due to `#[serde(deny_unknown_fields)]`),
    /// - a display name is blank or a currency code is malformed.
    pub fn parse(json_text: &str) -> Result<RequestSnapshot, WorkflowError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, RequestSnapshotWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(WorkflowError::Translation(format!(
                    "Request snapshot schema mismatch at {path}: {source}"
                )));
            }
        };

        // Convert wire format to domain types
        wire_to_domain(wire)
    }

    /// Render a request snapshot as JSON text.
    ///
    /// This converts a domain-level [`RequestSnapshot`] into wire format
    /// and serializes it to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if serialization fails.
    pub fn render(snapshot: &RequestSnapshot) -> Result<String, WorkflowError> {
        let wire = domain_to_wire(snapshot);
        serde_json::to_string_pretty(&wire).map_err(|e| {
            WorkflowError::Translation(format!("Failed to serialize request snapshot: {e}"))
        })
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a request snapshot.
///
/// This is the exact structure that will be serialized to/from JSON.
/// All structs use `#[serde(deny_unknown_fields)]` for strict validation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct RequestSnapshotWire {
    pub request_id: i64,
    pub code: Option<String>,
    pub operative_state: OperativeState,
    pub payment_state: PaymentState,
    pub certificate_state: Option<CertificateState>,
    pub attention_type: Option<String>,
    pub assignments: AssignmentsWire,
    pub payments: Vec<PaymentWire>,
    pub permitted_actions: Vec<String>,
    pub cancellation_reason: Option<String>,
}

/// Wire representation of current assignments, keyed by role kind.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct AssignmentsWire {
    #[serde(rename = "MANAGER")]
    pub manager: Option<AssignmentWire>,
    #[serde(rename = "DOCTOR")]
    pub doctor: Option<AssignmentWire>,
}

/// Wire representation of one current assignment.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct AssignmentWire {
    pub person_id: i64,
    pub display_name: String,
}

/// Wire representation of one payment record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct PaymentWire {
    pub channel: Option<String>,
    pub paid_on: Option<NaiveDate>,
    pub amount: f64,
    pub currency: String,
    pub reference: Option<String>,
    pub validated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Convert wire format snapshot to domain types.
///
/// This performs validation of names, currencies and action tokens.
fn wire_to_domain(wire: RequestSnapshotWire) -> Result<RequestSnapshot, WorkflowError> {
    let manager = wire
        .assignments
        .manager
        .map(|a| assignment_to_domain(a, "MANAGER"))
        .transpose()?;
    let doctor = wire
        .assignments
        .doctor
        .map(|a| assignment_to_domain(a, "DOCTOR"))
        .transpose()?;

    let attention_type = wire
        .attention_type
        .map(|t| {
            NonEmptyText::new(&t)
                .map_err(|_| WorkflowError::InvalidValue("attention_type cannot be blank".into()))
        })
        .transpose()?;

    let mut payments = Vec::with_capacity(wire.payments.len());
    for (index, payment) in wire.payments.into_iter().enumerate() {
        payments.push(payment_to_domain(payment, index)?);
    }

    let mut permitted_actions = PermittedActions::new();
    for token in &wire.permitted_actions {
        match ActionToken::from_wire(token) {
            Some(parsed) => permitted_actions.insert(parsed),
            None => tracing::warn!("skipping unknown action token: {token}"),
        }
    }

    // The reason only means something on a cancelled request; anywhere else
    // it is stale data from the server and is dropped rather than trusted.
    let cancellation_reason = match wire.cancellation_reason {
        Some(reason) if wire.operative_state == OperativeState::Cancelled => {
            match NonEmptyText::new(&reason) {
                Ok(text) => Some(text),
                Err(_) => {
                    tracing::warn!("dropping blank cancellation reason");
                    None
                }
            }
        }
        Some(_) => {
            tracing::warn!("dropping cancellation reason on non-cancelled request");
            None
        }
        None => None,
    };

    Ok(RequestSnapshot {
        request_id: wire.request_id,
        code: wire.code,
        operative_state: wire.operative_state,
        payment_state: wire.payment_state,
        certificate_state: wire.certificate_state,
        attention_type,
        assignments: Assignments { manager, doctor },
        payments,
        permitted_actions,
        cancellation_reason,
    })
}

fn assignment_to_domain(wire: AssignmentWire, role: &str) -> Result<Assignment, WorkflowError> {
    let display_name = NonEmptyText::new(&wire.display_name).map_err(|_| {
        WorkflowError::InvalidValue(format!("{role} assignment display_name cannot be blank"))
    })?;
    Ok(Assignment {
        person_id: wire.person_id,
        display_name,
    })
}

fn payment_to_domain(wire: PaymentWire, index: usize) -> Result<PaymentRecord, WorkflowError> {
    let channel = wire
        .channel
        .map(|c| {
            NonEmptyText::new(&c).map_err(|_| {
                WorkflowError::InvalidValue(format!("payments[{index}].channel cannot be blank"))
            })
        })
        .transpose()?;
    let currency = CurrencyCode::new(&wire.currency).map_err(|e| {
        WorkflowError::InvalidValue(format!("payments[{index}].currency: {e}"))
    })?;
    let reference = wire
        .reference
        .map(|r| {
            NonEmptyText::new(&r).map_err(|_| {
                WorkflowError::InvalidValue(format!("payments[{index}].reference cannot be blank"))
            })
        })
        .transpose()?;

    Ok(PaymentRecord {
        channel,
        paid_on: wire.paid_on,
        amount: wire.amount,
        currency,
        reference,
        validated_at: wire.validated_at,
    })
}

/// Convert domain types to wire format.
fn domain_to_wire(snapshot: &RequestSnapshot) -> RequestSnapshotWire {
    RequestSnapshotWire {
        request_id: snapshot.request_id,
        code: snapshot.code.clone(),
        operative_state: snapshot.operative_state,
        payment_state: snapshot.payment_state,
        certificate_state: snapshot.certificate_state,
        attention_type: snapshot.attention_type.as_ref().map(|t| t.as_str().to_owned()),
        assignments: AssignmentsWire {
            manager: snapshot.manager().map(assignment_to_wire),
            doctor: snapshot.doctor().map(assignment_to_wire),
        },
        payments: snapshot.payments.iter().map(payment_to_wire).collect(),
        permitted_actions: snapshot
            .permitted_actions
            .iter()
            .map(|t| t.as_wire().to_owned())
            .collect(),
        cancellation_reason: snapshot
            .cancellation_reason
            .as_ref()
            .map(|r| r.as_str().to_owned()),
    }
}

fn assignment_to_wire(assignment: &Assignment) -> AssignmentWire {
    AssignmentWire {
        person_id: assignment.person_id,
        display_name: assignment.display_name.as_str().to_owned(),
    }
}

fn payment_to_wire(payment: &PaymentRecord) -> PaymentWire {
    PaymentWire {
        channel: payment.channel.as_ref().map(|c| c.as_str().to_owned()),
        paid_on: payment.paid_on,
        amount: payment.amount,
        currency: payment.currency.as_str().to_owned(),
        reference: payment.reference.as_ref().map(|r| r.as_str().to_owned()),
        validated_at: payment.validated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "request_id": 310,
  "code": "CMEP-2025-0310",
  "operative_state": "PAID",
  "payment_state": "PAID",
  "certificate_state": null,
  "attention_type": "ON_SITE",
  "assignments": {
    "MANAGER": { "person_id": 41, "display_name": "Ana Quispe" }
  },
  "payments": [
    {
      "channel": "WALLET",
      "paid_on": "2025-03-14",
      "amount": 150.0,
      "currency": "PEN",
      "reference": "TX-99812",
      "validated_at": "2025-03-15T09:30:00Z"
    }
  ],
  "permitted_actions": ["EDIT_FIELDS", "REGISTER_PAYMENT", "ASSIGN_DOCTOR", "CANCEL"],
  "cancellation_reason": null
}"#;

    #[test]
    fn parses_sample_document() {
        let snapshot = SnapshotCodec::parse(SAMPLE).expect("parse sample");
        assert_eq!(snapshot.request_id, 310);
        assert_eq!(snapshot.code.as_deref(), Some("CMEP-2025-0310"));
        assert_eq!(snapshot.operative_state, OperativeState::Paid);
        assert_eq!(snapshot.payment_state, PaymentState::Paid);
        assert_eq!(snapshot.certificate_state, None);
        assert_eq!(
            snapshot.manager().map(|a| a.display_name.as_str()),
            Some("Ana Quispe")
        );
        assert!(snapshot.doctor().is_none());
        assert_eq!(snapshot.payments.len(), 1);
        assert_eq!(snapshot.payments[0].currency.as_str(), "PEN");
        assert!(snapshot.permitted_actions.contains(ActionToken::AssignDoctor));
        assert!(!snapshot.permitted_actions.contains(ActionToken::Close));
    }

    #[test]
    fn round_trips_sample_document() {
        let snapshot = SnapshotCodec::parse(SAMPLE).expect("parse sample");
        let rendered = SnapshotCodec::render(&snapshot).expect("render snapshot");
        let reparsed = SnapshotCodec::parse(&rendered).expect("reparse rendered");
        assert_eq!(snapshot, reparsed);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = SAMPLE.replacen("\"request_id\"", "\"unexpected_key\": 1,\n  \"request_id\"", 1);
        let err = SnapshotCodec::parse(&input).expect_err("should reject unknown key");
        match err {
            WorkflowError::Translation(msg) => assert!(msg.contains("unexpected_key")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_validation_rejects_wrong_types() {
        let input = SAMPLE.replace("\"request_id\": 310", "\"request_id\": \"310\"");
        let err = SnapshotCodec::parse(&input).expect_err("should reject wrong type");
        match err {
            WorkflowError::Translation(msg) => assert!(msg.contains("request_id")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn reports_path_to_nested_mismatch() {
        let input = SAMPLE.replace("\"currency\": \"PEN\"", "\"currency\": 604");
        let err = SnapshotCodec::parse(&input).expect_err("should reject nested mismatch");
        match err {
            WorkflowError::Translation(msg) => {
                assert!(msg.contains("payments[0].currency"), "message was: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_operative_state() {
        let input = SAMPLE.replace("\"operative_state\": \"PAID\"", "\"operative_state\": \"ARCHIVED\"");
        let err = SnapshotCodec::parse(&input).expect_err("should reject unknown state");
        match err {
            WorkflowError::Translation(msg) => assert!(msg.contains("operative_state")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_action_tokens_are_skipped_not_fatal() {
        let input = SAMPLE.replace("\"CANCEL\"", "\"CANCEL\", \"REOPEN\"");
        let snapshot = SnapshotCodec::parse(&input).expect("unknown token must not fail parse");
        assert!(snapshot.permitted_actions.contains(ActionToken::Cancel));
        assert_eq!(snapshot.permitted_actions.len(), 4);
    }

    #[test]
    fn rejects_blank_display_name() {
        let input = SAMPLE.replace("Ana Quispe", "   ");
        let err = SnapshotCodec::parse(&input).expect_err("should reject blank name");
        match err {
            WorkflowError::InvalidValue(msg) => assert!(msg.contains("MANAGER")),
            other => panic!("expected InvalidValue error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_currency() {
        let input = SAMPLE.replace("\"currency\": \"PEN\"", "\"currency\": \"pen\"");
        let err = SnapshotCodec::parse(&input).expect_err("should reject lowercase currency");
        match err {
            WorkflowError::InvalidValue(msg) => assert!(msg.contains("payments[0].currency")),
            other => panic!("expected InvalidValue error, got {other:?}"),
        }
    }

    #[test]
    fn drops_cancellation_reason_on_live_request() {
        let input = SAMPLE.replace(
            "\"cancellation_reason\": null",
            "\"cancellation_reason\": \"client desisted\"",
        );
        let snapshot = SnapshotCodec::parse(&input).expect("should parse");
        assert_eq!(snapshot.cancellation_reason, None);
    }

    #[test]
    fn keeps_cancellation_reason_on_cancelled_request() {
        let input = SAMPLE
            .replace("\"operative_state\": \"PAID\"", "\"operative_state\": \"CANCELLED\"")
            .replace(
                "\"cancellation_reason\": null",
                "\"cancellation_reason\": \"client desisted\"",
            );
        let snapshot = SnapshotCodec::parse(&input).expect("should parse");
        assert_eq!(
            snapshot.cancellation_reason.as_ref().map(|r| r.as_str()),
            Some("client desisted")
        );
    }

    #[test]
    fn missing_required_field_is_reported() {
        let input = SAMPLE.replace("\"payment_state\": \"PAID\",\n", "");
        let err = SnapshotCodec::parse(&input).expect_err("should reject missing field");
        match err {
            WorkflowError::Translation(msg) => assert!(msg.contains("payment_state")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn parses_minimal_document_without_assignments() {
        let input = r#"{
  "request_id": 7,
  "operative_state": "REGISTERED",
  "payment_state": "UNPAID",
  "assignments": {},
  "payments": [],
  "permitted_actions": []
}"#;
        let snapshot = SnapshotCodec::parse(input).expect("should parse minimal document");
        assert_eq!(snapshot.request_id, 7);
        assert!(snapshot.manager().is_none());
        assert!(snapshot.doctor().is_none());
        assert!(snapshot.payments.is_empty());
        assert!(snapshot.permitted_actions.is_empty());
        assert_eq!(snapshot.attention_type, None);
    }
}
