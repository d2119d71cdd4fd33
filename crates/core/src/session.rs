//! Snapshot session: the single held copy of a request.
//!
//! The viewing context owns exactly one current [`RequestSnapshot`], which
//! is replaced wholesale after every successful network round trip and is
//! never patched optimistically. A failed write leaves the held snapshot
//! untouched, so the classifier keeps reflecting the last known-good
//! server state; a conflict additionally demands a re-fetch, because the
//! server-side record has moved under us.

use crate::error::ActionError;
use cmep_workflow::RequestSnapshot;

/// What the transport hands back for every write action: a full
/// replacement snapshot on success, a categorized error otherwise.
pub type WriteOutcome = Result<RequestSnapshot, ActionError>;

/// The follow-up the surrounding application must perform after a write
/// outcome has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing to do; render from the (possibly replaced) snapshot.
    None,
    /// Re-fetch the request to resynchronize the held snapshot.
    Refetch,
    /// The request is gone; navigate back to the list view.
    BackToList,
}

/// Result of applying a write outcome to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub recovery: Recovery,
    /// User-visible message, present for every failed write.
    pub message: Option<String>,
}

/// Message shown when a write hits a permission denial.
pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized to perform this action.";

/// Message shown when the request changed concurrently.
pub const CONFLICT_MESSAGE: &str = "The request was modified elsewhere. Reloading the latest copy.";

/// Message shown when the request no longer exists.
pub const NOT_FOUND_MESSAGE: &str = "Request not found.";

/// Fallback message when the server gave no usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "The action could not be completed.";

/// Owner of the current request snapshot for one viewing context.
///
/// Created from the first successful read and discarded when the view is
/// torn down. Single-owner and synchronous; classification is always run
/// against [`SnapshotSession::snapshot`] after the latest apply, never
/// against a cached copy.
#[derive(Clone, Debug)]
pub struct SnapshotSession {
    current: RequestSnapshot,
}

impl SnapshotSession {
    /// Start a session from the snapshot a successful read returned.
    pub fn new(snapshot: RequestSnapshot) -> Self {
        Self { current: snapshot }
    }

    /// The current snapshot. Classify and gate from this, every render.
    pub fn snapshot(&self) -> &RequestSnapshot {
        &self.current
    }

    /// Replace the held snapshot after a successful re-read.
    pub fn replace(&mut self, snapshot: RequestSnapshot) {
        self.current = snapshot;
    }

    /// Apply the outcome of a write action.
    ///
    /// On success the held snapshot is replaced with the server-confirmed
    /// copy. On failure the snapshot is left untouched and the returned
    /// [`Applied`] carries the user-visible message plus the recovery the
    /// application must run (re-fetch on conflict, back-to-list on
    /// not-found).
    pub fn apply_write(&mut self, outcome: WriteOutcome) -> Applied {
        match outcome {
            Ok(snapshot) => {
                tracing::debug!(
                    request_id = snapshot.request_id,
                    "write confirmed; snapshot replaced"
                );
                self.current = snapshot;
                Applied {
                    recovery: Recovery::None,
                    message: None,
                }
            }
            Err(ActionError::Unauthorized { detail }) => {
                tracing::warn!(request_id = self.current.request_id, %detail, "write denied");
                Applied {
                    recovery: Recovery::None,
                    message: Some(UNAUTHORIZED_MESSAGE.to_owned()),
                }
            }
            Err(ActionError::Conflict { detail }) => {
                tracing::warn!(
                    request_id = self.current.request_id,
                    %detail,
                    "write conflicted; re-fetch required"
                );
                Applied {
                    recovery: Recovery::Refetch,
                    message: Some(CONFLICT_MESSAGE.to_owned()),
                }
            }
            Err(ActionError::Validation { detail }) => {
                let message = if detail.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_owned()
                } else {
                    detail
                };
                Applied {
                    recovery: Recovery::None,
                    message: Some(message),
                }
            }
            Err(ActionError::NotFound) => {
                tracing::warn!(request_id = self.current.request_id, "request vanished");
                Applied {
                    recovery: Recovery::BackToList,
                    message: Some(NOT_FOUND_MESSAGE.to_owned()),
                }
            }
            Err(ActionError::Other { status, detail }) => {
                tracing::warn!(
                    request_id = self.current.request_id,
                    status,
                    %detail,
                    "write failed"
                );
                let message = if detail.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_owned()
                } else {
                    detail
                };
                Applied {
                    recovery: Recovery::None,
                    message: Some(message),
                }
            }
        }
    }
}
