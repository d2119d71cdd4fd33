//! # CMEP Core
//!
//! Write-action orchestration around the pure workflow crate.
//!
//! This crate contains the pieces that sit between the transport layer and
//! the classifier:
//! - the error taxonomy write actions come back with
//! - the snapshot session implementing the replace-wholesale /
//!   refetch-on-conflict / keep-on-failure protocol
//!
//! **No transport concerns**: issuing HTTP requests, auth sessions, file
//! upload and list queries belong to the surrounding application. This
//! crate only defines what the transport must hand over
//! ([`WriteOutcome`](session::WriteOutcome)) and what the application must
//! do next ([`Recovery`](session::Recovery)).

pub mod error;
pub mod session;

pub use error::ActionError;
pub use session::{Applied, Recovery, SnapshotSession, WriteOutcome};
