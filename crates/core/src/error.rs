//! Error taxonomy for write actions.
//!
//! Every write against the remote request resource either returns a full
//! replacement snapshot or one of these errors. The transport layer maps
//! its HTTP-style status into the taxonomy with [`ActionError::from_status`]
//! and must never locally reinterpret a failure as success.

/// Categorized failure of a write action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The server denied permission for this write.
    #[error("not authorized: {detail}")]
    Unauthorized { detail: String },

    /// The request changed concurrently; someone else acted first.
    #[error("conflict: {detail}")]
    Conflict { detail: String },

    /// Input accepted locally but rejected by the server.
    #[error("validation failed: {detail}")]
    Validation { detail: String },

    /// The request no longer exists (or never did).
    #[error("request not found")]
    NotFound,

    /// Anything else, with the best detail text available.
    #[error("request failed (status {status}): {detail}")]
    Other { status: u16, detail: String },
}

impl ActionError {
    /// Map an HTTP-style status code and detail text into the taxonomy.
    ///
    /// # Arguments
    ///
    /// * `status` - The numeric status the transport observed.
    /// * `detail` - Server-provided detail text, possibly empty.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            401 | 403 => ActionError::Unauthorized { detail },
            409 => ActionError::Conflict { detail },
            400 | 422 => ActionError::Validation { detail },
            404 => ActionError::NotFound,
            _ => ActionError::Other { status, detail },
        }
    }
}
