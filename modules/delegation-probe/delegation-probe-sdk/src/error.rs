//! Error types for the delegation probe seams.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a [`BackendConnector`](crate::BackendConnector) or
/// [`BackendConnection`](crate::BackendConnection).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or rejected the credential.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// The introspection query failed to execute or its row could not be decoded.
    #[error("query failed: {0}")]
    Query(#[source] BoxError),

    /// No driver is available for the descriptor's backend.
    #[error("no driver available for '{scheme}' connection strings")]
    UnsupportedDriver { scheme: String },
}

impl BackendError {
    #[must_use]
    pub fn connect(e: impl Into<BoxError>) -> Self {
        Self::Connect(e.into())
    }

    #[must_use]
    pub fn query(e: impl Into<BoxError>) -> Self {
        Self::Query(e.into())
    }
}

/// Errors raised while parsing a connection string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("connection string is empty")]
    Empty,

    #[error("malformed connection string: {reason}")]
    Malformed { reason: String },
}
