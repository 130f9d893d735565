//! Domain errors for the delegation probe.

use delegation_probe_sdk::{BackendError, DescriptorError, Failure, FailureKind};
use probe_security::PrincipalError;

/// Internal domain errors.
///
/// Never returned to callers: every variant is folded into a [`Failure`]
/// at the probe boundary.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Identity(#[from] PrincipalError),

    #[error("connection string '{name}' is not configured")]
    MissingConnection { name: String },

    #[error("connection string '{name}' matches several entries ignoring case: {candidates}")]
    AmbiguousConnection { name: String, candidates: String },

    #[error("connection string '{name}' is invalid: {source}")]
    InvalidConnection {
        name: String,
        #[source]
        source: DescriptorError,
    },

    #[error("cannot determine introspection dialect for connection '{name}'")]
    UnknownDialect { name: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("introspection query returned no rows")]
    EmptyResult,
}

impl DomainError {
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Identity(_) => FailureKind::IdentityUnavailable,
            Self::MissingConnection { .. }
            | Self::AmbiguousConnection { .. }
            | Self::InvalidConnection { .. }
            | Self::UnknownDialect { .. } => FailureKind::Configuration,
            Self::Backend(BackendError::Connect(_) | BackendError::UnsupportedDriver { .. }) => {
                FailureKind::ConnectionFailure
            }
            Self::Backend(BackendError::Query(_)) => FailureKind::QueryFailure,
            Self::EmptyResult => FailureKind::EmptyResult,
        }
    }

    /// Convert into a report [`Failure`].
    ///
    /// `message` is this error's own text; `detail` is the full source chain,
    /// prefixed with `target` (a redacted connection string) when given.
    #[must_use]
    #[allow(clippy::use_debug)]
    pub fn into_failure(self, target: Option<&str>) -> Failure {
        let kind = self.failure_kind();
        let message = self.to_string();
        let err = anyhow::Error::new(self);
        let detail = match target {
            Some(target) => format!("{:?}", err.context(format!("target: {target}"))),
            None => format!("{err:?}"),
        };
        Failure::new(kind, message, detail)
    }
}
