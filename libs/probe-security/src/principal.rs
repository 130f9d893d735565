//! The principal source consumed by identity diagnostics.
//!
//! Hosting layers expose whatever identity they authenticated through
//! [`ClaimsPrincipal`]. Principals that carry no claims, or whose claim
//! enumeration can fail (remote directories, lazily decoded tokens), report
//! that through [`PrincipalError`] instead of panicking.

use thiserror::Error;

use crate::claims::Claim;

/// Errors raised while reading a principal's identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrincipalError {
    /// No authenticated identity is attached to the request.
    #[error("no authenticated principal is associated with the request")]
    NotAuthenticated,

    /// The identity was authenticated but does not expose claims.
    #[error("principal '{authentication_type}' identity is not claims-bearing")]
    NotClaimsBearing { authentication_type: String },

    /// Claim enumeration failed part way through.
    #[error("failed to enumerate claims: {0}")]
    Enumeration(String),
}

/// An authenticated (or anonymous) principal as presented by the hosting layer.
pub trait ClaimsPrincipal: Send + Sync {
    /// Whether the hosting layer completed authentication for this principal.
    fn is_authenticated(&self) -> bool;

    /// Authentication scheme, e.g. `Negotiate`, `Federation`.
    fn authentication_type(&self) -> Option<&str>;

    /// Every claim in source order; duplicate types are allowed.
    ///
    /// # Errors
    ///
    /// - `NotClaimsBearing` if the identity carries no claim set
    /// - `Enumeration` if the claim source fails while being read
    fn claims(&self) -> Result<Vec<Claim>, PrincipalError>;
}
