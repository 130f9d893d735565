//! Report models for the delegation probe.
//!
//! A [`DiagnosticReport`] always holds both halves: what the service boundary
//! believes the caller is (`identity_result`) and what the backend believes
//! is running the query (`backend_result`). Each half is an [`Outcome`], so a
//! failure in one never blanks the other.

use indexmap::IndexMap;
use indexmap::map::Iter;
use probe_security::Claim;
use serde::{Deserialize, Serialize};

/// Claim type to claim value, in first-seen order.
///
/// Inserting an existing type replaces its value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(IndexMap<String, String>);

impl ClaimSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim, returning the value it replaced.
    pub fn insert(&mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(claim_type.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, claim_type: &str) -> Option<&str> {
        self.0.get(claim_type).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        let mut set = Self::new();
        for claim in iter {
            set.insert(claim.claim_type, claim.value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The backend's own view of who is running the introspection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendIdentitySnapshot {
    pub server_version: String,
    /// Effective database user the query runs as.
    pub current_user: String,
    /// Login that opened the connection, before any impersonation.
    pub original_login: String,
    /// Server-level login currently in effect.
    pub effective_server_login: String,
}

/// Classification of a failed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// No principal, an unauthenticated principal, or one without claims.
    IdentityUnavailable,
    /// The backend could not be reached or rejected the credential.
    ConnectionFailure,
    /// The introspection query failed or returned undecodable data.
    QueryFailure,
    /// The introspection query returned no row.
    EmptyResult,
    /// The connection string was missing or malformed.
    Configuration,
    /// A probe panicked.
    ProbeFault,
}

/// A failed probe: short message plus the full diagnostic detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    pub detail: String,
}

impl Failure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: detail.into(),
        }
    }
}

/// Either a probe's value or the reason it could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    Failed(Failure),
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[must_use]
    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure().map(|f| f.kind)
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// Edge identity next to backend identity, for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub identity_result: Outcome<ClaimSet>,
    pub backend_result: Outcome<BackendIdentitySnapshot>,
}
