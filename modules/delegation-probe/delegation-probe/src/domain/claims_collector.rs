use delegation_probe_sdk::{ClaimSet, Outcome};
use probe_security::{ClaimsPrincipal, PrincipalError};
use tracing::debug;

use super::DomainError;

/// Reads the caller's claims as seen at the service boundary.
pub struct ClaimsCollector;

impl ClaimsCollector {
    /// Collect every claim of `principal`, last value per claim type wins.
    ///
    /// Absent, unauthenticated, and non-claims-bearing principals, as well as
    /// enumeration errors, come back as an `IdentityUnavailable` failure.
    #[must_use]
    pub fn collect(principal: Option<&dyn ClaimsPrincipal>) -> Outcome<ClaimSet> {
        Self::try_collect(principal)
            .map_err(|e| e.into_failure(None))
            .into()
    }

    fn try_collect(principal: Option<&dyn ClaimsPrincipal>) -> Result<ClaimSet, DomainError> {
        let principal = principal.ok_or(PrincipalError::NotAuthenticated)?;
        if !principal.is_authenticated() {
            return Err(PrincipalError::NotAuthenticated.into());
        }

        let claims: ClaimSet = principal.claims()?.into_iter().collect();
        debug!(
            authentication_type = principal.authentication_type().unwrap_or_default(),
            claim_count = claims.len(),
            "Collected principal claims"
        );
        Ok(claims)
    }
}
