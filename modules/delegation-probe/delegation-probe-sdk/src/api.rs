//! Public API trait for the delegation probe.

use async_trait::async_trait;
use probe_security::ClaimsPrincipal;

use crate::models::DiagnosticReport;

/// Public API trait for the delegation probe.
///
/// Both operations are infallible: every failure, including a missing
/// connection string, is reported inside the returned [`DiagnosticReport`].
///
/// ```ignore
/// let report = probe.run_diagnostics(Some(&identity)).await;
/// if let (Some(claims), Some(db)) = (report.identity_result.ok(), report.backend_result.ok()) {
///     // compare claims["name"] with db.original_login
/// }
/// ```
#[async_trait]
pub trait DelegationProbeClient: Send + Sync {
    /// Run diagnostics against the configured default connection.
    async fn run_diagnostics(&self, principal: Option<&dyn ClaimsPrincipal>) -> DiagnosticReport;

    /// Run diagnostics against a named connection string.
    async fn run_diagnostics_for(
        &self,
        principal: Option<&dyn ClaimsPrincipal>,
        connection_name: &str,
    ) -> DiagnosticReport;
}
