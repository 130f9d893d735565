use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use delegation_probe_sdk::{
    BackendConnector, ClaimSet, ConnectionDescriptor, DiagnosticReport, Failure, FailureKind,
    Outcome,
};
use futures::FutureExt;
use probe_security::ClaimsPrincipal;
use tracing::{error, info, warn};

use super::{BackendIdentityProbe, ClaimsCollector};
use crate::config::{ConnectionStrings, DelegationProbeConfig};

/// Delegation diagnostics service.
///
/// Runs the claims collector and the backend probe side by side and merges
/// both outcomes into one [`DiagnosticReport`]. No method here fails or
/// panics: a probe that errors or panics is reported as a [`Failure`] in its
/// own slot and the other slot is still filled.
pub struct Service {
    probe: BackendIdentityProbe,
    connections: ConnectionStrings,
    connection_name: String,
}

impl Service {
    #[must_use]
    pub fn new(cfg: DelegationProbeConfig, connector: Arc<dyn BackendConnector>) -> Self {
        Self {
            probe: BackendIdentityProbe::new(connector, cfg.dialect),
            connections: cfg.connection_strings,
            connection_name: cfg.connection_name,
        }
    }

    pub async fn run_diagnostics(&self, principal: Option<&dyn ClaimsPrincipal>) -> DiagnosticReport {
        self.run_diagnostics_for(principal, &self.connection_name)
            .await
    }

    #[tracing::instrument(skip_all, fields(connection = connection_name))]
    pub async fn run_diagnostics_for(
        &self,
        principal: Option<&dyn ClaimsPrincipal>,
        connection_name: &str,
    ) -> DiagnosticReport {
        match self.connections.resolve(connection_name) {
            Ok(descriptor) => self.run_with_descriptor(principal, &descriptor).await,
            Err(e) => {
                warn!(error = %e, "Connection string unavailable, backend probe skipped");
                let report = DiagnosticReport {
                    identity_result: collect_guarded(principal),
                    backend_result: Outcome::Failed(e.into_failure(None)),
                };
                log_report(&report);
                report
            }
        }
    }

    /// Run both probes against an already resolved descriptor.
    pub async fn run_with_descriptor(
        &self,
        principal: Option<&dyn ClaimsPrincipal>,
        descriptor: &ConnectionDescriptor,
    ) -> DiagnosticReport {
        let identity = async { collect_guarded(principal) };
        let backend = AssertUnwindSafe(self.probe.probe(descriptor))
            .catch_unwind()
            .map(recover_backend);

        let (identity_result, backend_result) = tokio::join!(identity, backend);

        let report = DiagnosticReport {
            identity_result,
            backend_result,
        };
        log_report(&report);
        report
    }
}

fn recover_backend<T>(result: std::thread::Result<Outcome<T>>) -> Outcome<T> {
    result.unwrap_or_else(|payload| fault("backend identity probe", &*payload))
}

fn collect_guarded(principal: Option<&dyn ClaimsPrincipal>) -> Outcome<ClaimSet> {
    catch_unwind(AssertUnwindSafe(|| ClaimsCollector::collect(principal)))
        .unwrap_or_else(|payload| fault("claims collector", &*payload))
}

fn fault<T>(component: &str, payload: &(dyn Any + Send)) -> Outcome<T> {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());

    error!(component, reason = %reason, "Diagnostic probe panicked");
    Outcome::Failed(Failure::new(
        FailureKind::ProbeFault,
        format!("{component} panicked"),
        format!("{component} panicked: {reason}"),
    ))
}

fn log_report(report: &DiagnosticReport) {
    info!(
        identity_ok = report.identity_result.is_ok(),
        identity_failure = ?report.identity_result.failure_kind(),
        backend_ok = report.backend_result.is_ok(),
        backend_failure = ?report.backend_result.failure_kind(),
        "Delegation diagnostics completed"
    );
}
