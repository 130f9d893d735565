//! Local (in-process) client for the delegation probe.

use std::sync::Arc;

use async_trait::async_trait;
use delegation_probe_sdk::{DelegationProbeClient, DiagnosticReport};
use probe_security::ClaimsPrincipal;

use super::Service;

/// Local client wrapping the service.
pub struct DelegationProbeLocalClient {
    svc: Arc<Service>,
}

impl DelegationProbeLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl DelegationProbeClient for DelegationProbeLocalClient {
    async fn run_diagnostics(&self, principal: Option<&dyn ClaimsPrincipal>) -> DiagnosticReport {
        self.svc.run_diagnostics(principal).await
    }

    async fn run_diagnostics_for(
        &self,
        principal: Option<&dyn ClaimsPrincipal>,
        connection_name: &str,
    ) -> DiagnosticReport {
        self.svc
            .run_diagnostics_for(principal, connection_name)
            .await
    }
}
