//! Delegation probe wiring.

use std::sync::Arc;

use delegation_probe_sdk::{BackendConnector, DelegationProbeClient};
use tracing::{info, warn};

use crate::config::DelegationProbeConfig;
use crate::domain::{DelegationProbeLocalClient, Service};

/// Build the public client from configuration and a backend connector.
#[tracing::instrument(skip_all, fields(connection_name))]
#[must_use]
pub fn build_client(
    cfg: DelegationProbeConfig,
    connector: Arc<dyn BackendConnector>,
) -> Arc<dyn DelegationProbeClient> {
    tracing::Span::current().record("connection_name", cfg.connection_name.as_str());
    if cfg.connection_strings.is_empty() {
        warn!("No connection strings configured; every backend probe will report a configuration failure");
    }
    info!(
        connection_count = cfg.connection_strings.len(),
        dialect = ?cfg.dialect,
        "Initializing delegation_probe"
    );

    let svc = Arc::new(Service::new(cfg, connector));
    Arc::new(DelegationProbeLocalClient::new(svc))
}
