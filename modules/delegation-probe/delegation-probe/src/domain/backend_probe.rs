use std::sync::Arc;

use delegation_probe_sdk::{
    BackendConnector, BackendIdentitySnapshot, ConnectionDescriptor, IdentityRow, Outcome,
};
use tracing::{info, warn};

use super::{DomainError, IntrospectionDialect};

/// Asks the backend which identity it sees for a connection opened with the
/// ambient credential.
///
/// One connection, one query, no retries. The connection is closed before
/// `probe` returns, whether the query succeeded or not.
pub struct BackendIdentityProbe {
    connector: Arc<dyn BackendConnector>,
    dialect: Option<IntrospectionDialect>,
}

impl BackendIdentityProbe {
    /// `dialect` overrides detection from the connection string.
    #[must_use]
    pub fn new(connector: Arc<dyn BackendConnector>, dialect: Option<IntrospectionDialect>) -> Self {
        Self { connector, dialect }
    }

    #[tracing::instrument(skip_all, fields(connection = %descriptor.name()))]
    pub async fn probe(&self, descriptor: &ConnectionDescriptor) -> Outcome<BackendIdentitySnapshot> {
        let target = descriptor.redacted();
        match self.try_probe(descriptor).await {
            Ok(snapshot) => {
                info!(
                    backend = %target,
                    current_user = %snapshot.current_user,
                    original_login = %snapshot.original_login,
                    "Backend identity probe succeeded"
                );
                Outcome::Ok(snapshot)
            }
            Err(e) => {
                warn!(backend = %target, error = %e, "Backend identity probe failed");
                Outcome::Failed(e.into_failure(Some(&target)))
            }
        }
    }

    async fn try_probe(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<BackendIdentitySnapshot, DomainError> {
        let dialect = self
            .dialect
            .or_else(|| IntrospectionDialect::detect(descriptor))
            .ok_or_else(|| DomainError::UnknownDialect {
                name: descriptor.name().to_owned(),
            })?;

        let mut conn = self.connector.connect(descriptor).await?;
        let rows = conn.fetch_identity_rows(dialect.query()).await;
        conn.close().await;

        // Scalar query: anything past the first row is ignored.
        let row = rows?.into_iter().next().ok_or(DomainError::EmptyResult)?;
        Ok(snapshot_from_row(row))
    }
}

fn snapshot_from_row(row: IdentityRow) -> BackendIdentitySnapshot {
    BackendIdentitySnapshot {
        server_version: row.server_version,
        current_user: row.current_user,
        original_login: row.original_login,
        effective_server_login: row.server_login,
    }
}
