//! `sqlx`-backed connector for Postgres, MySQL/MariaDB and SQLite.
//!
//! `sqlx` has no SQL Server driver, so ADO-style and `mssql://` descriptors
//! are refused with `UnsupportedDriver`; a SQL Server driver plugs in through
//! its own [`BackendConnector`].

use async_trait::async_trait;
use delegation_probe_sdk::{
    BackendConnection, BackendConnector, BackendError, ConnectionDescriptor, IdentityRow,
};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Connection, Row};
use tracing::debug;

const SUPPORTED_SCHEMES: &[&str] = &["postgres", "postgresql", "mysql", "mariadb", "sqlite"];

/// Opens one `AnyConnection` per probe using the credential embedded in the
/// descriptor, or the driver's ambient default (e.g. `PGUSER`, peer auth).
pub struct SqlxConnector;

impl SqlxConnector {
    #[must_use]
    pub fn new() -> Self {
        sqlx::any::install_default_drivers();
        Self
    }
}

impl Default for SqlxConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendConnector for SqlxConnector {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn BackendConnection>, BackendError> {
        let scheme = descriptor.scheme().unwrap_or("sqlserver");
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(BackendError::UnsupportedDriver {
                scheme: scheme.to_owned(),
            });
        }

        let conn = AnyConnection::connect(descriptor.expose())
            .await
            .map_err(BackendError::connect)?;
        debug!(backend_name = conn.backend_name(), "Backend connection opened");
        Ok(Box::new(SqlxConnection { conn }))
    }
}

struct SqlxConnection {
    conn: AnyConnection,
}

#[async_trait]
impl BackendConnection for SqlxConnection {
    async fn fetch_identity_rows(&mut self, query: &str) -> Result<Vec<IdentityRow>, BackendError> {
        // Only the first row is read; later rows are never decoded.
        let row = sqlx::query(query)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(BackendError::query)?;
        Ok(row.as_ref().map(decode_row).transpose()?.into_iter().collect())
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.conn.close().await {
            debug!(error = %e, "Backend connection did not close cleanly");
        }
    }
}

fn decode_row(row: &AnyRow) -> Result<IdentityRow, BackendError> {
    let text = |idx: usize| row.try_get::<String, _>(idx).map_err(BackendError::query);
    Ok(IdentityRow {
        server_version: text(0)?,
        current_user: text(1)?,
        original_login: text(2)?,
        server_login: text(3)?,
    })
}
