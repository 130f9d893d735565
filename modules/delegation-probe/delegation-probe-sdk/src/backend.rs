//! Backend data store seam.
//!
//! The probe never supplies credentials: a connector opens the connection with
//! whatever ambient or delegated credential the hosting process already holds.
//! Implementations exist per driver; tests substitute their own.

use async_trait::async_trait;

use crate::descriptor::ConnectionDescriptor;
use crate::error::BackendError;

/// One row of the introspection query, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRow {
    pub server_version: String,
    pub current_user: String,
    pub original_login: String,
    pub server_login: String,
}

/// Opens connections to the backend data store.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// Open a connection described by `descriptor`.
    ///
    /// # Errors
    ///
    /// - `Connect` if the backend is unreachable or rejects the credential
    /// - `UnsupportedDriver` if the connector cannot talk to this backend
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn BackendConnection>, BackendError>;
}

/// A single open backend connection.
///
/// Dropping a connection releases it; [`close`](Self::close) releases it
/// gracefully and is what the probe calls on every normal exit path.
#[async_trait]
pub trait BackendConnection: Send {
    /// Execute `query` and decode the returned rows. Implementations may stop
    /// after the first row.
    ///
    /// # Errors
    ///
    /// - `Query` if execution fails or a column cannot be read as text
    async fn fetch_identity_rows(&mut self, query: &str) -> Result<Vec<IdentityRow>, BackendError>;

    /// Release the connection.
    async fn close(self: Box<Self>);
}
