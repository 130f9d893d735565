//! Delegation Probe Module
//!
//! Verifies that a caller's identity survives a multi-hop authentication
//! chain. The service collects the claims the edge authenticated and, in
//! parallel, asks the backend database which login it sees for a connection
//! opened with the ambient credential. Both answers are returned side by side
//! so a mismatch (typically a service account instead of the end user) is
//! visible.
//!
//! ## Layout
//!
//! - `config` - connection strings and dialect override
//! - `domain` - claims collector, backend probe, aggregating service
//! - `infra` - `sqlx` connector
//! - `module` - wiring into a `DelegationProbeClient`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

#[cfg(test)]
mod test_support;

pub use config::{ConnectionStrings, DelegationProbeConfig};
pub use domain::{IntrospectionDialect, Service};
pub use infra::SqlxConnector;
pub use module::build_client;
