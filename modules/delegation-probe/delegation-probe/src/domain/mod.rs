//! Domain layer for the delegation probe.

pub mod backend_probe;
pub mod claims_collector;
pub mod dialect;
pub mod error;
pub mod local_client;
pub mod service;

pub use backend_probe::BackendIdentityProbe;
pub use claims_collector::ClaimsCollector;
pub use dialect::IntrospectionDialect;
pub use error::DomainError;
pub use local_client::DelegationProbeLocalClient;
pub use service::Service;
