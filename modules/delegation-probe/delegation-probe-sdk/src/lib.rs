//! Delegation Probe SDK
//!
//! This crate provides the public API for the `delegation_probe` module:
//!
//! - [`DelegationProbeClient`] - Public API trait for consumers
//! - [`BackendConnector`] / [`BackendConnection`] - Seam to the backend data store
//! - [`DiagnosticReport`] - The two-slot report (edge identity, backend identity)
//! - [`Failure`] / [`FailureKind`] - Uniform failure representation
//! - [`ConnectionDescriptor`] - Resolved connection string with redaction
//!
//! ## Usage
//!
//! ```ignore
//! use delegation_probe_sdk::DelegationProbeClient;
//!
//! let report = probe.run_diagnostics(Some(&identity)).await;
//! let json = serde_json::to_string_pretty(&report)?;
//! ```

pub mod api;
pub mod backend;
pub mod descriptor;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::DelegationProbeClient;
pub use backend::{BackendConnection, BackendConnector, IdentityRow};
pub use descriptor::ConnectionDescriptor;
pub use error::{BackendError, BoxError, DescriptorError};
pub use models::{
    BackendIdentitySnapshot, ClaimSet, DiagnosticReport, Failure, FailureKind, Outcome,
};
