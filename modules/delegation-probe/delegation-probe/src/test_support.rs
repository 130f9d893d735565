#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use delegation_probe_sdk::{
    BackendConnection, BackendConnector, BackendError, ConnectionDescriptor, IdentityRow,
};
use probe_security::{Claim, ClaimsPrincipal, PrincipalError};

#[must_use]
pub fn identity_row(
    server_version: &str,
    current_user: &str,
    original_login: &str,
    server_login: &str,
) -> IdentityRow {
    IdentityRow {
        server_version: server_version.to_owned(),
        current_user: current_user.to_owned(),
        original_login: original_login.to_owned(),
        server_login: server_login.to_owned(),
    }
}

pub enum ConnectBehavior {
    Accept,
    /// Connect succeeds, then the query panics.
    AcceptThenPanic,
    Refuse(&'static str),
    Unsupported,
}

#[derive(Default)]
struct Counters {
    attempts: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    dropped: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

/// Connector double that records every acquisition and release.
pub struct TrackingConnector {
    behavior: ConnectBehavior,
    rows: Result<Vec<IdentityRow>, &'static str>,
    counters: Arc<Counters>,
}

impl TrackingConnector {
    pub fn new(
        behavior: ConnectBehavior,
        rows: Result<Vec<IdentityRow>, &'static str>,
    ) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            rows,
            counters: Arc::default(),
        })
    }

    pub fn returning(rows: Vec<IdentityRow>) -> Arc<Self> {
        Self::new(ConnectBehavior::Accept, Ok(rows))
    }

    pub fn attempts(&self) -> usize {
        self.counters.attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Connections opened but not yet dropped.
    pub fn live(&self) -> usize {
        self.opened() - self.counters.dropped.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.counters.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendConnector for TrackingConnector {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn BackendConnection>, BackendError> {
        self.counters.attempts.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            ConnectBehavior::Accept | ConnectBehavior::AcceptThenPanic => {}
            ConnectBehavior::Refuse(msg) => return Err(BackendError::connect(msg)),
            ConnectBehavior::Unsupported => {
                return Err(BackendError::UnsupportedDriver {
                    scheme: descriptor.scheme().unwrap_or("ado").to_owned(),
                });
            }
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackingConnection {
            rows: self.rows.clone(),
            panic_on_query: matches!(self.behavior, ConnectBehavior::AcceptThenPanic),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct TrackingConnection {
    rows: Result<Vec<IdentityRow>, &'static str>,
    panic_on_query: bool,
    counters: Arc<Counters>,
}

#[async_trait]
impl BackendConnection for TrackingConnection {
    async fn fetch_identity_rows(&mut self, query: &str) -> Result<Vec<IdentityRow>, BackendError> {
        self.counters.queries.lock().unwrap().push(query.to_owned());
        assert!(!self.panic_on_query, "driver bug: result set freed twice");
        self.rows.clone().map_err(BackendError::query)
    }

    async fn close(self: Box<Self>) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for TrackingConnection {
    fn drop(&mut self) {
        self.counters.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Connector whose `connect` panics.
pub struct PanickingConnector;

#[async_trait]
impl BackendConnector for PanickingConnector {
    async fn connect(
        &self,
        _descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn BackendConnection>, BackendError> {
        panic!("driver bug: null handle");
    }
}

/// Principal whose claim enumeration panics.
pub struct PanickingPrincipal;

impl ClaimsPrincipal for PanickingPrincipal {
    fn is_authenticated(&self) -> bool {
        true
    }

    fn authentication_type(&self) -> Option<&str> {
        Some("Federation")
    }

    fn claims(&self) -> Result<Vec<Claim>, PrincipalError> {
        panic!("claims provider bug");
    }
}
