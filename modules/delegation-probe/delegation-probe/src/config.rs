//! Configuration for the delegation probe.

use std::collections::BTreeMap;
use std::fmt;

use delegation_probe_sdk::ConnectionDescriptor;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, IntrospectionDialect};

/// Configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelegationProbeConfig {
    /// Connection string key probed by `run_diagnostics`.
    pub connection_name: String,

    /// Named backend connection strings.
    pub connection_strings: ConnectionStrings,

    /// Introspection dialect; detected from the connection string when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<IntrospectionDialect>,
}

impl Default for DelegationProbeConfig {
    fn default() -> Self {
        Self {
            connection_name: "Default".to_owned(),
            connection_strings: ConnectionStrings::default(),
            dialect: None,
        }
    }
}

/// Named connection strings. Lookup ignores ASCII case.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionStrings(BTreeMap<String, String>);

impl ConnectionStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, connection_string: &str) -> Self {
        self.0.insert(name.to_owned(), connection_string.to_owned());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve `name` to a validated descriptor.
    ///
    /// # Errors
    ///
    /// - `MissingConnection` if no entry matches `name`
    /// - `AmbiguousConnection` if there is no exact match and several entries
    ///   match `name` ignoring case
    /// - `InvalidConnection` if the entry is empty or malformed
    pub fn resolve(&self, name: &str) -> Result<ConnectionDescriptor, DomainError> {
        let (key, raw) = match self.0.get_key_value(name) {
            Some(entry) => entry,
            None => self.find_ignoring_case(name)?,
        };

        ConnectionDescriptor::parse(key.as_str(), raw).map_err(|source| {
            DomainError::InvalidConnection {
                name: key.clone(),
                source,
            }
        })
    }

    fn find_ignoring_case(&self, name: &str) -> Result<(&String, &String), DomainError> {
        let mut matches = self.0.iter().filter(|(k, _)| k.eq_ignore_ascii_case(name));
        let first = matches.next().ok_or_else(|| DomainError::MissingConnection {
            name: name.to_owned(),
        })?;

        let others: Vec<&str> = matches.map(|(k, _)| k.as_str()).collect();
        if others.is_empty() {
            return Ok(first);
        }
        let candidates = std::iter::once(first.0.as_str())
            .chain(others)
            .collect::<Vec<_>>()
            .join(", ");
        Err(DomainError::AmbiguousConnection {
            name: name.to_owned(),
            candidates,
        })
    }
}

impl fmt::Debug for ConnectionStrings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, raw) in &self.0 {
            match ConnectionDescriptor::parse(name.as_str(), raw) {
                Ok(descriptor) => map.entry(name, &descriptor.redacted()),
                Err(_) => map.entry(name, &"<invalid>"),
            };
        }
        map.finish()
    }
}
