//! Configuration loading: defaults, then an optional YAML file, then
//! `DELEGATION_PROBE__*` environment variables (`__` separates nested keys).

use std::path::Path;

use anyhow::{Context, ensure};
use delegation_probe::DelegationProbeConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};

pub const ENV_PREFIX: &str = "DELEGATION_PROBE__";

/// Load the probe configuration.
///
/// # Errors
///
/// Returns an error if `path` does not exist or any source fails to deserialize.
pub fn load(path: Option<&Path>) -> anyhow::Result<DelegationProbeConfig> {
    let mut figment = Figment::from(Serialized::defaults(DelegationProbeConfig::default()));
    if let Some(path) = path {
        ensure!(path.is_file(), "config file {} not found", path.display());
        figment = figment.merge(Yaml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("invalid delegation probe configuration")
}
