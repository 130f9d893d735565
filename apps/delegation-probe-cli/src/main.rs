//! `delegation-probe` command line.
//!
//! Builds a claims identity from `--claim` pairs, runs the delegation
//! diagnostics against the configured backend and prints the report as JSON
//! on stdout. Probe failures are part of the report; the exit code only
//! reflects configuration and I/O errors.

mod logging;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use delegation_probe::{DelegationProbeConfig, SqlxConnector, build_client};
use delegation_probe_sdk::DiagnosticReport;
use probe_security::{Claim, ClaimsIdentity, ClaimsPrincipal};
use tracing::info;

use crate::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "delegation-probe",
    version,
    about = "Compare the caller's claims with the login a backend database observes"
)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Connection string name to probe (overrides `connection_name`)
    #[arg(long, value_name = "NAME")]
    connection: Option<String>,

    /// Caller claim as TYPE=VALUE; repeat for more claims
    #[arg(long = "claim", value_name = "TYPE=VALUE", value_parser = parse_claim)]
    claims: Vec<Claim>,

    /// Authentication type of the caller identity
    #[arg(long, default_value = "Negotiate")]
    auth_type: String,

    /// Probe without a caller identity
    #[arg(long, conflicts_with = "claims")]
    anonymous: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn parse_claim(raw: &str) -> Result<Claim, String> {
    let (claim_type, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=VALUE, got '{raw}'"))?;
    let claim_type = claim_type.trim();
    if claim_type.is_empty() {
        return Err("claim type must not be empty".to_owned());
    }
    Ok(Claim::new(claim_type, value))
}

impl Cli {
    /// Load configuration and apply the command-line overrides.
    fn load_config(&self) -> anyhow::Result<DelegationProbeConfig> {
        let mut cfg = settings::load(self.config.as_deref())?;
        if let Some(name) = &self.connection {
            cfg.connection_name.clone_from(name);
        }
        info!(
            connection_name = %cfg.connection_name,
            connection_count = cfg.connection_strings.len(),
            anonymous = self.anonymous,
            claim_count = self.claims.len(),
            "Running delegation diagnostics"
        );
        Ok(cfg)
    }

    fn identity(&self) -> Option<ClaimsIdentity> {
        if self.anonymous {
            return None;
        }
        Some(
            ClaimsIdentity::builder()
                .authentication_type(self.auth_type.as_str())
                .claims(self.claims.clone())
                .build(),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let cfg = cli.load_config()?;
    let client = build_client(cfg, Arc::new(SqlxConnector::new()));
    let identity = cli.identity();
    let principal = identity.as_ref().map(|i| i as &dyn ClaimsPrincipal);
    let report: DiagnosticReport = client.run_diagnostics(principal).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to serialize diagnostic report")?;
    println!("{json}");

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use probe_security::claim_types;

    use super::*;

    #[test]
    fn parses_claim_pair() {
        let claim = parse_claim("role=Intranet Users").unwrap();

        assert_eq!(claim.claim_type, "role");
        assert_eq!(claim.value, "Intranet Users");
    }

    #[test]
    fn claim_value_may_contain_equals() {
        let claim = parse_claim("upn=a=b@contoso.com").unwrap();

        assert_eq!(claim.claim_type, "upn");
        assert_eq!(claim.value, "a=b@contoso.com");
    }

    #[test]
    fn rejects_claim_without_separator() {
        assert!(parse_claim("alice").is_err());
        assert!(parse_claim(" =alice").is_err());
    }

    #[test]
    fn builds_authenticated_identity_from_claims() {
        let name = format!("{}=CONTOSO\\alice", claim_types::NAME);
        let role = format!("{}=Intranet Users", claim_types::ROLE);
        let cli = Cli::try_parse_from([
            "delegation-probe",
            "--claim",
            name.as_str(),
            "--claim",
            role.as_str(),
        ])
        .unwrap();

        let identity = cli.identity().unwrap();
        assert!(identity.is_authenticated());
        assert_eq!(identity.authentication_type(), Some("Negotiate"));
        assert_eq!(identity.name(), Some("CONTOSO\\alice"));
        assert_eq!(identity.claims().len(), 2);
    }

    #[test]
    fn anonymous_passes_no_identity() {
        let cli = Cli::try_parse_from(["delegation-probe", "--anonymous"]).unwrap();

        assert!(cli.identity().is_none());
    }

    #[test]
    fn anonymous_conflicts_with_claims() {
        let result =
            Cli::try_parse_from(["delegation-probe", "--anonymous", "--claim", "name=alice"]);

        assert!(result.is_err());
    }

    #[test]
    fn connection_flag_overrides_configured_name() {
        let cli = Cli::try_parse_from(["delegation-probe", "--connection", "Reporting"]).unwrap();

        let cfg = temp_env::with_vars_unset(
            [
                "DELEGATION_PROBE__CONNECTION_NAME",
                "DELEGATION_PROBE__CONNECTION_STRINGS__DEFAULT",
                "DELEGATION_PROBE__DIALECT",
            ],
            || cli.load_config(),
        )
        .unwrap();

        assert_eq!(cfg.connection_name, "Reporting");
    }

    #[test]
    fn missing_config_file_fails_startup() {
        let cli = Cli::try_parse_from([
            "delegation-probe",
            "--config",
            "/nonexistent/delegation-probe.yaml",
        ])
        .unwrap();

        assert!(cli.load_config().is_err());
    }

    #[test]
    fn parses_connection_and_log_format() {
        let cli = Cli::try_parse_from([
            "delegation-probe",
            "--connection",
            "Reporting",
            "--log-format",
            "json",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.connection.as_deref(), Some("Reporting"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.pretty);
    }
}
