//! S3 Smoke - run the smoke-test scenarios from one binary
//!
//! Runs the named scenarios (all of them by default) in order and stops at
//! the first failure, exiting with that scenario's code.
#![recursion_limit = "256"]

use clap::Parser;
use s3_smoke::harness::{exit, run_from_env, shutdown_signal};
use s3_smoke::telemetry::{init_subscriber, DEFAULT_DIRECTIVE};
use s3_smoke::Scenario;
use std::process::ExitCode;
use tracing::info;

/// End-to-end smoke tests for S3-compatible storage and IAM access keys
#[derive(Parser, Debug)]
#[command(name = "s3-smoke")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenarios to run, in order (default: all)
    #[arg(value_enum)]
    scenarios: Vec<Scenario>,

    /// Print the scenario names and exit
    #[arg(long)]
    list: bool,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = DEFAULT_DIRECTIVE)]
    log_level: String,
}

impl Args {
    fn selected(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.scenarios.clone()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.list {
        for scenario in Scenario::ALL {
            println!("{scenario}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    init_subscriber(&args.log_level)?;
    info!("Starting s3-smoke v{}", s3_smoke::VERSION);

    for scenario in args.selected() {
        info!(scenario = %scenario, "running scenario");
        let code = run_from_env(scenario, shutdown_signal()).await;
        if code != exit::SUCCESS {
            return Ok(ExitCode::from(code));
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_every_scenario() {
        let args = Args::parse_from(["s3-smoke"]);
        assert_eq!(args.selected(), Scenario::ALL.to_vec());
        assert_eq!(args.log_level, "warn");
        assert!(!args.list);
    }

    #[test]
    fn test_scenarios_by_binary_name() {
        let args = Args::parse_from(["s3-smoke", "s3-basics", "iam-policy-test"]);
        assert_eq!(
            args.selected(),
            vec![Scenario::Basics, Scenario::IamPolicy]
        );
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        assert!(Args::try_parse_from(["s3-smoke", "s3-nope"]).is_err());
    }
}
