//! # abt CLI entry point
//!
//! Parses command-line arguments, initializes tracing from the verbosity
//! flag, and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abt_cli::decide::{run_decide, DecideArgs};
use abt_cli::presets::{run_presets, PresetsArgs};
use abt_cli::sweep::{run_sweep, SweepArgs};
use abt_cli::threshold::{run_threshold, ThresholdArgs};

/// Investment threshold for cleaner technology under audited emissions taxes.
///
/// Computes the fixed adoption cost below which a risk-averse, possibly
/// under-reporting firm switches to a cleaner technology, with its actual
/// and declared emissions under each technology.
#[derive(Parser, Debug)]
#[command(name = "abt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate the investment threshold of a scenario.
    Threshold(ThresholdArgs),

    /// Solve both technologies at one investment cost.
    Decide(DecideArgs),

    /// Locate the threshold along one parameter axis.
    Sweep(SweepArgs),

    /// List the built-in scenarios.
    Presets(PresetsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "abt starting");

    let result = match &cli.command {
        Commands::Threshold(args) => run_threshold(args),
        Commands::Decide(args) => run_decide(args),
        Commands::Sweep(args) => run_sweep(args),
        Commands::Presets(args) => run_presets(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use abt_core::{Preset, UncertaintyMode};
    use abt_engine::SweepAxis;

    #[test]
    fn cli_parse_threshold_with_preset() {
        let cli = Cli::try_parse_from(["abt", "threshold", "--preset", "partial-baseline"]).unwrap();
        match cli.command {
            Commands::Threshold(args) => {
                assert_eq!(args.scenario.preset, Some(Preset::PartialBaseline));
                assert!(!args.output.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_threshold_overrides() {
        let cli = Cli::try_parse_from([
            "abt",
            "threshold",
            "--scenario",
            "scenario.yaml",
            "--mode",
            "full",
            "--i-max",
            "2000",
            "--ff",
            "40",
            "--json",
            "--out",
            "result.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Threshold(args) => {
                assert_eq!(args.scenario.scenario, Some(PathBuf::from("scenario.yaml")));
                assert_eq!(args.scenario.mode, Some(UncertaintyMode::Full));
                assert_eq!(args.scenario.i_max, Some(2000));
                assert_eq!(args.scenario.ff, Some(40.0));
                assert!(args.output.json);
                assert_eq!(args.output.out, Some(PathBuf::from("result.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_scenario_and_preset_conflict() {
        let result = Cli::try_parse_from([
            "abt",
            "threshold",
            "--scenario",
            "s.yaml",
            "--preset",
            "full-baseline",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_decide_requires_investment() {
        assert!(Cli::try_parse_from(["abt", "decide"]).is_err());
        let cli = Cli::try_parse_from(["abt", "decide", "--investment", "1905"]).unwrap();
        assert!(matches!(cli.command, Commands::Decide(ref a) if a.investment == 1905.0));
    }

    #[test]
    fn cli_parse_sweep() {
        let cli = Cli::try_parse_from([
            "abt", "sweep", "--param", "pi", "--from", "0.2", "--to", "1.0", "--steps", "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert_eq!(args.param, SweepAxis::MonitoringProbability);
                assert_eq!(args.steps, 9);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_unknown_mode_errors() {
        assert!(Cli::try_parse_from(["abt", "threshold", "--mode", "fuzzy"]).is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["abt", "presets"]).unwrap();
        assert_eq!(cli0.verbose, 0);
        let cli2 = Cli::try_parse_from(["abt", "-vv", "presets"]).unwrap();
        assert_eq!(cli2.verbose, 2);
        let cli3 = Cli::try_parse_from(["abt", "presets", "-vvv"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["abt"]).is_err());
    }
}
