//! # `abt threshold`
//!
//! Runs the backward scan for one scenario and reports `[i, i+1)` together
//! with the decisions at the threshold.
//!
//! ```bash
//! abt threshold --preset partial-baseline
//! abt threshold --scenario scenario.yaml --mode full --json --out result.json
//! ```

use anyhow::{Context, Result};
use clap::Args;

use abt_engine::find_threshold;

use crate::report::{emit, threshold_text, OutputArgs, Report};
use crate::scenario::ScenarioArgs;

/// `threshold` subcommand arguments.
#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the threshold subcommand.
pub fn run_threshold(args: &ThresholdArgs) -> Result<u8> {
    let scenario = args.scenario.resolve()?;
    let result = find_threshold(&scenario)
        .with_context(|| format!("threshold search failed for scenario \"{}\"", scenario.name))?;

    let body = if args.output.json {
        Report::new(&scenario, &result)?.to_json()?
    } else {
        threshold_text(&scenario, &result)
    };
    emit(&body, &args.output)?;
    Ok(0)
}
