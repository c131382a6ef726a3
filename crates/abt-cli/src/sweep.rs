//! # `abt sweep`
//!
//! Threshold along one parameter axis. Exit code 0 when every point
//! succeeded, 2 when at least one point failed (failures are reported per
//! point, not as a command error).
//!
//! ```bash
//! abt sweep --preset certain-baseline --param pi --from 0.2 --to 1.0 --steps 9
//! ```

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use abt_engine::{linspace, sweep, SweepAxis, SweepPoint};

use crate::report::{emit, sweep_text, OutputArgs, Report};
use crate::scenario::ScenarioArgs;

/// `sweep` subcommand arguments.
#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Parameter to vary: pi, tau, rho, ff, alpha or fine_multiplier.
    #[arg(long)]
    pub param: SweepAxis,

    /// First value.
    #[arg(long)]
    pub from: f64,

    /// Last value.
    #[arg(long)]
    pub to: f64,

    /// Number of evenly spaced values, endpoints included.
    #[arg(long, default_value_t = 5)]
    pub steps: usize,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Serialize)]
struct SweepResult<'a> {
    axis: SweepAxis,
    points: &'a [SweepPoint],
}

/// Execute the sweep subcommand.
pub fn run_sweep(args: &SweepArgs) -> Result<u8> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be at least 1");
    }
    let base = args.scenario.resolve()?;
    let values = linspace(args.from, args.to, args.steps);
    let points = sweep(&base, args.param, &values);

    let body = if args.output.json {
        let result = SweepResult {
            axis: args.param,
            points: &points,
        };
        Report::new(&base, &result)?.to_json()?
    } else {
        sweep_text(args.param.as_str(), &points)
    };
    emit(&body, &args.output)?;

    let failed = points.iter().filter(|p| !p.is_ok()).count();
    if failed > 0 {
        tracing::warn!(failed, total = points.len(), "some sweep points failed");
        return Ok(2);
    }
    Ok(0)
}
