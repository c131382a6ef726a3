//! # `abt decide`
//!
//! Solves both technologies at a single investment cost without scanning.

use anyhow::{Context, Result};
use clap::Args;

use abt_engine::ThresholdSearch;

use crate::report::{decision_text, emit, DecisionReport, OutputArgs, Report};
use crate::scenario::ScenarioArgs;

/// `decide` subcommand arguments.
#[derive(Args, Debug, Clone)]
pub struct DecideArgs {
    /// Investment cost of the new technology.
    #[arg(long)]
    pub investment: f64,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the decide subcommand.
pub fn run_decide(args: &DecideArgs) -> Result<u8> {
    let scenario = args.scenario.resolve()?;
    let report = evaluate(&scenario, args.investment)?;

    let body = if args.output.json {
        Report::new(&scenario, &report)?.to_json()?
    } else {
        decision_text(&scenario, &report)
    };
    emit(&body, &args.output)?;
    Ok(0)
}

/// Old and new decisions for `scenario` at `investment`.
pub fn evaluate(scenario: &abt_core::ScenarioConfig, investment: f64) -> Result<DecisionReport> {
    if !(investment.is_finite() && investment >= 0.0) {
        anyhow::bail!("investment cost must be a non-negative number, got {investment}");
    }
    let search = ThresholdSearch::new(scenario).context("invalid scenario")?;
    let old = search.old_decision().context("old-technology decision failed")?;
    let new = search
        .evaluate_new(investment, &old)
        .with_context(|| format!("new-technology decision failed at investment cost {investment}"))?;
    let new_disutility = new.expected_disutility();
    Ok(DecisionReport {
        investment_cost: investment,
        old_disutility: old.disutility,
        new_disutility,
        prefers_new: old.disutility - new_disutility > 0.0,
        old,
        new,
    })
}
