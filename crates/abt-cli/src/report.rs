//! # Reports
//!
//! Text reports print emissions to four decimals, with violation levels
//! labelled `Vo`, `Vn`, `Vnh`, `Vnl`. JSON reports wrap the engine result in
//! an envelope carrying the generation time and the scenario digest.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use abt_core::{ScenarioConfig, ScenarioDigest, Technology};
use abt_engine::{ComplianceDecision, NewTechnologyOutcome, SweepPoint, TechnologyPlan, ThresholdResult};

/// Output selection shared by the computing subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Emit a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// JSON report envelope.
#[derive(Debug, Serialize)]
pub struct Report<'a, T: Serialize> {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// `sha256:<hex>` of the scenario.
    pub scenario_digest: String,
    /// The scenario as evaluated.
    pub scenario: &'a ScenarioConfig,
    /// The engine result.
    pub result: &'a T,
}

impl<'a, T: Serialize> Report<'a, T> {
    /// Wrap `result` computed from `scenario`.
    pub fn new(scenario: &'a ScenarioConfig, result: &'a T) -> Result<Self> {
        let digest = ScenarioDigest::of(scenario).context("failed to digest scenario")?;
        Ok(Self {
            generated_at: Utc::now(),
            scenario_digest: digest.to_string(),
            scenario,
            result,
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }
}

/// Write `body` to `--out` or stdout.
pub fn emit(body: &str, output: &OutputArgs) -> Result<()> {
    match &output.out {
        Some(path) => write_file(path, body),
        None => {
            println!("{body}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("failed to write report: {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// `Vo`, `Vn`, `Vnh` or `Vnl`.
pub fn violation_label(technology: Technology) -> String {
    format!("V{}", technology.label())
}

fn plan_line(out: &mut String, plan: &TechnologyPlan) {
    let _ = writeln!(
        out,
        "  {:<14} e = {:>9.4}  r = {:>9.4}  {:<3} = {:.4}",
        plan.technology.to_string(),
        plan.emissions,
        plan.declared_emissions,
        violation_label(plan.technology),
        plan.violation
    );
}

fn outcome_lines(out: &mut String, old: &ComplianceDecision, new: &NewTechnologyOutcome) {
    plan_line(out, &TechnologyPlan::from(old));
    for plan in new.plans() {
        plan_line(out, &plan);
    }
    if let NewTechnologyOutcome::Full { decision } = new {
        let _ = writeln!(
            out,
            "  plan:          {:?}, low-cost cap {}",
            decision.branch,
            if decision.regime.exceeds_cap() { "exceeded" } else { "respected" }
        );
    }
}

/// Text report for a threshold result.
pub fn threshold_text(scenario: &ScenarioConfig, result: &ThresholdResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "scenario:   {} ({})", scenario.name, result.mode);
    let _ = writeln!(
        out,
        "threshold:  [{}, {})",
        result.lower_bound, result.upper_bound
    );
    let _ = writeln!(out, "decisions at i = {}:", result.lower_bound);
    outcome_lines(&mut out, &result.old, &result.new);
    let _ = writeln!(out, "D_old:      {:.4}", result.old_disutility);
    let _ = writeln!(out, "D_new:      {:.4}", result.new_disutility);
    let _ = write!(out, "iterations: {}", result.iterations);
    out
}

/// Decisions at one investment cost, as reported by `abt decide`.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    /// Investment cost evaluated.
    pub investment_cost: f64,
    /// Old-technology decision.
    pub old: ComplianceDecision,
    /// New-technology decision(s).
    pub new: NewTechnologyOutcome,
    /// `D_old`.
    pub old_disutility: f64,
    /// `D_new`.
    pub new_disutility: f64,
    /// Whether the old technology is strictly worse.
    pub prefers_new: bool,
}

/// Text report for `abt decide`.
pub fn decision_text(scenario: &ScenarioConfig, report: &DecisionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "scenario:   {} ({})", scenario.name, scenario.mode);
    let _ = writeln!(out, "investment: {:.4}", report.investment_cost);
    outcome_lines(&mut out, &report.old, &report.new);
    let _ = writeln!(out, "D_old:      {:.4}", report.old_disutility);
    let _ = writeln!(out, "D_new:      {:.4}", report.new_disutility);
    let _ = write!(
        out,
        "preferred:  {}",
        if report.prefers_new { "new" } else { "old" }
    );
    out
}

/// Text table for a sweep.
pub fn sweep_text(axis: &str, points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>12}  {:>16}  {:>9}  violations", axis, "threshold", "Vo");
    for point in points {
        match (&point.result, &point.error) {
            (Some(r), _) => {
                let violations = r
                    .new
                    .plans()
                    .iter()
                    .map(|p| format!("{} = {:.4}", violation_label(p.technology), p.violation))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "{:>12.4}  {:>16}  {:>9.4}  {}",
                    point.value,
                    format!("[{}, {})", r.lower_bound, r.upper_bound),
                    r.old.violation,
                    violations
                );
            }
            (None, error) => {
                let _ = writeln!(
                    out,
                    "{:>12.4}  error: {}",
                    point.value,
                    error.as_deref().unwrap_or("unknown")
                );
            }
        }
    }
    out.trim_end().to_string()
}
