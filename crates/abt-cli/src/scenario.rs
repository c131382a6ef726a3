//! # Scenario Input
//!
//! Every computing subcommand accepts the same scenario flags: a base
//! scenario from `--scenario FILE` (YAML, or JSON by `.json` extension) or
//! `--preset NAME` (default `certain-baseline`), then per-field overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use abt_core::{Preset, ScenarioConfig, UncertaintyMode};

/// Scenario selection and overrides shared by the computing subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Scenario file (YAML or JSON).
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in scenario (see `abt presets`).
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Override the uncertainty mode (certain, partial, full).
    #[arg(long)]
    pub mode: Option<UncertaintyMode>,

    /// Override the upper bound of the investment-cost scan.
    #[arg(long)]
    pub i_max: Option<u32>,

    /// Override the monitoring probability π.
    #[arg(long)]
    pub pi: Option<f64>,

    /// Override the tax rate τ.
    #[arg(long)]
    pub tau: Option<f64>,

    /// Override the risk aversion ρ.
    #[arg(long)]
    pub rho: Option<f64>,

    /// Override the fixed fine component.
    #[arg(long)]
    pub ff: Option<f64>,

    /// Override the high-cost likelihood α.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Override the fine multiplier.
    #[arg(long)]
    pub fine_multiplier: Option<f64>,
}

impl ScenarioArgs {
    /// Build the scenario these flags describe. Validation is left to the
    /// engine so that every entry point reports the same domain errors.
    pub fn resolve(&self) -> Result<ScenarioConfig> {
        let mut scenario = match (&self.scenario, self.preset) {
            (Some(path), _) => load_scenario_file(path)?,
            (None, Some(preset)) => preset.scenario(),
            (None, None) => Preset::CertainBaseline.scenario(),
        };

        if let Some(mode) = self.mode {
            scenario.mode = mode;
        }
        if let Some(i_max) = self.i_max {
            scenario.i_max = i_max;
        }
        let p = &mut scenario.parameters;
        let overrides = [
            (self.pi, &mut p.monitoring_probability),
            (self.tau, &mut p.tax_rate),
            (self.rho, &mut p.risk_aversion),
            (self.ff, &mut p.fixed_fine),
            (self.alpha, &mut p.alpha),
            (self.fine_multiplier, &mut p.fine_multiplier),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        tracing::debug!(
            name = %scenario.name,
            mode = %scenario.mode,
            i_max = scenario.i_max,
            "resolved scenario"
        );
        Ok(scenario)
    }
}

/// Read a scenario file. `.json` files are parsed as JSON, anything else
/// as YAML.
pub fn load_scenario_file(path: &Path) -> Result<ScenarioConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let scenario: ScenarioConfig = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON scenario: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML scenario: {}", path.display()))?
    };

    let scenario = if scenario.name.is_empty() {
        ScenarioConfig {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ..scenario
        }
    } else {
        scenario
    };
    Ok(scenario)
}
