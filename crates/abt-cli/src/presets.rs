//! # `abt presets`
//!
//! Lists the built-in scenarios.

use anyhow::{Context, Result};
use clap::Args;

use abt_core::{Preset, ScenarioConfig};

/// `presets` subcommand arguments.
#[derive(Args, Debug, Clone, Default)]
pub struct PresetsArgs {
    /// Print the full scenarios as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the presets subcommand.
pub fn run_presets(args: &PresetsArgs) -> Result<u8> {
    let scenarios: Vec<ScenarioConfig> = Preset::all().iter().map(Preset::scenario).collect();
    if args.json {
        let body = serde_json::to_string_pretty(&scenarios).context("failed to serialize presets")?;
        println!("{body}");
        return Ok(0);
    }

    println!("Built-in scenarios:");
    println!();
    for s in &scenarios {
        println!("  {}", preset_line(s));
    }
    println!();
    println!("Total: {} presets", scenarios.len());
    Ok(0)
}

fn preset_line(s: &ScenarioConfig) -> String {
    let p = &s.parameters;
    format!(
        "{:<18} mode={:<8} pi={} tau={} rho={} ff={} alpha={} i_max={}",
        s.name,
        s.mode.to_string(),
        p.monitoring_probability,
        p.tax_rate,
        p.risk_aversion,
        p.fixed_fine,
        p.alpha,
        s.i_max
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_line_names_preset_and_mode() {
        let line = preset_line(&Preset::FullStrictFine.scenario());
        assert!(line.starts_with("full-strict-fine"));
        assert!(line.contains("mode=full"));
        assert!(line.contains("ff=40"));
    }
}
