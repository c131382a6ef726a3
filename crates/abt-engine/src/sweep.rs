//! # Scenario Sweeps
//!
//! Re-runs the threshold search along one parameter axis with the rest of
//! the scenario held fixed. Points share no state, so they are evaluated in
//! parallel on the rayon pool; the output keeps the input order.

use rayon::prelude::*;
use serde::Serialize;

use abt_core::ScenarioConfig;

use crate::threshold::{find_threshold, ThresholdResult};

/// A model parameter that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// π
    MonitoringProbability,
    /// τ
    TaxRate,
    /// ρ
    RiskAversion,
    /// ff
    FixedFine,
    /// α
    Alpha,
    /// Fine multiplier.
    FineMultiplier,
}

impl SweepAxis {
    /// Every axis.
    pub fn all() -> &'static [SweepAxis] {
        &[
            Self::MonitoringProbability,
            Self::TaxRate,
            Self::RiskAversion,
            Self::FixedFine,
            Self::Alpha,
            Self::FineMultiplier,
        ]
    }

    /// Short name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonitoringProbability => "pi",
            Self::TaxRate => "tau",
            Self::RiskAversion => "rho",
            Self::FixedFine => "ff",
            Self::Alpha => "alpha",
            Self::FineMultiplier => "fine_multiplier",
        }
    }

    /// A copy of `base` with this axis set to `value`.
    pub fn apply(&self, base: &ScenarioConfig, value: f64) -> ScenarioConfig {
        let mut scenario = base.clone();
        let p = &mut scenario.parameters;
        match self {
            Self::MonitoringProbability => p.monitoring_probability = value,
            Self::TaxRate => p.tax_rate = value,
            Self::RiskAversion => p.risk_aversion = value,
            Self::FixedFine => p.fixed_fine = value,
            Self::Alpha => p.alpha = value,
            Self::FineMultiplier => p.fine_multiplier = value,
        }
        scenario.name = format!("{} [{}={}]", base.name, self.as_str(), value);
        scenario
    }
}

impl std::fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SweepAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pi" | "monitoring_probability" => Ok(Self::MonitoringProbability),
            "tau" | "tax_rate" => Ok(Self::TaxRate),
            "rho" | "risk_aversion" => Ok(Self::RiskAversion),
            "ff" | "fixed_fine" => Ok(Self::FixedFine),
            "alpha" => Ok(Self::Alpha),
            "fine_multiplier" | "m" => Ok(Self::FineMultiplier),
            other => Err(format!(
                "unknown sweep parameter \"{other}\" (expected pi, tau, rho, ff, alpha or fine_multiplier)"
            )),
        }
    }
}

/// The outcome at one sweep value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Parameter value.
    pub value: f64,
    /// Threshold, if the search succeeded.
    pub result: Option<ThresholdResult>,
    /// Error kind, if it failed.
    pub error_kind: Option<&'static str>,
    /// Error message, if it failed.
    pub error: Option<String>,
}

impl SweepPoint {
    /// Whether the search succeeded at this value.
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// Run the threshold search at every value of `axis`.
pub fn sweep(base: &ScenarioConfig, axis: SweepAxis, values: &[f64]) -> Vec<SweepPoint> {
    tracing::info!(axis = %axis, points = values.len(), "starting sweep");
    values
        .par_iter()
        .map(|&value| match find_threshold(&axis.apply(base, value)) {
            Ok(result) => SweepPoint {
                value,
                result: Some(result),
                error_kind: None,
                error: None,
            },
            Err(err) => {
                tracing::warn!(axis = %axis, value, error = %err, "sweep point failed");
                SweepPoint {
                    value,
                    result: None,
                    error_kind: Some(err.kind()),
                    error: Some(err.to_string()),
                }
            }
        })
        .collect()
}

/// `steps` evenly spaced values from `from` to `to` inclusive.
pub fn linspace(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        n => {
            let step = (to - from) / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { to } else { from + step * k as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abt_core::{ModelParameters, UncertaintyMode};

    fn base() -> ScenarioConfig {
        let mut s = ScenarioConfig::new(
            "sweep",
            ModelParameters::new(0.5, 20.0, 1.0, 0.0),
            UncertaintyMode::Certain,
        );
        s.i_max = 2400;
        s
    }

    #[test]
    fn linspace_endpoints() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let v = linspace(0.1, 1.0, 4);
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], 0.1);
        assert_eq!(v[3], 1.0);
        assert!((v[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn axis_names_round_trip() {
        for axis in SweepAxis::all() {
            assert_eq!(axis.as_str().parse::<SweepAxis>().unwrap(), *axis);
        }
        assert_eq!("tax_rate".parse::<SweepAxis>().unwrap(), SweepAxis::TaxRate);
        assert!("gamma".parse::<SweepAxis>().is_err());
    }

    #[test]
    fn apply_changes_one_parameter() {
        let s = SweepAxis::FixedFine.apply(&base(), 40.0);
        assert_eq!(s.parameters.fixed_fine, 40.0);
        assert_eq!(s.parameters.tax_rate, 20.0);
        assert_eq!(s.name, "sweep [ff=40]");
    }

    #[test]
    fn sweep_preserves_order_and_reports_errors() {
        let points = sweep(&base(), SweepAxis::FixedFine, &[0.0, -1.0, 40.0]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].value, 0.0);
        assert_eq!(points[0].result.as_ref().map(|r| r.lower_bound), Some(2374));
        assert!(!points[1].is_ok());
        assert_eq!(points[1].error_kind, Some("domain"));
        assert_eq!(points[2].result.as_ref().map(|r| r.old.violation), Some(0.0));
    }
}
