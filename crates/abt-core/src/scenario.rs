//! # Scenario Configuration
//!
//! A [`ScenarioConfig`] is everything one threshold computation needs:
//! parameters, technology caps, the uncertainty mode, the upper bound of the
//! investment-cost scan, and the root-finder settings. Scenarios are loaded
//! from YAML or JSON by the CLI, or taken from the built-in [`Preset`]s that
//! reproduce the documented baseline runs.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::params::ModelParameters;
use crate::technology::TechnologyCaps;

/// How much the firm knows about the new technology's efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyMode {
    /// Efficiency is known; a single new technology with cap `caps.new`.
    Certain,
    /// Efficiency is learned after investing; the firm optimizes separately
    /// for each realization and the outcomes are combined by expectation.
    Partial,
    /// The firm commits to one emissions/declaration plan before learning
    /// the efficiency.
    Full,
}

impl std::fmt::Display for UncertaintyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Certain => "certain",
            Self::Partial => "partial",
            Self::Full => "full",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UncertaintyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certain" | "none" => Ok(Self::Certain),
            "partial" => Ok(Self::Partial),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown uncertainty mode \"{other}\" (expected certain, partial or full)"
            )),
        }
    }
}

/// Root-finder budget and resolution.
///
/// `grid_intervals` sets how finely a search interval is scanned for sign
/// changes before each bracket is refined. The joint solver nests one scan
/// inside another, so it has its own coarser resolutions:
/// `joint_grid_intervals` for the emissions scan and
/// `joint_inner_grid_intervals` for the declared-emissions sub-problem
/// solved at every emissions trial point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute tolerance on the root location.
    pub tolerance: f64,
    /// Iteration budget for a single bracketed refinement.
    pub max_iterations: usize,
    /// Number of scan sub-intervals for single-equation searches.
    pub grid_intervals: usize,
    /// Number of scan sub-intervals for the joint emissions search.
    pub joint_grid_intervals: usize,
    /// Number of scan sub-intervals for the nested declared-emissions solve.
    pub joint_inner_grid_intervals: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            grid_intervals: 400,
            joint_grid_intervals: 200,
            joint_inner_grid_intervals: 64,
        }
    }
}

impl SolverSettings {
    /// Reject budgets that cannot produce a root.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DomainError::InvalidParameter {
                name: "solver.tolerance",
                value: self.tolerance,
                expected: "tolerance > 0",
            });
        }
        for (name, value) in [
            ("solver.max_iterations", self.max_iterations),
            ("solver.grid_intervals", self.grid_intervals),
            ("solver.joint_grid_intervals", self.joint_grid_intervals),
            (
                "solver.joint_inner_grid_intervals",
                self.joint_inner_grid_intervals,
            ),
        ] {
            if value == 0 {
                return Err(DomainError::InvalidParameter {
                    name,
                    value: 0.0,
                    expected: "at least 1",
                });
            }
        }
        Ok(())
    }
}

fn default_i_max() -> u32 {
    3000
}

/// A complete, self-contained scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Free-form scenario name used in reports.
    #[serde(default)]
    pub name: String,
    /// Model parameters, fixed for the whole scan.
    pub parameters: ModelParameters,
    /// Technology caps.
    #[serde(default)]
    pub caps: TechnologyCaps,
    /// Uncertainty mode for the new technology.
    pub mode: UncertaintyMode,
    /// Upper bound of the backward investment-cost scan.
    #[serde(default = "default_i_max")]
    pub i_max: u32,
    /// Root-finder settings.
    #[serde(default)]
    pub solver: SolverSettings,
}

impl ScenarioConfig {
    /// Create a scenario with default caps, `i_max = 3000` and default
    /// solver settings.
    pub fn new(name: impl Into<String>, parameters: ModelParameters, mode: UncertaintyMode) -> Self {
        Self {
            name: name.into(),
            parameters,
            caps: TechnologyCaps::default(),
            mode,
            i_max: default_i_max(),
            solver: SolverSettings::default(),
        }
    }

    /// Validate parameters, caps and solver settings.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.parameters.validate()?;
        self.caps.validate()?;
        self.solver.validate()
    }
}

/// Built-in scenarios reproducing the documented baseline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// π = 0.5, τ = 20, ρ = 1, ff = 0; old cap 100, new cap 50.
    CertainBaseline,
    /// As the certain baseline with α = 0.5 and caps 75/25 learned after investing.
    PartialBaseline,
    /// As the partial baseline, but the plan is committed before learning.
    FullBaseline,
    /// Full uncertainty with ff = 40, where truthful reporting is optimal.
    FullStrictFine,
}

impl Preset {
    /// Return all presets.
    pub fn all() -> &'static [Preset] {
        &[
            Self::CertainBaseline,
            Self::PartialBaseline,
            Self::FullBaseline,
            Self::FullStrictFine,
        ]
    }

    /// The preset's command-line name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CertainBaseline => "certain-baseline",
            Self::PartialBaseline => "partial-baseline",
            Self::FullBaseline => "full-baseline",
            Self::FullStrictFine => "full-strict-fine",
        }
    }

    /// Materialize the preset as a scenario.
    pub fn scenario(&self) -> ScenarioConfig {
        let base = ModelParameters::new(0.5, 20.0, 1.0, 0.0).with_alpha(0.5);
        match self {
            Self::CertainBaseline => {
                ScenarioConfig::new(self.as_str(), base, UncertaintyMode::Certain)
            }
            Self::PartialBaseline => {
                ScenarioConfig::new(self.as_str(), base, UncertaintyMode::Partial)
            }
            Self::FullBaseline => ScenarioConfig::new(self.as_str(), base, UncertaintyMode::Full),
            Self::FullStrictFine => ScenarioConfig::new(
                self.as_str(),
                ModelParameters {
                    fixed_fine: 40.0,
                    ..base
                },
                UncertaintyMode::Full,
            ),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown preset \"{s}\""))
    }
}
