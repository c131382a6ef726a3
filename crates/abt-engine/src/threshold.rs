//! # Threshold Search
//!
//! Backward unit scan over the investment cost. The old technology's
//! decision does not depend on the investment cost, so it is solved once;
//! the new technology is then evaluated at `i = i_max, i_max - 1, …, 0` and
//! the scan stops at the first `i` where
//!
//! ```text
//! D_old - D_new(i) > 0
//! ```
//!
//! The firm is indifferent somewhere in `[i, i + 1)`. Exhausting the scan is
//! [`EngineError::ThresholdNotFound`]; any solver failure at a trial point
//! aborts the search.
//!
//! The scan is linear rather than bisecting: the full-uncertainty branch is
//! piecewise and `D_old - D_new` is not known to be monotone in `i`.

use serde::Serialize;

use abt_core::{ScenarioConfig, Technology, UncertaintyMode};

use crate::compliance::{ComplianceDecision, ComplianceSolver};
use crate::error::EngineError;
use crate::joint::{JointDecision, JointDecisionSolver};

/// The new technology's decision(s) at one investment cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NewTechnologyOutcome {
    /// Known efficiency.
    Certain {
        /// Decision under the single new technology.
        new: ComplianceDecision,
    },
    /// Efficiency learned after investing.
    Partial {
        /// Decision if the high-cost curve realizes.
        high: ComplianceDecision,
        /// Decision if the low-cost curve realizes.
        low: ComplianceDecision,
        /// `α · D_high + (1 - α) · D_low`.
        expected_disutility: f64,
    },
    /// One plan committed before learning.
    Full {
        /// The committed plan.
        decision: JointDecision,
    },
}

/// Actual and declared emissions of one plan, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnologyPlan {
    /// Technology the plan applies to.
    pub technology: Technology,
    /// Actual emissions.
    pub emissions: f64,
    /// Declared emissions.
    pub declared_emissions: f64,
    /// Violation level.
    pub violation: f64,
}

impl From<&ComplianceDecision> for TechnologyPlan {
    fn from(d: &ComplianceDecision) -> Self {
        Self {
            technology: d.technology,
            emissions: d.optimal_emissions,
            declared_emissions: d.declared_emissions,
            violation: d.violation,
        }
    }
}

impl NewTechnologyOutcome {
    /// Expected disutility of adopting the new technology.
    pub fn expected_disutility(&self) -> f64 {
        match self {
            Self::Certain { new } => new.disutility,
            Self::Partial {
                expected_disutility,
                ..
            } => *expected_disutility,
            Self::Full { decision } => decision.expected_disutility,
        }
    }

    /// The uncertainty mode this outcome was computed under.
    pub fn mode(&self) -> UncertaintyMode {
        match self {
            Self::Certain { .. } => UncertaintyMode::Certain,
            Self::Partial { .. } => UncertaintyMode::Partial,
            Self::Full { .. } => UncertaintyMode::Full,
        }
    }

    /// One plan per realization the firm optimizes for. A committed
    /// full-uncertainty plan is reported once, under [`Technology::New`].
    pub fn plans(&self) -> Vec<TechnologyPlan> {
        match self {
            Self::Certain { new } => vec![new.into()],
            Self::Partial { high, low, .. } => vec![high.into(), low.into()],
            Self::Full { decision } => vec![TechnologyPlan {
                technology: Technology::New,
                emissions: decision.emissions(),
                declared_emissions: decision.declared_emissions,
                violation: decision.violation,
            }],
        }
    }
}

/// The investment threshold of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
    /// Scenario name.
    pub scenario_name: String,
    /// Uncertainty mode.
    pub mode: UncertaintyMode,
    /// `i`: the largest scanned cost at which the new technology is preferred.
    pub lower_bound: u32,
    /// `i + 1`.
    pub upper_bound: u32,
    /// Old-technology decision.
    pub old: ComplianceDecision,
    /// New-technology decision(s) at `lower_bound`.
    pub new: NewTechnologyOutcome,
    /// `D_old`.
    pub old_disutility: f64,
    /// `D_new(lower_bound)`.
    pub new_disutility: f64,
    /// Number of investment costs evaluated.
    pub iterations: u32,
}

impl ThresholdResult {
    /// `D_old - D_new` at the threshold. Always positive.
    pub fn margin(&self) -> f64 {
        self.old_disutility - self.new_disutility
    }
}

/// A validated scenario ready to be scanned.
#[derive(Debug, Clone)]
pub struct ThresholdSearch {
    scenario: ScenarioConfig,
    compliance: ComplianceSolver,
    joint: JointDecisionSolver,
}

impl ThresholdSearch {
    /// Validate `scenario` and build its solvers.
    pub fn new(scenario: &ScenarioConfig) -> Result<Self, EngineError> {
        scenario.validate()?;
        let params = &scenario.parameters;
        Ok(Self {
            scenario: scenario.clone(),
            compliance: ComplianceSolver::new(params, &scenario.solver),
            joint: JointDecisionSolver::new(params, &scenario.caps, &scenario.solver),
        })
    }

    /// The scenario being scanned.
    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    /// Old-technology decision, at zero investment cost.
    pub fn old_decision(&self) -> Result<ComplianceDecision, EngineError> {
        self.compliance
            .decide(&self.scenario.caps.profile(Technology::Old), 0.0)
    }

    /// New-technology decision(s) at `investment`.
    ///
    /// `old` supplies the declaration cap for the full-uncertainty plan.
    pub fn evaluate_new(
        &self,
        investment: f64,
        old: &ComplianceDecision,
    ) -> Result<NewTechnologyOutcome, EngineError> {
        let caps = &self.scenario.caps;
        match self.scenario.mode {
            UncertaintyMode::Certain => Ok(NewTechnologyOutcome::Certain {
                new: self.compliance.decide(&caps.profile(Technology::New), investment)?,
            }),
            UncertaintyMode::Partial => {
                let high = self
                    .compliance
                    .decide(&caps.profile(Technology::NewHighCost), investment)?;
                let low = self
                    .compliance
                    .decide(&caps.profile(Technology::NewLowCost), investment)?;
                let alpha = self.scenario.parameters.alpha;
                let expected_disutility = alpha * high.disutility + (1.0 - alpha) * low.disutility;
                Ok(NewTechnologyOutcome::Partial {
                    high,
                    low,
                    expected_disutility,
                })
            }
            UncertaintyMode::Full => Ok(NewTechnologyOutcome::Full {
                decision: self.joint.decide(investment, old.declared_emissions)?,
            }),
        }
    }

    /// Scan from `i_max` down to zero.
    pub fn run(&self) -> Result<ThresholdResult, EngineError> {
        let i_max = self.scenario.i_max;
        let old = self.old_decision()?;
        tracing::debug!(
            scenario = %self.scenario.name,
            mode = %self.scenario.mode,
            i_max,
            old_violation = old.violation,
            old_disutility = old.disutility,
            "starting threshold scan"
        );

        for i in (0..=i_max).rev() {
            let new = self.evaluate_new(f64::from(i), &old)?;
            let new_disutility = new.expected_disutility();
            let margin = old.disutility - new_disutility;
            tracing::trace!(investment = i, margin, "threshold step");

            if margin > 0.0 {
                if i == i_max {
                    tracing::warn!(
                        i_max,
                        margin,
                        "new technology already preferred at the scan bound; the threshold may lie above i_max"
                    );
                }
                tracing::info!(
                    scenario = %self.scenario.name,
                    lower = i,
                    upper = i + 1,
                    "investment threshold found"
                );
                return Ok(ThresholdResult {
                    scenario_name: self.scenario.name.clone(),
                    mode: self.scenario.mode,
                    lower_bound: i,
                    upper_bound: i + 1,
                    old_disutility: old.disutility,
                    new_disutility,
                    old,
                    new,
                    iterations: i_max - i + 1,
                });
            }
        }

        Err(EngineError::ThresholdNotFound {
            i_max,
            lowest_scanned: 0,
        })
    }
}

/// Validate `scenario` and locate its investment threshold.
pub fn find_threshold(scenario: &ScenarioConfig) -> Result<ThresholdResult, EngineError> {
    ThresholdSearch::new(scenario)?.run()
}
