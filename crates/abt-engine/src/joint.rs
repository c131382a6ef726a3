//! # Joint Decision Solver
//!
//! Under full uncertainty the firm commits to one plan `(e, r)` before
//! learning whether the new technology realizes its high-cost curve (weight
//! `α`) or its low-cost curve (weight `1 - α`). Each realization `k` has
//! outlays
//!
//! ```text
//! A_k = C_k(e) + τr + I
//! B_k = A_k + fine(e - r)
//! ```
//!
//! ## Branch selection
//!
//! `π · fine'(0) - τ ≥ 0` means truthful reporting is optimal at the margin
//! ([`ComplianceBranch::FullCompliance`]): `r = e` and `e` solves
//!
//! ```text
//! Σ_k w_k · D'(C_k(e) + τe + I) · (C_k'(e) + τ) = 0       on (0, cap_high]
//! ```
//!
//! Otherwise ([`ComplianceBranch::ImperfectCompliance`]) the plan solves
//!
//! ```text
//! foc_e = Σ_k w_k [(1-π) D'(A_k) C_k'(e) + π D'(B_k) (C_k'(e) + fine'(e-r))] = 0
//! foc_r = Σ_k w_k [(1-π) D'(A_k) τ      + π D'(B_k) (τ - fine'(e-r))]       = 0
//! ```
//!
//! by nested bracketing: for each trial `e`, `r(e)` is the unique root of
//! `foc_r(e, ·)` on `[0, e]`; the reduced residual `foc_e(e, r(e))` is then
//! scanned over `(0, cap_high]`. Trial points without a unique `r(e)` are
//! undefined and skipped. Accepted plans satisfy `0 < r ≤` the old
//! technology's declaration.
//!
//! ## Low-cost cap
//!
//! A plan with `e ≤ cap_low` is kept ([`LowCostRegime::WithinLowCostCap`]).
//! Beyond the cap the low-cost curve would turn negative, so the branch is
//! re-solved with that realization abating at zero cost
//! ([`SaturatedAbatement`]) and the result is
//! [`LowCostRegime::ExceedsLowCostCap`].

use serde::Serialize;

use abt_core::{ModelParameters, SolverSettings, Technology, TechnologyCaps, TechnologyProfile};
use abt_roots::{RootError, RootFinderOptions};

use crate::abatement::{AbatementCost, SaturatedAbatement};
use crate::disutility::{expected_disutility, marginal_disutility, Outlay};
use crate::error::{EngineError, Equation};
use crate::sanction::Sanction;
use crate::solve;

// ---------------------------------------------------------------------------
// Decision types
// ---------------------------------------------------------------------------

/// Which first-order system the plan solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceBranch {
    /// Truthful reporting, single equation in `e`.
    FullCompliance,
    /// Possible under-reporting, two equations in `(e, r)`.
    ImperfectCompliance,
}

/// Where the plan's emissions sit relative to the low-cost cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LowCostRegime {
    /// Both realizations use their quadratic curves at `e`.
    WithinLowCostCap(f64),
    /// The low-cost realization abates at zero cost; `e` is from the
    /// re-solved branch.
    ExceedsLowCostCap(f64),
}

impl LowCostRegime {
    /// Committed actual emissions.
    pub fn emissions(&self) -> f64 {
        match self {
            Self::WithinLowCostCap(e) | Self::ExceedsLowCostCap(e) => *e,
        }
    }

    /// Whether the low-cost curve was saturated.
    pub fn exceeds_cap(&self) -> bool {
        matches!(self, Self::ExceedsLowCostCap(_))
    }
}

/// What the committed plan costs under one realization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealizedOutcome {
    /// The realization.
    pub technology: Technology,
    /// Abatement cost at the committed emissions.
    pub abatement_cost: f64,
    /// Tax on the committed declaration.
    pub tax_paid: f64,
    /// Fine paid if audited.
    pub fine_paid: f64,
    /// Investment cost borne.
    pub investment_cost: f64,
    /// Expected disutility given this realization.
    pub disutility: f64,
}

/// The committed plan and its outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointDecision {
    /// Which system was solved.
    pub branch: ComplianceBranch,
    /// Committed emissions and low-cost regime.
    pub regime: LowCostRegime,
    /// Committed declaration `r`.
    pub declared_emissions: f64,
    /// Violation `e - r`.
    pub violation: f64,
    /// Outcome if the high-cost curve realizes.
    pub high: RealizedOutcome,
    /// Outcome if the low-cost curve realizes.
    pub low: RealizedOutcome,
    /// `α · D_high + (1 - α) · D_low`.
    pub expected_disutility: f64,
}

impl JointDecision {
    /// Committed actual emissions.
    pub fn emissions(&self) -> f64 {
        self.regime.emissions()
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Solves the full-uncertainty plan for fixed parameters and caps.
#[derive(Debug, Clone)]
pub struct JointDecisionSolver {
    params: ModelParameters,
    sanction: Sanction,
    high: TechnologyProfile,
    low: TechnologyProfile,
    outer: RootFinderOptions,
    inner: RootFinderOptions,
}

impl JointDecisionSolver {
    /// Create a solver. Parameters and caps are assumed validated.
    pub fn new(params: &ModelParameters, caps: &TechnologyCaps, settings: &SolverSettings) -> Self {
        let (outer, inner) = solve::joint_options(settings);
        Self {
            params: *params,
            sanction: Sanction::from_params(params),
            high: caps.profile(Technology::NewHighCost),
            low: caps.profile(Technology::NewLowCost),
            outer,
            inner,
        }
    }

    /// The branch these parameters select. Independent of investment cost.
    pub fn branch(&self) -> ComplianceBranch {
        if self.sanction.deters_fully(&self.params) {
            ComplianceBranch::FullCompliance
        } else {
            ComplianceBranch::ImperfectCompliance
        }
    }

    /// Solve the plan at `investment`. `old_declared` caps the declaration
    /// in the imperfect-compliance branch.
    pub fn decide(&self, investment: f64, old_declared: f64) -> Result<JointDecision, EngineError> {
        let branch = self.branch();
        let (e, r) = self.solve_plan(branch, &self.low, investment, old_declared)?;

        let (regime, declared) = if e <= self.low.cap {
            (LowCostRegime::WithinLowCostCap(e), r)
        } else {
            let (e, r) = self.solve_plan(branch, &SaturatedAbatement, investment, old_declared)?;
            (LowCostRegime::ExceedsLowCostCap(e), r)
        };
        let emissions = regime.emissions();

        let high = self.realize(Technology::NewHighCost, &self.high, emissions, declared, investment)?;
        let low = if regime.exceeds_cap() {
            self.realize(Technology::NewLowCost, &SaturatedAbatement, emissions, declared, investment)?
        } else {
            self.realize(Technology::NewLowCost, &self.low, emissions, declared, investment)?
        };
        let alpha = self.params.alpha;
        let expected = alpha * high.disutility + (1.0 - alpha) * low.disutility;

        tracing::debug!(
            investment,
            ?branch,
            emissions,
            declared,
            exceeds_low_cap = regime.exceeds_cap(),
            expected_disutility = expected,
            "joint decision"
        );

        Ok(JointDecision {
            branch,
            regime,
            declared_emissions: declared,
            violation: emissions - declared,
            high,
            low,
            expected_disutility: expected,
        })
    }

    fn realize(
        &self,
        technology: Technology,
        curve: &dyn AbatementCost,
        emissions: f64,
        declared: f64,
        investment: f64,
    ) -> Result<RealizedOutcome, EngineError> {
        let outlay = Outlay {
            abatement_cost: curve.cost(emissions),
            tax: self.params.tax_rate * declared,
            investment,
            fine: self.sanction.fine_at(emissions, declared),
        };
        Ok(RealizedOutcome {
            technology,
            abatement_cost: outlay.abatement_cost,
            tax_paid: outlay.tax,
            fine_paid: outlay.fine,
            investment_cost: investment,
            disutility: expected_disutility(&self.params, &outlay)?,
        })
    }

    fn solve_plan(
        &self,
        branch: ComplianceBranch,
        low: &dyn AbatementCost,
        investment: f64,
        old_declared: f64,
    ) -> Result<(f64, f64), EngineError> {
        let high: &dyn AbatementCost = &self.high;
        let system = Expectation {
            params: &self.params,
            sanction: &self.sanction,
            investment,
            realizations: [(self.params.alpha, high), (1.0 - self.params.alpha, low)],
        };
        match branch {
            ComplianceBranch::FullCompliance => {
                let e = self.solve_full_compliance(&system)?;
                Ok((e, e))
            }
            ComplianceBranch::ImperfectCompliance => self.solve_imperfect(&system, old_declared),
        }
    }

    fn solve_full_compliance(&self, system: &Expectation<'_>) -> Result<f64, EngineError> {
        let equation = Equation::JointFullCompliance;
        let hi = self.high.cap;
        let roots = solve::roots_in(
            equation,
            system.investment,
            |e| system.full_compliance(e),
            0.0,
            hi,
            &self.outer,
        )?;
        let candidates: Vec<f64> = roots.into_iter().filter(|e| *e > 0.0 && *e <= hi).collect();
        solve::unique(equation, system.investment, candidates, || {
            format!("no emissions root in (0, {hi}]")
        })
    }

    fn solve_imperfect(&self, system: &Expectation<'_>, old_declared: f64) -> Result<(f64, f64), EngineError> {
        let investment = system.investment;
        let hi = self.high.cap;
        let mut inner_failure: Option<RootError> = None;

        let reduced = |e: f64| match system.declared_for(e, &self.inner) {
            Ok(Some(r)) => system.foc_e(e, r),
            Ok(None) => f64::NAN,
            Err(err) => {
                inner_failure.get_or_insert(err);
                f64::NAN
            }
        };
        let scanned = solve::roots_in(Equation::JointEmissions, investment, reduced, 0.0, hi, &self.outer);
        if let Some(err) = inner_failure {
            return Err(EngineError::from_root(Equation::JointDeclared, investment, err));
        }

        let mut candidates = Vec::new();
        for e in scanned? {
            let declared = system
                .declared_for(e, &self.inner)
                .map_err(|err| EngineError::from_root(Equation::JointDeclared, investment, err))?;
            if let Some(r) = declared {
                if e > 0.0 && e <= hi && r > 0.0 && r <= old_declared {
                    candidates.push((e, r));
                }
            }
        }

        match candidates.as_slice() {
            [plan] => Ok(*plan),
            [] => Err(EngineError::ModelInfeasible {
                equation: Equation::JointEmissions,
                investment_cost: investment,
                reason: format!("no plan with 0 < e ≤ {hi} and 0 < r ≤ {old_declared}"),
            }),
            _ => Err(EngineError::AmbiguousRoot {
                equation: Equation::JointEmissions,
                investment_cost: investment,
                candidates: candidates.iter().map(|(e, _)| *e).collect(),
            }),
        }
    }
}

/// The expectation over both realizations at one investment cost.
struct Expectation<'a> {
    params: &'a ModelParameters,
    sanction: &'a Sanction,
    investment: f64,
    realizations: [(f64, &'a dyn AbatementCost); 2],
}

impl Expectation<'_> {
    fn full_compliance(&self, e: f64) -> f64 {
        let tau = self.params.tax_rate;
        self.realizations
            .iter()
            .map(|(w, curve)| {
                let base = curve.cost(e) + tau * e + self.investment;
                w * marginal_disutility(self.params, base) * (curve.marginal_cost(e) + tau)
            })
            .sum()
    }

    /// `(D'(A_k), D'(B_k))` for one realization.
    fn marginals(&self, curve: &dyn AbatementCost, e: f64, r: f64) -> (f64, f64) {
        let unaudited = curve.cost(e) + self.params.tax_rate * r + self.investment;
        let audited = unaudited + self.sanction.fine_at(e, r);
        (
            marginal_disutility(self.params, unaudited),
            marginal_disutility(self.params, audited),
        )
    }

    fn foc_e(&self, e: f64, r: f64) -> f64 {
        let pi = self.params.monitoring_probability;
        let df = self.sanction.fine_derivative_at(e, r);
        self.realizations
            .iter()
            .map(|(w, curve)| {
                let (da, db) = self.marginals(*curve, e, r);
                let dc = curve.marginal_cost(e);
                w * ((1.0 - pi) * da * dc + pi * db * (dc + df))
            })
            .sum()
    }

    fn foc_r(&self, e: f64, r: f64) -> f64 {
        let pi = self.params.monitoring_probability;
        let tau = self.params.tax_rate;
        let df = self.sanction.fine_derivative_at(e, r);
        self.realizations
            .iter()
            .map(|(w, curve)| {
                let (da, db) = self.marginals(*curve, e, r);
                w * ((1.0 - pi) * da * tau + pi * db * (tau - df))
            })
            .sum()
    }

    /// The unique declaration solving `foc_r(e, ·) = 0` on `[0, e]`, if any.
    fn declared_for(&self, e: f64, options: &RootFinderOptions) -> Result<Option<f64>, RootError> {
        if e <= 0.0 {
            return Ok(None);
        }
        let roots = solve::raw_roots_in(|r| self.foc_r(e, r), 0.0, e, options)?;
        Ok(match roots.as_slice() {
            [r] => Some(*r),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD_DECLARED: f64 = 41.007_355_176_328_89;

    fn solver(ff: f64) -> JointDecisionSolver {
        solver_with_caps(ff, TechnologyCaps::default())
    }

    fn solver_with_caps(ff: f64, caps: TechnologyCaps) -> JointDecisionSolver {
        let params = ModelParameters::new(0.5, 20.0, 1.0, ff).with_alpha(0.5);
        JointDecisionSolver::new(&params, &caps, &SolverSettings::default())
    }

    // ── Branch selection ────────────────────────────────────────────

    #[test]
    fn branch_follows_zero_violation_deterrence() {
        assert_eq!(solver(0.0).branch(), ComplianceBranch::ImperfectCompliance);
        assert_eq!(solver(39.0).branch(), ComplianceBranch::ImperfectCompliance);
        assert_eq!(solver(40.0).branch(), ComplianceBranch::FullCompliance);
    }

    // ── Imperfect compliance ────────────────────────────────────────

    #[test]
    fn imperfect_plan_near_threshold() {
        let d = solver(0.0).decide(1905.0, OLD_DECLARED).unwrap();
        assert_eq!(d.branch, ComplianceBranch::ImperfectCompliance);
        assert!(d.regime.exceeds_cap());
        assert!((d.emissions() - 54.6567).abs() < 1e-3, "e = {}", d.emissions());
        assert!((d.declared_emissions - 35.6759).abs() < 1e-3);
        assert!((d.expected_disutility - 11_594_883.8).abs() < 5.0);
        assert_eq!(d.low.abatement_cost, 0.0);
    }

    #[test]
    fn plan_satisfies_both_conditions() {
        let s = solver(0.0);
        let d = s.decide(2000.0, OLD_DECLARED).unwrap();
        let high: &dyn AbatementCost = &s.high;
        let system = Expectation {
            params: &s.params,
            sanction: &s.sanction,
            investment: 2000.0,
            realizations: [(0.5, high), (0.5, &SaturatedAbatement)],
        };
        let scale = 1e4;
        assert!(system.foc_e(d.emissions(), d.declared_emissions).abs() / scale < 1e-3);
        assert!(system.foc_r(d.emissions(), d.declared_emissions).abs() / scale < 1e-3);
    }

    #[test]
    fn plan_within_low_cost_cap() {
        let caps = TechnologyCaps {
            new_high: 30.0,
            new_low: 28.0,
            ..TechnologyCaps::default()
        };
        let d = solver_with_caps(0.0, caps).decide(500.0, OLD_DECLARED).unwrap();
        assert!(matches!(d.regime, LowCostRegime::WithinLowCostCap(_)));
        assert!((d.emissions() - 24.5136).abs() < 1e-3);
        assert!((d.declared_emissions - 7.3228).abs() < 1e-3);
        let e = d.emissions();
        assert!((d.low.abatement_cost - (28.0 - e) * e).abs() < 1e-9);
    }

    #[test]
    fn no_plan_at_low_investment_is_infeasible() {
        let err = solver(0.0).decide(100.0, OLD_DECLARED).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ModelInfeasible {
                equation: Equation::JointEmissions,
                ..
            }
        ));
    }

    #[test]
    fn declaration_cap_filters_candidates() {
        let err = solver(0.0).decide(2000.0, 30.0).unwrap_err();
        assert_eq!(err.kind(), "model_infeasible");
    }

    // ── Full compliance ─────────────────────────────────────────────

    #[test]
    fn full_compliance_plan_reports_truthfully() {
        let d = solver(40.0).decide(1907.0, 60.0).unwrap();
        assert_eq!(d.branch, ComplianceBranch::FullCompliance);
        assert!(d.regime.exceeds_cap());
        assert!((d.emissions() - 54.8072).abs() < 1e-3);
        assert_eq!(d.violation, 0.0);
        assert_eq!(d.high.fine_paid, 0.0);
        assert!((d.expected_disutility - 12_954_890.3).abs() < 5.0);
    }

    #[test]
    fn two_emission_roots_are_ambiguous() {
        let err = solver(40.0).decide(100.0, 60.0).unwrap_err();
        match err {
            EngineError::AmbiguousRoot {
                equation,
                candidates,
                ..
            } => {
                assert_eq!(equation, Equation::JointFullCompliance);
                assert_eq!(candidates.len(), 2);
                assert!((candidates[0] - 47.9448).abs() < 1e-3);
                assert!((candidates[1] - 58.3072).abs() < 1e-3);
            }
            other => panic!("expected ambiguous root, got {other:?}"),
        }
    }

    #[test]
    fn expected_disutility_weights_realizations() {
        let d = solver(0.0).decide(2000.0, OLD_DECLARED).unwrap();
        let combined = 0.5 * d.high.disutility + 0.5 * d.low.disutility;
        assert_eq!(d.expected_disutility, combined);
        assert!(d.high.disutility > d.low.disutility);
    }
}
