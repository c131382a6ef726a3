//! # Compliance Solver
//!
//! Optimal declared emissions `r*` for a single technology whose actual
//! emissions sit at their unconstrained optimum `e*`. The firm trades the
//! tax saved by under-reporting against the expected fine, weighting both
//! by the marginal disutility of the state in which they are paid:
//!
//! ```text
//! g(r) = π · D'(B) · fine'(e* - r)  -  τ · ((1 - π) · D'(A) + π · D'(B))
//!
//! A = C + τr + I          (unaudited outlay)
//! B = A + fine(e* - r)    (audited outlay)
//! D'(x) = (ρ + 1) · x^ρ
//! ```
//!
//! `g(r) = 0` is the interior optimality condition. At `r = e*` the
//! violation is zero and `g(e*) = D'(A) · (π · fine'(0) - τ)`, so:
//!
//! - if `π · fine'(0) ≥ τ` the firm reports truthfully ([`DeclarationRegime::FullCompliance`]);
//! - otherwise `g(e*) < 0`, and `g` is scanned on `[0, e*]`. One root is
//!   [`DeclarationRegime::Interior`]; none with `g(0) ≤ 0` means the firm
//!   declares nothing ([`DeclarationRegime::ZeroDeclaration`]); several
//!   roots are an [`EngineError::AmbiguousRoot`].

use serde::Serialize;

use abt_core::{ModelParameters, SolverSettings, Technology, TechnologyProfile};
use abt_roots::{residual_at, RootFinderOptions};

use crate::abatement::OptimalEmissions;
use crate::disutility::{expected_disutility, marginal_disutility, Outlay};
use crate::error::{EngineError, Equation};
use crate::sanction::Sanction;
use crate::solve;

/// How the declared emissions were determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationRegime {
    /// Marginal deterrence at zero violation covers the tax: `r* = e*`.
    FullCompliance,
    /// The unique root of the declaration condition in `(0, e*)`.
    Interior,
    /// Under-reporting pays at every level: `r* = 0`.
    ZeroDeclaration,
}

/// Optimal behaviour under one technology at one investment cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceDecision {
    /// The technology.
    pub technology: Technology,
    /// Actual emissions `e*`.
    pub optimal_emissions: f64,
    /// Declared emissions `r* ∈ [0, e*]`.
    pub declared_emissions: f64,
    /// Violation `e* - r*`.
    pub violation: f64,
    /// Abatement cost at `e*`.
    pub abatement_cost: f64,
    /// Tax on the declaration, `τ · r*`.
    pub tax_paid: f64,
    /// Fine paid if audited.
    pub fine_paid: f64,
    /// Investment cost borne.
    pub investment_cost: f64,
    /// Expected disutility.
    pub disutility: f64,
    /// How `r*` was determined.
    pub regime: DeclarationRegime,
}

impl ComplianceDecision {
    /// The outlay this decision implies.
    pub fn outlay(&self) -> Outlay {
        Outlay {
            abatement_cost: self.abatement_cost,
            tax: self.tax_paid,
            investment: self.investment_cost,
            fine: self.fine_paid,
        }
    }
}

/// Solves the declaration problem for any technology under fixed parameters.
#[derive(Debug, Clone)]
pub struct ComplianceSolver {
    params: ModelParameters,
    sanction: Sanction,
    options: RootFinderOptions,
}

impl ComplianceSolver {
    /// Create a solver. Parameters are assumed validated.
    pub fn new(params: &ModelParameters, settings: &SolverSettings) -> Self {
        Self {
            params: *params,
            sanction: Sanction::from_params(params),
            options: solve::single_options(settings),
        }
    }

    /// The parameters this solver was built with.
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// The declaration condition `g(r)` for `profile` at `investment`.
    pub fn residual(&self, profile: &TechnologyProfile, investment: f64, declared: f64) -> f64 {
        let optimum = OptimalEmissions::solve(profile, &self.params);
        self.residual_at_optimum(&optimum, investment, declared)
    }

    fn residual_at_optimum(&self, optimum: &OptimalEmissions, investment: f64, declared: f64) -> f64 {
        let pi = self.params.monitoring_probability;
        let tau = self.params.tax_rate;
        let violation = optimum.emissions - declared;
        let unaudited = optimum.abatement_cost + tau * declared + investment;
        let audited = unaudited + self.sanction.fine(violation);
        let dia = marginal_disutility(&self.params, unaudited);
        let dib = marginal_disutility(&self.params, audited);
        pi * dib * self.sanction.marginal_fine(violation) - tau * ((1.0 - pi) * dia + pi * dib)
    }

    /// Optimal declaration and disutility under `profile` at `investment`.
    pub fn decide(
        &self,
        profile: &TechnologyProfile,
        investment: f64,
    ) -> Result<ComplianceDecision, EngineError> {
        let optimum = OptimalEmissions::solve(profile, &self.params);
        let (declared, regime) = self.declare(&optimum, investment)?;

        let tau = self.params.tax_rate;
        let violation = optimum.emissions - declared;
        let outlay = Outlay {
            abatement_cost: optimum.abatement_cost,
            tax: tau * declared,
            investment,
            fine: self.sanction.fine(violation),
        };
        let disutility = expected_disutility(&self.params, &outlay)?;

        tracing::debug!(
            technology = %profile.technology,
            investment,
            emissions = optimum.emissions,
            declared,
            violation,
            ?regime,
            disutility,
            "compliance decision"
        );

        Ok(ComplianceDecision {
            technology: profile.technology,
            optimal_emissions: optimum.emissions,
            declared_emissions: declared,
            violation,
            abatement_cost: outlay.abatement_cost,
            tax_paid: outlay.tax,
            fine_paid: outlay.fine,
            investment_cost: investment,
            disutility,
            regime,
        })
    }

    fn declare(
        &self,
        optimum: &OptimalEmissions,
        investment: f64,
    ) -> Result<(f64, DeclarationRegime), EngineError> {
        if self.sanction.deters_fully(&self.params) {
            return Ok((optimum.emissions, DeclarationRegime::FullCompliance));
        }

        let equation = Equation::DeclaredEmissions;
        let residual = |r: f64| self.residual_at_optimum(optimum, investment, r);
        let roots = solve::roots_in(equation, investment, residual, 0.0, optimum.emissions, &self.options)?;

        match roots.as_slice() {
            [r] => Ok((*r, DeclarationRegime::Interior)),
            [] => {
                let at_zero = residual_at(residual, 0.0)
                    .map_err(|err| EngineError::from_root(equation, investment, err))?;
                if at_zero <= 0.0 {
                    Ok((0.0, DeclarationRegime::ZeroDeclaration))
                } else {
                    Err(EngineError::ModelInfeasible {
                        equation,
                        investment_cost: investment,
                        reason: format!(
                            "residual positive at r = 0 ({at_zero}) with no sign change on [0, {}]",
                            optimum.emissions
                        ),
                    })
                }
            }
            _ => Err(EngineError::AmbiguousRoot {
                equation,
                investment_cost: investment,
                candidates: roots,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abt_core::TechnologyCaps;
    use proptest::prelude::*;

    fn solver(params: ModelParameters) -> ComplianceSolver {
        ComplianceSolver::new(&params, &SolverSettings::default())
    }

    fn baseline() -> ModelParameters {
        ModelParameters::new(0.5, 20.0, 1.0, 0.0)
    }

    fn old() -> TechnologyProfile {
        TechnologyProfile::new(Technology::Old, 100.0)
    }

    // ── Regression fixtures ─────────────────────────────────────────

    #[test]
    fn old_technology_baseline_violation() {
        let d = solver(baseline()).decide(&old(), 0.0).unwrap();
        assert_eq!(d.regime, DeclarationRegime::Interior);
        assert!((d.optimal_emissions - 60.0).abs() < 1e-9);
        assert!((d.violation - 18.9926).abs() < 1e-4, "Vo = {}", d.violation);
        assert!((d.disutility - 11_595_980.286_703_466).abs() < 1e-2);
    }

    #[test]
    fn strict_fine_deters_fully() {
        let params = ModelParameters::new(0.5, 20.0, 1.0, 40.0);
        let caps = TechnologyCaps::default();
        for tech in [Technology::Old, Technology::New] {
            let d = solver(params).decide(&caps.profile(tech), 0.0).unwrap();
            assert_eq!(d.regime, DeclarationRegime::FullCompliance);
            assert_eq!(d.violation, 0.0);
            assert_eq!(d.fine_paid, 0.0);
            assert_eq!(d.declared_emissions, d.optimal_emissions);
        }
    }

    #[test]
    fn lenient_audit_declares_nothing() {
        let params = ModelParameters::new(0.05, 20.0, 1.0, 0.0);
        let d = solver(params).decide(&old(), 0.0).unwrap();
        assert_eq!(d.regime, DeclarationRegime::ZeroDeclaration);
        assert_eq!(d.declared_emissions, 0.0);
        assert_eq!(d.tax_paid, 0.0);
        assert!((d.violation - 60.0).abs() < 1e-12);
    }

    // ── Decision bookkeeping ────────────────────────────────────────

    #[test]
    fn root_satisfies_condition() {
        let s = solver(baseline());
        let d = s.decide(&old(), 0.0).unwrap();
        assert!(s.residual(&old(), 0.0, d.declared_emissions).abs() < 1e-4);
    }

    #[test]
    fn decision_components_are_consistent() {
        let s = solver(baseline());
        let d = s.decide(&old(), 250.0).unwrap();
        assert!((d.tax_paid - 20.0 * d.declared_emissions).abs() < 1e-9);
        assert!((d.fine_paid - d.violation * d.violation).abs() < 1e-9);
        assert_eq!(d.investment_cost, 250.0);
        let recomputed = expected_disutility(s.params(), &d.outlay()).unwrap();
        assert_eq!(recomputed, d.disutility);
    }

    #[test]
    fn investment_moves_violation_toward_risk_neutral_level() {
        // As the outlay base grows the two states' marginal disutilities
        // converge and v tends to τ / (2π) = 20.
        let s = solver(baseline());
        let cheap = s.decide(&old(), 0.0).unwrap();
        let dear = s.decide(&old(), 2000.0).unwrap();
        assert!(dear.violation > cheap.violation);
        assert!(dear.violation < 20.0);
        assert!((dear.violation - 19.3311).abs() < 1e-3);
    }

    #[test]
    fn risk_neutral_violation_is_closed_form() {
        // With ρ = 0 the condition is π · 2v = τ.
        let params = ModelParameters::new(0.5, 20.0, 0.0, 0.0);
        let d = solver(params).decide(&old(), 0.0).unwrap();
        assert!((d.violation - 20.0).abs() < 1e-6);
    }

    #[test]
    fn audit_probability_sequence() {
        let expected = [
            (0.1, 52.87),
            (0.2, 37.03),
            (0.3, 28.42),
            (0.4, 22.86),
            (0.5, 18.99),
            (0.6, 16.17),
            (0.8, 12.39),
            (1.0, 10.0),
        ];
        for (pi, v) in expected {
            let params = ModelParameters::new(pi, 20.0, 1.0, 0.0);
            let d = solver(params).decide(&old(), 0.0).unwrap();
            assert!((d.violation - v).abs() < 0.01, "π = {pi}: {}", d.violation);
        }
    }

    // ── Properties ──────────────────────────────────────────────────

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Every converged declaration lies in [0, e*].
        #[test]
        fn declaration_is_bounded(
            pi in 0.05f64..=1.0,
            tau in 1.0f64..40.0,
            rho in 0.0f64..3.0,
            ff in 0.0f64..60.0,
            investment in 0.0f64..3000.0,
        ) {
            let params = ModelParameters::new(pi, tau, rho, ff);
            let d = solver(params).decide(&old(), investment).unwrap();
            prop_assert!(d.declared_emissions >= 0.0);
            prop_assert!(d.declared_emissions <= d.optimal_emissions + 1e-9);
            prop_assert!(d.violation >= -1e-9);
        }

        /// Raising the audit probability never raises the violation.
        #[test]
        fn violation_monotone_in_audit_probability(
            pi in 0.1f64..0.9,
            step in 0.01f64..0.1,
            ff in 0.0f64..10.0,
        ) {
            let low = solver(ModelParameters::new(pi, 20.0, 1.0, ff)).decide(&old(), 0.0).unwrap();
            let high = solver(ModelParameters::new(pi + step, 20.0, 1.0, ff)).decide(&old(), 0.0).unwrap();
            prop_assert!(high.violation <= low.violation + 1e-7);
        }
    }
}
