//! # Disutility Evaluator
//!
//! Expected disutility of a firm that bears abatement cost `C`, tax `T` and
//! investment `I` in every state, and additionally the fine `F` when
//! audited (probability π):
//!
//! ```text
//! D = (1 - π) · (C + T + I)^(ρ+1) + π · (C + T + I + F)^(ρ+1)
//! ```
//!
//! With `ρ = 0` this is expected total cost.

use serde::Serialize;

use abt_core::{DomainError, ModelParameters};

/// What the firm pays under one technology.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Outlay {
    /// Abatement cost `C`.
    pub abatement_cost: f64,
    /// Tax on declared emissions `T`.
    pub tax: f64,
    /// Investment cost `I`.
    pub investment: f64,
    /// Fine if audited `F`.
    pub fine: f64,
}

impl Outlay {
    /// Total paid when not audited.
    pub fn unaudited(&self) -> f64 {
        self.abatement_cost + self.tax + self.investment
    }

    /// Total paid when audited.
    pub fn audited(&self) -> f64 {
        self.unaudited() + self.fine
    }
}

/// Evaluate the expected disutility of `outlay`.
///
/// Fails with [`DomainError::NegativeCostBase`] if either state's total is
/// negative.
pub fn expected_disutility(params: &ModelParameters, outlay: &Outlay) -> Result<f64, DomainError> {
    let unaudited = outlay.unaudited();
    let audited = outlay.audited();
    if unaudited < 0.0 {
        return Err(DomainError::NegativeCostBase {
            term: "unaudited outlay",
            base: unaudited,
        });
    }
    if audited < 0.0 {
        return Err(DomainError::NegativeCostBase {
            term: "audited outlay",
            base: audited,
        });
    }
    let pi = params.monitoring_probability;
    let exponent = params.exponent();
    let value = (1.0 - pi) * unaudited.powf(exponent) + pi * audited.powf(exponent);
    DomainError::require_finite("expected disutility", value)
}

/// Derivative of `base^(ρ+1)` with respect to `base`: `(ρ+1) · base^ρ`.
///
/// Returns NaN for a negative base with fractional `ρ`; residuals built on
/// it treat that point as undefined.
pub fn marginal_disutility(params: &ModelParameters, base: f64) -> f64 {
    params.exponent() * base.powf(params.risk_aversion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(rho: f64) -> ModelParameters {
        ModelParameters::new(0.5, 20.0, rho, 0.0)
    }

    #[test]
    fn compliance_branch_has_no_fine_spread() {
        let outlay = Outlay {
            abatement_cost: 2400.0,
            tax: 1200.0,
            investment: 0.0,
            fine: 0.0,
        };
        let d = expected_disutility(&params(1.0), &outlay).unwrap();
        assert!((d - 3600.0 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn fine_weighted_by_audit_probability() {
        let outlay = Outlay {
            abatement_cost: 0.0,
            tax: 10.0,
            investment: 0.0,
            fine: 10.0,
        };
        // 0.5 · 10² + 0.5 · 20²
        let d = expected_disutility(&params(1.0), &outlay).unwrap();
        assert!((d - 250.0).abs() < 1e-9);
    }

    #[test]
    fn risk_neutral_is_expected_cost() {
        let outlay = Outlay {
            abatement_cost: 100.0,
            tax: 50.0,
            investment: 25.0,
            fine: 30.0,
        };
        let d = expected_disutility(&params(0.0), &outlay).unwrap();
        assert!((d - (175.0 + 0.5 * 30.0)).abs() < 1e-12);
    }

    #[test]
    fn negative_base_is_domain_error() {
        let outlay = Outlay {
            abatement_cost: -100.0,
            tax: 10.0,
            investment: 0.0,
            fine: 0.0,
        };
        assert!(matches!(
            expected_disutility(&params(1.0), &outlay),
            Err(DomainError::NegativeCostBase {
                term: "unaudited outlay",
                ..
            })
        ));
    }

    #[test]
    fn negative_audited_base_is_domain_error() {
        let outlay = Outlay {
            abatement_cost: 5.0,
            tax: 0.0,
            investment: 0.0,
            fine: -10.0,
        };
        assert!(matches!(
            expected_disutility(&params(1.0), &outlay),
            Err(DomainError::NegativeCostBase {
                term: "audited outlay",
                ..
            })
        ));
    }

    #[test]
    fn marginal_disutility_power_rule() {
        assert_eq!(marginal_disutility(&params(1.0), 10.0), 20.0);
        assert_eq!(marginal_disutility(&params(0.0), 10.0), 1.0);
        assert!((marginal_disutility(&params(2.0), 3.0) - 27.0).abs() < 1e-12);
    }

    #[test]
    fn disutility_increases_with_investment() {
        let mut outlay = Outlay {
            abatement_cost: 525.0,
            tax: 400.0,
            investment: 0.0,
            fine: 50.0,
        };
        let low = expected_disutility(&params(1.0), &outlay).unwrap();
        outlay.investment = 100.0;
        let high = expected_disutility(&params(1.0), &outlay).unwrap();
        assert!(high > low);
    }
}
