//! # Sanction Model
//!
//! The fine an audited firm pays as a function of its violation
//! `v = e - r` (actual minus declared emissions):
//!
//! ```text
//! fine(v)     = m * (ff * v + v²)
//! fine'(v)    = m * (ff + 2v)
//! ```
//!
//! `m` is the scenario's fine multiplier (1 by default). The derivative is
//! taken with respect to the violation, not the declared emissions; the
//! first-order conditions downstream rely on that sign convention.

use serde::Serialize;

use abt_core::ModelParameters;

/// A strictly increasing, convex fine schedule in the violation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sanction {
    /// Linear component `ff`.
    pub fixed_fine: f64,
    /// Multiplier `m` applied to both terms.
    pub multiplier: f64,
}

impl Sanction {
    /// The schedule configured by `params`.
    pub fn from_params(params: &ModelParameters) -> Self {
        Self {
            fixed_fine: params.fixed_fine,
            multiplier: params.fine_multiplier,
        }
    }

    /// Fine for a violation of `violation` emission units.
    pub fn fine(&self, violation: f64) -> f64 {
        self.multiplier * (self.fixed_fine * violation + violation * violation)
    }

    /// Marginal fine with respect to the violation level.
    pub fn marginal_fine(&self, violation: f64) -> f64 {
        self.multiplier * (self.fixed_fine + 2.0 * violation)
    }

    /// Fine when declaring `declared` against actual emissions `emissions`.
    pub fn fine_at(&self, emissions: f64, declared: f64) -> f64 {
        self.fine(emissions - declared)
    }

    /// Marginal fine at the violation implied by `declared` and `emissions`.
    pub fn fine_derivative_at(&self, emissions: f64, declared: f64) -> f64 {
        self.marginal_fine(emissions - declared)
    }

    /// `π · fine'(0) - τ`: marginal deterrence at zero violation, net of tax.
    ///
    /// Non-negative means truthful reporting is already optimal at the
    /// margin, so the firm complies fully.
    pub fn zero_violation_deterrence(&self, params: &ModelParameters) -> f64 {
        params.monitoring_probability * self.marginal_fine(0.0) - params.tax_rate
    }

    /// Whether full compliance is optimal at the margin.
    pub fn deters_fully(&self, params: &ModelParameters) -> bool {
        self.zero_violation_deterrence(params) >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sanction(ff: f64) -> Sanction {
        Sanction::from_params(&ModelParameters::new(0.5, 20.0, 1.0, ff))
    }

    #[test]
    fn quadratic_fine_without_fixed_component() {
        let s = sanction(0.0);
        assert_eq!(s.fine(3.0), 9.0);
        assert_eq!(s.marginal_fine(3.0), 6.0);
    }

    #[test]
    fn fine_at_uses_violation() {
        let s = sanction(40.0);
        // v = 60 - 41 = 19 → 40·19 + 361
        assert_eq!(s.fine_at(60.0, 41.0), 1121.0);
        assert_eq!(s.fine_derivative_at(60.0, 41.0), 78.0);
    }

    #[test]
    fn higher_declaration_lowers_fine_and_marginal() {
        let s = sanction(10.0);
        assert!(s.fine_at(60.0, 50.0) < s.fine_at(60.0, 40.0));
        assert!(s.fine_derivative_at(60.0, 50.0) < s.fine_derivative_at(60.0, 40.0));
    }

    #[test]
    fn multiplier_scales_both_terms() {
        let params = ModelParameters::new(0.5, 20.0, 1.0, 2.0).with_fine_multiplier(5.0);
        let s = Sanction::from_params(&params);
        assert_eq!(s.fine(1.0), 15.0);
        assert_eq!(s.marginal_fine(1.0), 20.0);
    }

    #[test]
    fn deterrence_condition() {
        let params = ModelParameters::new(0.5, 20.0, 1.0, 40.0);
        let s = Sanction::from_params(&params);
        assert_eq!(s.zero_violation_deterrence(&params), 0.0);
        assert!(s.deters_fully(&params));

        let lenient = ModelParameters::new(0.5, 20.0, 1.0, 0.0);
        assert!(!Sanction::from_params(&lenient).deters_fully(&lenient));
    }

    proptest! {
        /// No violation, no fine.
        #[test]
        fn zero_violation_identity(ff in 0.0f64..100.0, e in 0.0f64..200.0, m in 0.1f64..10.0) {
            let s = Sanction { fixed_fine: ff, multiplier: m };
            prop_assert_eq!(s.fine_at(e, e), 0.0);
        }

        /// The fine is increasing in the violation level.
        #[test]
        fn fine_increasing(ff in 0.0f64..100.0, v in 0.0f64..100.0, dv in 0.001f64..10.0) {
            let s = Sanction { fixed_fine: ff, multiplier: 1.0 };
            prop_assert!(s.fine(v + dv) > s.fine(v));
        }
    }
}
