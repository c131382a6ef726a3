//! # Abatement Cost Model
//!
//! Closed-form abatement cost and marginal cost per technology. A technology
//! with efficiency cap `c` has
//!
//! ```text
//! cost(e)          = (c - e) * e
//! marginal_cost(e) = c - 2e
//! ```
//!
//! and its unconstrained emissions optimum solves `marginal_cost(e*) + τ = 0`,
//! i.e. `e* = (c + τ) / 2`. The optimum depends on neither the investment
//! cost nor the firm's reporting behaviour, so it is computed once per
//! technology per scenario.

use serde::Serialize;

use abt_core::{ModelParameters, Technology, TechnologyProfile};

/// An abatement cost curve and its derivative in emissions.
///
/// Implemented by [`TechnologyProfile`] (the quadratic curve) and by
/// [`SaturatedAbatement`], the curve the joint solver substitutes for the
/// low-cost realization once emissions exceed its cap.
pub trait AbatementCost {
    /// Abatement cost at emissions `e`.
    fn cost(&self, e: f64) -> f64;
    /// Derivative of [`AbatementCost::cost`] at `e`.
    fn marginal_cost(&self, e: f64) -> f64;
}

impl AbatementCost for TechnologyProfile {
    fn cost(&self, e: f64) -> f64 {
        (self.cap - e) * e
    }

    fn marginal_cost(&self, e: f64) -> f64 {
        self.cap - 2.0 * e
    }
}

/// A realization that abates fully at zero incremental cost.
///
/// Used for the low-cost realization when the jointly chosen emissions
/// exceed its cap, where the quadratic curve would go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaturatedAbatement;

impl AbatementCost for SaturatedAbatement {
    fn cost(&self, _e: f64) -> f64 {
        0.0
    }

    fn marginal_cost(&self, _e: f64) -> f64 {
        0.0
    }
}

/// The unconstrained emissions optimum of one technology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalEmissions {
    /// The technology.
    pub technology: Technology,
    /// Optimal actual emissions `e*`.
    pub emissions: f64,
    /// Abatement cost at `e*`.
    pub abatement_cost: f64,
}

impl OptimalEmissions {
    /// Solve `marginal_cost(e*) + τ = 0` in closed form.
    pub fn solve(profile: &TechnologyProfile, params: &ModelParameters) -> Self {
        let emissions = (profile.cap + params.tax_rate) / 2.0;
        Self {
            technology: profile.technology,
            emissions,
            abatement_cost: profile.cost(emissions),
        }
    }
}
