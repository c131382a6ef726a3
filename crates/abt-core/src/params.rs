//! # Model Parameters
//!
//! The regulator and firm parameters that stay fixed for a whole scenario
//! evaluation, including every step of the threshold search.
//!
//! | Field | Symbol | Admissible range |
//! |---|---|---|
//! | `monitoring_probability` | π | (0, 1] |
//! | `tax_rate` | τ | > 0 |
//! | `risk_aversion` | ρ | ≥ 0 |
//! | `fixed_fine` | ff | ≥ 0 |
//! | `alpha` | α | [0, 1] |
//! | `fine_multiplier` | m | > 0 |
//!
//! `ρ = 0` is accepted. It degenerates the disutility to expected total
//! cost, the risk-neutral baseline.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

fn default_alpha() -> f64 {
    0.5
}

fn default_fine_multiplier() -> f64 {
    1.0
}

/// Immutable parameter set for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Probability π that the regulator audits the firm.
    #[serde(alias = "pi")]
    pub monitoring_probability: f64,
    /// Per-unit tax τ levied on declared emissions.
    #[serde(alias = "tau")]
    pub tax_rate: f64,
    /// Risk aversion ρ; disutility is total cost raised to `ρ + 1`.
    #[serde(alias = "rho")]
    pub risk_aversion: f64,
    /// Linear component ff of the fine schedule.
    #[serde(alias = "ff")]
    pub fixed_fine: f64,
    /// Probability weight α on the high-cost realization of the new
    /// technology. Ignored when there is no technological uncertainty.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Scales both fine terms; values above 1 model a stricter audit regime.
    #[serde(default = "default_fine_multiplier")]
    pub fine_multiplier: f64,
}

impl ModelParameters {
    /// Build a parameter set with `alpha = 0.5` and `fine_multiplier = 1`.
    ///
    /// The result is not validated; call [`ModelParameters::validate`]
    /// before handing it to the engine.
    pub fn new(monitoring_probability: f64, tax_rate: f64, risk_aversion: f64, fixed_fine: f64) -> Self {
        Self {
            monitoring_probability,
            tax_rate,
            risk_aversion,
            fixed_fine,
            alpha: default_alpha(),
            fine_multiplier: default_fine_multiplier(),
        }
    }

    /// Replace α.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replace the fine multiplier.
    pub fn with_fine_multiplier(mut self, fine_multiplier: f64) -> Self {
        self.fine_multiplier = fine_multiplier;
        self
    }

    /// Exponent applied to total cost in the disutility, `ρ + 1`.
    pub fn exponent(&self) -> f64 {
        self.risk_aversion + 1.0
    }

    /// Whether the parameters describe the risk-neutral degenerate case.
    pub fn is_risk_neutral(&self) -> bool {
        self.risk_aversion == 0.0
    }

    /// Enforce the admissible ranges listed in the module documentation.
    pub fn validate(&self) -> Result<(), DomainError> {
        check(
            "pi",
            self.monitoring_probability,
            |v| v > 0.0 && v <= 1.0,
            "0 < pi <= 1",
        )?;
        check("tau", self.tax_rate, |v| v > 0.0, "tau > 0")?;
        check("rho", self.risk_aversion, |v| v >= 0.0, "rho >= 0")?;
        check("ff", self.fixed_fine, |v| v >= 0.0, "ff >= 0")?;
        check("alpha", self.alpha, |v| (0.0..=1.0).contains(&v), "0 <= alpha <= 1")?;
        check(
            "fine_multiplier",
            self.fine_multiplier,
            |v| v > 0.0,
            "fine_multiplier > 0",
        )?;
        Ok(())
    }
}

fn check(
    name: &'static str,
    value: f64,
    admissible: impl Fn(f64) -> bool,
    expected: &'static str,
) -> Result<(), DomainError> {
    if value.is_finite() && admissible(value) {
        Ok(())
    } else {
        Err(DomainError::InvalidParameter {
            name,
            value,
            expected,
        })
    }
}
