//! # Domain Errors
//!
//! Structured precondition failures for the closed-form model, built with
//! `thiserror`. A [`DomainError`] means an input violated a stated
//! precondition (a parameter outside its admissible range, a negative cost
//! sum, a non-finite quantity). It is never recovered from: the scenario
//! evaluation that produced it is aborted.

use thiserror::Error;

/// A closed-form input violated a stated precondition.
///
/// Each variant carries the offending value and, where applicable, the
/// admissible range so that a misconfigured scenario can be diagnosed from
/// the message alone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A model or technology parameter lies outside its admissible range.
    #[error("invalid parameter {name} = {value} (expected {expected})")]
    InvalidParameter {
        /// The parameter name as it appears in scenario configuration.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable admissible range.
        expected: &'static str,
    },

    /// A cost sum raised to the risk-aversion power was negative.
    ///
    /// Feasible inputs never produce this; it signals a parametrization bug
    /// upstream (for example a tax rate larger than a technology's cap).
    #[error("negative cost base {base} in {term}")]
    NegativeCostBase {
        /// Which disutility term was being evaluated.
        term: &'static str,
        /// The offending base value.
        base: f64,
    },

    /// A computed quantity was NaN or infinite.
    #[error("non-finite {quantity}: {value}")]
    NonFinite {
        /// What was being computed.
        quantity: &'static str,
        /// The non-finite value.
        value: f64,
    },

    /// Technology caps are inconsistent with each other.
    #[error("inconsistent technology caps: {0}")]
    InconsistentCaps(String),
}

impl DomainError {
    /// Check that `value` is finite, reporting it as `quantity` otherwise.
    pub fn require_finite(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DomainError::NonFinite { quantity, value })
        }
    }
}
