//! Bridges scenario solver settings to the root finder and attaches
//! equation context to its failures.

use abt_core::SolverSettings;
use abt_roots::{find_roots_where, RootError, RootFinderOptions};

use crate::error::{EngineError, Equation};

/// Options for single-equation scans.
pub(crate) fn single_options(settings: &SolverSettings) -> RootFinderOptions {
    RootFinderOptions {
        tolerance: settings.tolerance,
        max_iterations: settings.max_iterations,
        grid_intervals: settings.grid_intervals,
    }
}

/// Options for the outer and inner scans of the joint solver.
pub(crate) fn joint_options(settings: &SolverSettings) -> (RootFinderOptions, RootFinderOptions) {
    let base = single_options(settings);
    (
        base.with_grid_intervals(settings.joint_grid_intervals),
        base.with_grid_intervals(settings.joint_inner_grid_intervals),
    )
}

/// All roots of `residual` in `[lo, hi]`, with non-finite values treated as
/// undefined points.
pub(crate) fn roots_in<F>(
    equation: Equation,
    investment_cost: f64,
    mut residual: F,
    lo: f64,
    hi: f64,
    options: &RootFinderOptions,
) -> Result<Vec<f64>, EngineError>
where
    F: FnMut(f64) -> f64,
{
    find_roots_where(|x| finite(residual(x)), lo, hi, options)
        .map_err(|err| EngineError::from_root(equation, investment_cost, err))
}

/// Same as [`roots_in`] but without context, for nested solves whose errors
/// are collected by the caller.
pub(crate) fn raw_roots_in<F>(
    mut residual: F,
    lo: f64,
    hi: f64,
    options: &RootFinderOptions,
) -> Result<Vec<f64>, RootError>
where
    F: FnMut(f64) -> f64,
{
    find_roots_where(|x| finite(residual(x)), lo, hi, options)
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Exactly one candidate, or the matching error.
pub(crate) fn unique(
    equation: Equation,
    investment_cost: f64,
    candidates: Vec<f64>,
    reason: impl FnOnce() -> String,
) -> Result<f64, EngineError> {
    match candidates.as_slice() {
        [only] => Ok(*only),
        [] => Err(EngineError::ModelInfeasible {
            equation,
            investment_cost,
            reason: reason(),
        }),
        _ => Err(EngineError::AmbiguousRoot {
            equation,
            investment_cost,
            candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_accepts_single_candidate() {
        let r = unique(Equation::DeclaredEmissions, 0.0, vec![3.0], String::new).unwrap();
        assert_eq!(r, 3.0);
    }

    #[test]
    fn unique_rejects_empty_and_multiple() {
        assert!(matches!(
            unique(Equation::JointEmissions, 5.0, vec![], || "none".into()),
            Err(EngineError::ModelInfeasible { .. })
        ));
        assert!(matches!(
            unique(Equation::JointEmissions, 5.0, vec![1.0, 2.0], String::new),
            Err(EngineError::AmbiguousRoot { .. })
        ));
    }

    #[test]
    fn joint_options_use_joint_resolutions() {
        let settings = SolverSettings::default();
        let (outer, inner) = joint_options(&settings);
        assert_eq!(outer.grid_intervals, settings.joint_grid_intervals);
        assert_eq!(inner.grid_intervals, settings.joint_inner_grid_intervals);
        assert_eq!(outer.tolerance, settings.tolerance);
    }

    #[test]
    fn roots_in_attaches_equation() {
        let err = roots_in(
            Equation::DeclaredEmissions,
            7.0,
            |x| x,
            1.0,
            0.0,
            &single_options(&SolverSettings::default()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::RootFinder {
                equation: Equation::DeclaredEmissions,
                ..
            }
        ));
    }
}
