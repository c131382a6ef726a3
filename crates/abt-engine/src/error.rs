//! # Engine Error Types
//!
//! Every engine failure is terminal for the scenario being evaluated.
//! Variants raised while solving an equation name the equation and the
//! investment cost of the trial, so a failing scan can be diagnosed from the
//! message alone. Retrying the same call is pointless: the computation is
//! deterministic.

use thiserror::Error;

use abt_core::DomainError;
use abt_roots::RootError;

/// The equations the engine hands to the root finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equation {
    /// The declared-emissions first-order condition for one technology.
    DeclaredEmissions,
    /// The expected marginal condition on emissions under certain compliance.
    JointFullCompliance,
    /// The declared-emissions condition of the joint system, nested per
    /// emissions trial point.
    JointDeclared,
    /// The emissions condition of the joint system, reduced along the
    /// declared-emissions solution.
    JointEmissions,
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DeclaredEmissions => "declared-emissions condition",
            Self::JointFullCompliance => "joint full-compliance condition",
            Self::JointDeclared => "joint declared-emissions condition",
            Self::JointEmissions => "joint emissions condition",
        };
        f.write_str(s)
    }
}

/// Errors raised while evaluating a scenario.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A closed-form precondition was violated.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// More than one admissible root where the model assumes uniqueness.
    #[error("ambiguous roots for the {equation} at investment cost {investment_cost}: {candidates:?}")]
    AmbiguousRoot {
        /// The equation being solved.
        equation: Equation,
        /// Investment cost of the trial.
        investment_cost: f64,
        /// Every surviving candidate.
        candidates: Vec<f64>,
    },

    /// No real, positive, in-range root exists.
    #[error("model infeasible: no admissible root for the {equation} at investment cost {investment_cost} ({reason})")]
    ModelInfeasible {
        /// The equation being solved.
        equation: Equation,
        /// Investment cost of the trial.
        investment_cost: f64,
        /// Why no candidate survived.
        reason: String,
    },

    /// The root finder exhausted its iteration budget.
    #[error("solver did not converge on the {equation} at investment cost {investment_cost} after {iterations} iterations (last bracket [{lo}, {hi}])")]
    SolverDidNotConverge {
        /// The equation being solved.
        equation: Equation,
        /// Investment cost of the trial.
        investment_cost: f64,
        /// Iterations performed.
        iterations: usize,
        /// Lower end of the last bracket.
        lo: f64,
        /// Upper end of the last bracket.
        hi: f64,
    },

    /// The root finder rejected its input or met an undefined residual.
    #[error("root finder failed on the {equation} at investment cost {investment_cost}: {source}")]
    RootFinder {
        /// The equation being solved.
        equation: Equation,
        /// Investment cost of the trial.
        investment_cost: f64,
        /// The underlying failure.
        #[source]
        source: RootError,
    },

    /// The backward scan reached zero without the old technology becoming
    /// strictly worse than the new one.
    #[error("no investment threshold in [0, {i_max}]: the old technology is preferred at every scanned cost")]
    ThresholdNotFound {
        /// Upper bound of the scan.
        i_max: u32,
        /// Lowest investment cost evaluated.
        lowest_scanned: u32,
    },
}

impl EngineError {
    /// Attach equation and trial context to a root-finder failure.
    pub fn from_root(equation: Equation, investment_cost: f64, err: RootError) -> Self {
        match err {
            RootError::DidNotConverge { iterations, lo, hi } => Self::SolverDidNotConverge {
                equation,
                investment_cost,
                iterations,
                lo,
                hi,
            },
            source => Self::RootFinder {
                equation,
                investment_cost,
                source,
            },
        }
    }

    /// Short machine-readable kind, used in sweep output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::AmbiguousRoot { .. } => "ambiguous_root",
            Self::ModelInfeasible { .. } => "model_infeasible",
            Self::SolverDidNotConverge { .. } => "solver_did_not_converge",
            Self::RootFinder { .. } => "root_finder",
            Self::ThresholdNotFound { .. } => "threshold_not_found",
        }
    }
}
