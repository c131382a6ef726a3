#![deny(missing_docs)]

//! # abt-roots — Bracketed Root Finding
//!
//! The root-finding service the engine calls into. Every equation the model
//! solves is a continuous residual over an economically bounded interval, so
//! a derivative-free bracketed method is sufficient:
//!
//! 1. [`find_roots`] scans `[lo, hi]` on a uniform grid for sign changes and
//!    exact zeros, then refines each bracket with [`brent`]. It returns every
//!    root it finds, sorted and de-duplicated, so callers can distinguish
//!    "no root", "unique root" and "ambiguous".
//!
//! 2. [`find_roots_where`] accepts residuals that may be undefined at some
//!    points (returning `None`). Grid cells touching an undefined point are
//!    skipped. The joint solver uses this for its reduced residual, which is
//!    only defined where the nested sub-problem has a unique solution.
//!
//! All derivative information lives in the residual closures, written out
//! by hand; nothing here differentiates.

pub mod brent;
pub mod error;
pub mod scan;

pub use brent::brent;
pub use error::RootError;
pub use scan::{find_roots, find_roots_where, residual_at};

/// Tolerance, iteration budget and scan resolution for one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFinderOptions {
    /// Absolute tolerance on the root location.
    pub tolerance: f64,
    /// Maximum Brent iterations per bracket.
    pub max_iterations: usize,
    /// Number of uniform sub-intervals scanned for sign changes.
    pub grid_intervals: usize,
}

impl Default for RootFinderOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            grid_intervals: 400,
        }
    }
}

impl RootFinderOptions {
    /// Same tolerance and budget, different scan resolution.
    pub fn with_grid_intervals(self, grid_intervals: usize) -> Self {
        Self {
            grid_intervals,
            ..self
        }
    }
}
