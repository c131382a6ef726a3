//! # Root-Finding Errors

use thiserror::Error;

/// Errors raised by the bracketed root finder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootError {
    /// The search interval is empty, reversed or not finite.
    #[error("invalid search interval [{lo}, {hi}]")]
    InvalidInterval {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },

    /// The residual has the same sign at both ends of the bracket.
    #[error("root not bracketed in [{lo}, {hi}]: f(lo) = {f_lo}, f(hi) = {f_hi}")]
    NotBracketed {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
        /// Residual at `lo`.
        f_lo: f64,
        /// Residual at `hi`.
        f_hi: f64,
    },

    /// The iteration budget ran out before the bracket shrank below tolerance.
    #[error("no convergence after {iterations} iterations; last bracket [{lo}, {hi}]")]
    DidNotConverge {
        /// Iterations performed.
        iterations: usize,
        /// Lower end of the last bracket.
        lo: f64,
        /// Upper end of the last bracket.
        hi: f64,
    },

    /// The residual was undefined (or non-finite) inside a bracket whose
    /// endpoints were both defined.
    #[error("residual undefined at x = {x} inside a bracket")]
    UndefinedResidual {
        /// Where the residual was undefined.
        x: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn did_not_converge_display() {
        let err = RootError::DidNotConverge {
            iterations: 7,
            lo: 1.0,
            hi: 2.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("7 iterations"));
        assert!(msg.contains("[1, 2]"));
    }

    #[test]
    fn not_bracketed_display() {
        let err = RootError::NotBracketed {
            lo: 0.0,
            hi: 1.0,
            f_lo: 3.0,
            f_hi: 4.0,
        };
        assert!(format!("{err}").contains("not bracketed"));
    }
}
