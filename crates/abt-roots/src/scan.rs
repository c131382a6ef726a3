//! # Grid-Scan Root Discovery
//!
//! Locates every root of a residual in a bounded interval. The interval is
//! split into `grid_intervals` uniform cells; a grid point where the
//! residual is exactly zero is a root, and a cell whose endpoints have
//! opposite signs is refined with Brent's method.
//!
//! Roots closer together than one grid cell with an even number of sign
//! changes between them are not resolved. The model's residuals are smooth
//! and their roots well separated at the default resolution.

use crate::brent::{evaluate, refine};
use crate::error::RootError;
use crate::RootFinderOptions;

/// Find all roots of a total residual in `[lo, hi]`.
///
/// Non-finite residual values are treated as undefined points.
pub fn find_roots<F>(mut f: F, lo: f64, hi: f64, options: &RootFinderOptions) -> Result<Vec<f64>, RootError>
where
    F: FnMut(f64) -> f64,
{
    find_roots_where(|x| Some(f(x)), lo, hi, options)
}

/// Find all roots of a partial residual in `[lo, hi]`.
///
/// `f` returns `None` where the residual is undefined. Cells with an
/// undefined endpoint are skipped; an undefined point discovered while
/// refining a bracket is an error.
pub fn find_roots_where<F>(
    mut f: F,
    lo: f64,
    hi: f64,
    options: &RootFinderOptions,
) -> Result<Vec<f64>, RootError>
where
    F: FnMut(f64) -> Option<f64>,
{
    if !(lo.is_finite() && hi.is_finite() && lo < hi) || options.grid_intervals == 0 {
        return Err(RootError::InvalidInterval { lo, hi });
    }

    let cells = options.grid_intervals;
    let step = (hi - lo) / cells as f64;
    let mut roots = Vec::new();
    let mut previous: Option<(f64, f64)> = None;

    for k in 0..=cells {
        let x = if k == cells { hi } else { lo + step * k as f64 };
        let fx = f(x).filter(|v| v.is_finite());

        if let Some(value) = fx {
            if value == 0.0 {
                roots.push(x);
            } else if let Some((px, pv)) = previous {
                if pv != 0.0 && (pv > 0.0) != (value > 0.0) {
                    roots.push(refine(&mut f, px, pv, x, value, options)?);
                }
            }
        }
        previous = fx.map(|value| (x, value));
    }

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() <= 10.0 * options.tolerance);

    tracing::trace!(lo, hi, cells, found = roots.len(), "root scan complete");
    Ok(roots)
}

/// Evaluate a total residual once, for callers that need the value at a
/// bound to classify a corner solution.
pub fn residual_at<F>(mut f: F, x: f64) -> Result<f64, RootError>
where
    F: FnMut(f64) -> f64,
{
    evaluate(&mut |x| Some(f(x)), x)
}
