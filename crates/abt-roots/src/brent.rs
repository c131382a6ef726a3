//! # Brent's Method
//!
//! Brent–Dekker bracketed root refinement: inverse quadratic interpolation
//! and secant steps, falling back to bisection whenever an interpolated step
//! would leave the bracket or shrink it too slowly. The bracket is kept
//! valid at every iteration, so convergence is guaranteed for a continuous
//! residual; the iteration budget only guards against pathological inputs.

use crate::error::RootError;
use crate::RootFinderOptions;

/// Find a root of `f` in `[lo, hi]`, which must bracket a sign change.
///
/// Returns an endpoint directly if the residual vanishes there.
pub fn brent<F>(mut f: F, lo: f64, hi: f64, options: &RootFinderOptions) -> Result<f64, RootError>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(RootError::InvalidInterval { lo, hi });
    }
    let mut partial = |x: f64| Some(f(x));
    let f_lo = evaluate(&mut partial, lo)?;
    let f_hi = evaluate(&mut partial, hi)?;
    refine(&mut partial, lo, f_lo, hi, f_hi, options)
}

/// Evaluate a partial residual, rejecting undefined and non-finite values.
pub(crate) fn evaluate<F>(f: &mut F, x: f64) -> Result<f64, RootError>
where
    F: FnMut(f64) -> Option<f64>,
{
    f(x).filter(|v| v.is_finite())
        .ok_or(RootError::UndefinedResidual { x })
}

/// Refine a bracket whose endpoint residuals are already known.
pub(crate) fn refine<F>(
    f: &mut F,
    lo: f64,
    f_lo: f64,
    hi: f64,
    f_hi: f64,
    options: &RootFinderOptions,
) -> Result<f64, RootError>
where
    F: FnMut(f64) -> Option<f64>,
{
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if (f_lo > 0.0) == (f_hi > 0.0) {
        return Err(RootError::NotBracketed {
            lo,
            hi,
            f_lo,
            f_hi,
        });
    }

    let (mut a, mut fa) = (lo, f_lo);
    let (mut b, mut fb) = (hi, f_hi);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..options.max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * options.tolerance;
        let half_width = 0.5 * (c - b);
        if half_width.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                // Secant step.
                p = 2.0 * half_width * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation.
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * half_width * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            let bound_interp = 3.0 * half_width * q - (tol * q).abs();
            let bound_prev = (e * q).abs();
            if 2.0 * p < bound_interp.min(bound_prev) {
                e = d;
                d = p / q;
            } else {
                d = half_width;
                e = d;
            }
        } else {
            d = half_width;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else {
            tol.copysign(half_width)
        };
        fb = evaluate(f, b)?;
    }

    tracing::debug!(
        iterations = options.max_iterations,
        lo = b.min(c),
        hi = b.max(c),
        "brent refinement exhausted its iteration budget"
    );
    Err(RootError::DidNotConverge {
        iterations: options.max_iterations,
        lo: b.min(c),
        hi: b.max(c),
    })
}
