//! Bracketed 1-D root finding.
//!
//! Brent-style hybrid of inverse-quadratic interpolation, secant steps and
//! bisection. The solver is a stateless free function: the residual and the
//! bracket are call arguments, so repeated and concurrent solves need no
//! shared mutable state.

use crate::error::{FlowResult, RootError};

/// Iteration budget for every bracketed solve in this crate.
pub const MAX_ITERATIONS: usize = 100;

/// Find the root of `f(x) = 0` known to lie between `lo` and `hi`.
///
/// `f(lo)` and `f(hi)` must have opposite signs (or be zero), otherwise the
/// solve fails with [`RootError::NotBracketed`]. The root is refined until
/// the bracket width falls below `2·eps·|b| + tol/2` or the residual is
/// exactly zero. The residual may itself fail; its error is propagated
/// unchanged.
///
/// At every iteration the solver operates on three abscissae: `b`, the best
/// approximation so far; `a`, the previous one; and `c`, an earlier point
/// kept on the opposite side of the root from `b`. An interpolated step is
/// accepted only when it falls inside `[b, c]` and is not too large;
/// bisection is used otherwise, so the bracket shrinks by at least a factor
/// of 1.6 per iteration.
pub fn find_root<F>(mut f: F, lo: f64, hi: f64, tol: f64) -> FlowResult<f64>
where
    F: FnMut(f64) -> FlowResult<f64>,
{
    let tol = tol.max(f64::EPSILON);

    let mut a = lo;
    let mut b = hi;
    let mut fa = f(a)?;
    let mut fb = f(b)?;

    if (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
        return Err(RootError::NotBracketed {
            lo,
            hi,
            f_lo: fa,
            f_hi: fb,
        }
        .into());
    }

    let mut c = a;
    let mut fc = fa;

    for _ in 0..MAX_ITERATIONS {
        let prev_step = b - a;

        if fc.abs() < fb.abs() {
            // Swap so that b remains the best approximation.
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol_act = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let mut new_step = 0.5 * (c - b);

        if new_step.abs() <= tol_act || fb == 0.0 {
            return Ok(b);
        }

        // Interpolation may be tried if the previous step was large enough
        // and moved in the right direction.
        if prev_step.abs() >= tol_act && fa.abs() > fb.abs() {
            let cb = c - b;
            let s = fb / fa;
            let mut p;
            let mut q;

            if a == c {
                // Only two distinct points: secant step.
                p = cb * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation.
                let t = fa / fc;
                let r = fb / fc;
                p = s * (cb * t * (t - r) - (b - a) * (r - 1.0));
                q = (t - 1.0) * (r - 1.0) * (s - 1.0);
            }

            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            if p < 0.75 * cb * q - (tol_act * q * 0.5).abs() && p < (prev_step * q * 0.5).abs() {
                // b + p/q falls within [b, c] and is not too large.
                new_step = p / q;
            }
        }

        // Never step by less than the actual tolerance.
        if new_step.abs() < tol_act {
            new_step = if new_step > 0.0 { tol_act } else { -tol_act };
        }

        a = b;
        fa = fb;
        b += new_step;
        fb = f(b)?;

        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            // Keep c on the opposite side of the root from b.
            c = a;
            fc = fa;
        }
    }

    Err(RootError::MaxIterationsExceeded(MAX_ITERATIONS).into())
}
