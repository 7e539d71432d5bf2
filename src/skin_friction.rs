//! Compressible turbulent skin friction.
//!
//! The T' (reference temperature) method of Sommer and Short
//! (NACA-TN-3391, Appendix C): the compressible boundary layer is mapped to
//! an equivalent incompressible one at the reference temperature, the
//! incompressible Karman-Schoenherr equation is solved there, and the result
//! is mapped back.

use crate::root_finding::find_root;
use crate::error::FlowResult;

/// Applicability floor for the Karman-Schoenherr fit; below this Reynolds
/// number the solve is not attempted and NaN is returned.
const MIN_REYNOLDS: f64 = 1000.0;

/// Sutherland-law viscosity ratio mu/mu_ref for air as a function of the
/// temperature ratio T/Tref, with S/Tref taken as 0.505.
/// Valid for air from roughly 116 K to 2060 K.
pub fn viscosity_ratio(t_ratio: f64) -> f64 {
    t_ratio.sqrt() * 1.505 / (1.0 + 0.505 / t_ratio)
}

/// Turbulent skin-friction coefficient in a boundary layer, including the
/// effects of compressibility, viscosity and heat transfer.
///
/// `m1` is the Mach number just outside the boundary layer, `tw_ratio` the
/// wall-to-edge temperature ratio Tw/T1, `re1` the edge Reynolds number.
///
/// Returns NaN when the model is inapplicable (very low Reynolds number) or
/// the inner Karman-Schoenherr solve fails, rather than surfacing an error;
/// callers are expected to check for NaN.
pub fn turbulent_skin_friction(m1: f64, tw_ratio: f64, re1: f64) -> f64 {
    if re1 < MIN_REYNOLDS {
        return f64::NAN;
    }

    let tp_ratio = 1.0 + 0.35 * m1 * m1 + (tw_ratio - 1.0);
    let mup_ratio = viscosity_ratio(tp_ratio);
    let rp_ratio = 1.0 / (tp_ratio * mup_ratio);

    match karman_schoenherr(rp_ratio * re1, 1e-6) {
        Ok(cf_incompressible) => cf_incompressible / tp_ratio,
        Err(_) => f64::NAN,
    }
}

/// Solve the Karman-Schoenherr equation `0.242/sqrt(cf) = log10(cf * Re)`
/// for the incompressible skin-friction coefficient.
fn karman_schoenherr(re: f64, tol: f64) -> FlowResult<f64> {
    // Bracket the root around the Prandtl-Schlichting curve fit.
    let cf_guess = 0.455 / re.log10().powf(2.58);

    find_root(
        |cf| {
            let denom = (cf * re).log10();
            Ok(0.058564 / (denom * denom) - cf)
        },
        cf_guess * 0.95,
        cf_guess * 1.05,
        tol,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viscosity_ratio_is_unity_at_reference() {
        assert!((viscosity_ratio(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn viscosity_increases_with_temperature() {
        assert!(viscosity_ratio(2.0) > 1.0);
        assert!(viscosity_ratio(0.5) < 1.0);
    }

    #[test]
    fn incompressible_value_at_re_1e7() {
        // Karman-Schoenherr at Re = 1e7: cf is close to 0.00295.
        let cf = turbulent_skin_friction(0.0, 1.0, 1e7);
        assert!((cf - 0.00295).abs() < 1e-4, "cf = {cf}");
    }

    #[test]
    fn friction_falls_with_reynolds_number() {
        let cf_low = turbulent_skin_friction(0.0, 1.0, 1e6);
        let cf_high = turbulent_skin_friction(0.0, 1.0, 1e8);
        assert!(cf_high < cf_low);
    }

    #[test]
    fn compressibility_reduces_friction() {
        let cf_incomp = turbulent_skin_friction(0.0, 1.0, 1e7);
        let cf_comp = turbulent_skin_friction(2.0, 1.0, 1e7);
        assert!(cf_comp < cf_incomp);
    }

    #[test]
    fn hot_wall_reduces_friction() {
        let cf_cold = turbulent_skin_friction(1.0, 1.0, 1e7);
        let cf_hot = turbulent_skin_friction(1.0, 2.0, 1e7);
        assert!(cf_hot < cf_cold);
    }

    #[test]
    fn very_low_reynolds_number_gives_nan() {
        assert!(turbulent_skin_friction(0.0, 1.0, 500.0).is_nan());
        assert!(turbulent_skin_friction(0.0, 1.0, 10.0).is_nan());
    }
}
