//! Isentropic flow relations for a calorically perfect gas.
//!
//! All ratios assume adiabatic, reversible flow. Stagnation (total)
//! quantities are the values a flow property would reach if isentropically
//! decelerated to rest. Every function here is pure and safe to call from
//! any number of threads.

use crate::constants::MAX_MACH;
use crate::error::{DomainError, FlowResult};
use crate::root_finding::find_root;

/// Which solution of the area-ratio relation to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Subsonic,
    Supersonic,
}

/// Ratio of total to static temperature (TT/T) at Mach `m`.
pub fn stagnation_temperature_ratio(m: f64, gam: f64) -> f64 {
    1.0 + 0.5 * (gam - 1.0) * m * m
}

/// Ratio of total to static pressure (PT/P) at Mach `m`.
pub fn stagnation_pressure_ratio(m: f64, gam: f64) -> f64 {
    stagnation_temperature_ratio(m, gam).powf(gam / (gam - 1.0))
}

/// Ratio of total to static density (rhoT/rho) at Mach `m`.
pub fn stagnation_density_ratio(m: f64, gam: f64) -> f64 {
    stagnation_temperature_ratio(m, gam).powf(1.0 / (gam - 1.0))
}

/// Temperature ratio between two points in isentropic flow, given the
/// pressure ratio between them.
pub fn temperature_ratio_from_pressure(p2_p1: f64, gam: f64) -> f64 {
    p2_p1.powf((gam - 1.0) / gam)
}

/// Pressure ratio between two points in isentropic flow, given the
/// temperature ratio between them.
pub fn pressure_ratio_from_temperature(t2_t1: f64, gam: f64) -> f64 {
    t2_t1.powf(gam / (gam - 1.0))
}

/// Density ratio between two points in isentropic flow, given the
/// temperature ratio between them.
pub fn density_ratio_from_temperature(t2_t1: f64, gam: f64) -> f64 {
    t2_t1.powf(1.0 / (gam - 1.0))
}

/// Duct area ratio A/A* that produces Mach `m` downstream of a sonic throat.
pub fn area_ratio(m: f64, gam: f64) -> f64 {
    let gam_p1 = gam + 1.0;
    let term = 2.0 * stagnation_temperature_ratio(m, gam) / gam_p1;
    term.powf(0.5 * gam_p1 / (gam - 1.0)) / m
}

/// Mach number at a duct station with area ratio `a_astar` = A/A*.
///
/// The relation has a subsonic and a supersonic solution; `regime` selects
/// which one is returned. Fails with a [`DomainError`] if `a_astar < 1`.
pub fn mach_from_area_ratio(
    a_astar: f64,
    gam: f64,
    tol: f64,
    regime: FlowRegime,
) -> FlowResult<f64> {
    if a_astar < 1.0 {
        return Err(DomainError::AreaRatioBelowUnity(a_astar).into());
    }
    if a_astar == 1.0 {
        return Ok(1.0);
    }

    let residual = |m: f64| Ok(area_ratio(m, gam) - a_astar);
    match regime {
        FlowRegime::Subsonic => find_root(residual, 0.0, 1.0, tol),
        FlowRegime::Supersonic => find_root(residual, 1.0, MAX_MACH, tol),
    }
}
