//! Subsonic compressibility corrections and the critical Mach number.

use crate::error::{DomainError, FlowResult};
use crate::root_finding::find_root;

/// Cp0 above which the critical-Mach solve is skipped: the Karman-Tsien
/// curve no longer crosses the critical-Cp curve below Mach 0.86, so the
/// fixed maximum is returned directly.
const CP0_THRESHOLD: f64 = -0.132743943;

/// Largest critical Mach number reported.
const MCR_MAX: f64 = 0.86;

fn require_subsonic(m: f64) -> Result<(), DomainError> {
    if m >= 1.0 {
        Err(DomainError::SupersonicMach(m))
    } else {
        Ok(())
    }
}

/// Prandtl-Glauert correction of an incompressible 2-D coefficient to a
/// subsonic Mach number. The Karman-Tsien correction is generally more
/// accurate; this form is kept for reference comparisons.
pub fn prandtl_glauert(coef0: f64, m: f64) -> Result<f64, DomainError> {
    require_subsonic(m)?;
    Ok(coef0 / (1.0 - m * m).sqrt())
}

/// Karman-Tsien correction of an incompressible 2-D coefficient (pressure,
/// lift, drag) to a subsonic Mach number.
pub fn karman_tsien(coef0: f64, m: f64) -> Result<f64, DomainError> {
    require_subsonic(m)?;
    let m_sq = m * m;
    let beta = (1.0 - m_sq).sqrt();
    Ok(coef0 / (beta + 0.5 * coef0 * m_sq / (1.0 + beta)))
}

/// Critical Mach number for a given incompressible minimum pressure
/// coefficient: the free-stream Mach number at which the local flow first
/// becomes sonic.
///
/// Found where the Karman-Tsien-corrected Cp crosses the critical-Cp curve.
/// For `cp0_min` above the fixed threshold the crossing lies beyond Mach
/// 0.86 and that maximum is returned directly.
pub fn critical_mach(cp0_min: f64, gam: f64, tol: f64) -> FlowResult<f64> {
    if cp0_min > CP0_THRESHOLD {
        return Ok(MCR_MAX);
    }

    find_root(
        |m| {
            let cp = karman_tsien(cp0_min, m)?;

            // Critical pressure coefficient at this Mach number.
            let gam_m1 = gam - 1.0;
            let m_sq = m * m;
            let tt_t = 1.0 + 0.5 * gam_m1 * m_sq;
            let term = (tt_t / (1.0 + 0.5 * gam_m1)).powf(gam / gam_m1) - 1.0;
            let cp_crit = 2.0 / (gam * m_sq) * term;

            Ok(cp_crit - cp)
        },
        0.1,
        MCR_MAX,
        tol,
    )
}
