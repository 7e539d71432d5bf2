//! Normal- and oblique-shock relations for a calorically perfect gas.
//!
//! Closed-form jump conditions plus the root-solved inversions of the
//! theta-beta-Mach relation and the Prandtl-Meyer function. Everything here
//! is a pure function of its arguments and safe for unrestricted concurrent
//! use; the inversions capture their parameters in closures passed to the
//! bracketed root solver.

use std::f64::consts::FRAC_PI_2;

use crate::constants::MAX_MACH;
use crate::error::{DomainError, FlowResult};
use crate::root_finding::find_root;

/// Which of the two mathematically valid oblique-shock solutions to return.
/// Weak is the physically dominant branch in most external flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShockBranch {
    Weak,
    Strong,
}

fn require_supersonic(m: f64) -> Result<(), DomainError> {
    if m < 1.0 {
        Err(DomainError::SubsonicMach(m))
    } else {
        Ok(())
    }
}

/// Angle of a Mach wave with respect to the direction of motion.
pub fn mach_angle(m: f64) -> Result<f64, DomainError> {
    require_supersonic(m)?;
    Ok((1.0 / m).asin())
}

/// Mach number downstream of a normal shock.
pub fn normal_shock_mach(m1: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    let m1_sq = m1 * m1;
    let gm1o2 = 0.5 * (gam - 1.0);
    Ok(((1.0 + gm1o2 * m1_sq) / (gam * m1_sq - gm1o2)).sqrt())
}

/// Density ratio rho2/rho1 across a normal shock.
pub fn normal_shock_density_ratio(m1: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    let m1_sq = m1 * m1;
    Ok((gam + 1.0) * m1_sq / (2.0 + (gam - 1.0) * m1_sq))
}

/// Static pressure ratio p2/p1 across a normal shock.
pub fn normal_shock_pressure_ratio(m1: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    Ok(1.0 + 2.0 * gam / (gam + 1.0) * (m1 * m1 - 1.0))
}

/// Static temperature ratio T2/T1 across a normal shock.
pub fn normal_shock_temperature_ratio(m1: f64, gam: f64) -> Result<f64, DomainError> {
    Ok(normal_shock_pressure_ratio(m1, gam)? / normal_shock_density_ratio(m1, gam)?)
}

/// Total pressure ratio PT2/PT1 across a normal shock.
pub fn normal_shock_stagnation_pressure_ratio(m1: f64, gam: f64) -> Result<f64, DomainError> {
    let m2 = normal_shock_mach(m1, gam)?;
    total_pressure_ratio_across(m1, m2, gam)
}

/// Total pressure ratio PT2/PT1 across a normal shock when the downstream
/// Mach number is already known.
pub fn total_pressure_ratio_across(m1: f64, m2: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    if m2 > m1 {
        return Err(DomainError::DownstreamAboveUpstream { m1, m2 });
    }
    let gam_m1 = gam - 1.0;
    let tt_t1 = 1.0 + 0.5 * gam_m1 * m1 * m1;
    let tt_t2 = 1.0 + 0.5 * gam_m1 * m2 * m2;
    let p2_p1 = 1.0 + 2.0 * gam / (gam + 1.0) * (m1 * m1 - 1.0);
    Ok(p2_p1 * (tt_t2 / tt_t1).powf(gam / gam_m1))
}

/// Rayleigh pitot ratio PT2/P1: total pressure behind a normal shock over
/// static pressure ahead of it, which is what a supersonic pitot tube
/// measures.
pub fn normal_shock_pitot_ratio(m1: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    let m_sq = m1 * m1;
    let gam_p1 = gam + 1.0;
    let gam_m1 = gam - 1.0;
    let term1 = (2.0 * gam * m_sq - gam_m1) / gam_p1;
    let term2 = gam_p1 * gam_p1 * m_sq / (4.0 * gam * m_sq - 2.0 * gam_m1);
    Ok(term1 * term2.powf(gam / gam_m1))
}

/// Maximum pressure coefficient behind a normal shock: the stagnation-point
/// pressure limit on a configuration in supersonic flight.
pub fn normal_shock_cp_max(m1: f64, gam: f64) -> Result<f64, DomainError> {
    let pt2_p1 = normal_shock_pitot_ratio(m1, gam)?;
    Ok(2.0 / (gam * m1 * m1) * (pt2_p1 - 1.0))
}

/// Component of the upstream Mach number normal to an oblique shock; this
/// component sets the strength of the shock.
pub fn oblique_normal_mach(m1: f64, beta: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    Ok(m1 * beta.sin())
}

/// Mach number downstream of an oblique shock, from the downstream normal
/// component, the shock angle and the incline angle.
pub fn oblique_downstream_mach(mn2: f64, beta: f64, theta: f64) -> f64 {
    mn2 / (beta - theta).sin()
}

// Theta-beta-Mach relation solved for theta; callers have validated m1.
fn theta_from_beta(m1: f64, beta: f64, gam: f64) -> f64 {
    let sin_b = beta.sin();
    let m_sq = m1 * m1;
    let numerator = m_sq * sin_b * sin_b - 1.0;
    let denominator = m_sq * (gam + (2.0 * beta).cos()) + 2.0;
    (2.0 / beta.tan() * numerator / denominator).atan()
}

/// Incline (flow deflection) angle theta produced by an oblique shock of
/// angle `beta` at upstream Mach `m1`.
pub fn oblique_theta(m1: f64, beta: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    Ok(theta_from_beta(m1, beta, gam))
}

// Slope dtheta/dM1 of the theta-beta-Mach relation at fixed beta.
fn dtheta_dmach(m1: f64, beta: f64, gam: f64) -> f64 {
    let sin_b = beta.sin();
    let sin_b2 = sin_b * sin_b;
    let m_sq = m1 * m1;
    let gam_pc2b = gam + (2.0 * beta).cos();
    let aa = m_sq * gam_pc2b + 2.0;
    let bb = m_sq * sin_b2 - 1.0;
    let numerator = sin_b2 - bb / aa * gam_pc2b;
    let denominator = aa * beta.tan() + 4.0 / aa * bb * bb;
    4.0 * m1 * numerator / denominator
}

/// Critical oblique shock angle dividing strong from weak solutions, from
/// the maximum-deflection condition.
pub fn oblique_beta_critical(m1: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m1)?;
    let gam_p1 = gam + 1.0;
    let m_sq = m1 * m1;
    let term = m_sq * gam_p1 - 4.0
        + (gam_p1 * (m_sq * m_sq * gam_p1 + 8.0 * m_sq * (gam - 1.0) + 16.0)).sqrt();
    Ok(((term / gam).sqrt() / (2.0 * m1)).asin())
}

/// Maximum incline angle for an attached oblique shock at upstream Mach
/// `m1`; larger inclines produce a detached bow shock.
pub fn oblique_max_theta(m1: f64, gam: f64) -> Result<f64, DomainError> {
    let beta_crit = oblique_beta_critical(m1, gam)?;
    oblique_theta(m1, beta_crit, gam)
}

/// Oblique shock angle beta for incline angle `theta` at upstream Mach `m1`.
///
/// `theta` within `tol` of zero short-circuits to the Mach wave (weak) or
/// normal shock (strong); inclines beyond the maximum attached-shock angle
/// fail with a [`DomainError`].
pub fn oblique_beta(
    m1: f64,
    theta: f64,
    gam: f64,
    tol: f64,
    branch: ShockBranch,
) -> FlowResult<f64> {
    require_supersonic(m1)?;

    if theta.abs() <= tol {
        return Ok(match branch {
            ShockBranch::Weak => mach_angle(m1)?,
            ShockBranch::Strong => FRAC_PI_2,
        });
    }

    let beta_crit = oblique_beta_critical(m1, gam)?;
    let theta_max = theta_from_beta(m1, beta_crit, gam);
    if theta > theta_max {
        return Err(DomainError::DetachedShock.into());
    }
    if theta >= theta_max - tol {
        return Ok(beta_crit);
    }

    let residual = |beta: f64| Ok(theta_from_beta(m1, beta, gam) - theta);
    match branch {
        ShockBranch::Weak => find_root(residual, mach_angle(m1)?, beta_crit, tol),
        ShockBranch::Strong => find_root(residual, beta_crit, FRAC_PI_2, tol),
    }
}

/// Upstream Mach number for an oblique shock of angle `beta` producing
/// incline angle `theta`.
///
/// The Mach-wave case is detected with a theta tolerance derived from the
/// local slope dtheta/dM near the Mach-wave Mach number, so that a small but
/// genuine deflection is not misread as theta = 0.
pub fn oblique_mach(theta: f64, beta: f64, gam: f64, tol: f64) -> FlowResult<f64> {
    // Mach number at which this shock angle degenerates to a Mach wave.
    let m_mu = 1.0 / beta.sin();

    let theta_tol = tol * dtheta_dmach(m_mu, beta, gam);
    if theta.abs() <= theta_tol {
        return Ok(m_mu);
    }

    let theta_max = theta_from_beta(MAX_MACH, beta, gam);
    if theta > theta_max {
        return Err(DomainError::DetachedShock.into());
    }

    find_root(
        |m| Ok(theta_from_beta(m, beta, gam) - theta),
        m_mu,
        MAX_MACH,
        tol,
    )
}

// Prandtl-Meyer function; callers have validated m >= 1.
fn prandtl_meyer_unchecked(m: f64, gam: f64) -> f64 {
    let gam_r = (gam + 1.0) / (gam - 1.0);
    let m_sq_m1 = m * m - 1.0;
    gam_r.sqrt() * (m_sq_m1 / gam_r).sqrt().atan() - m_sq_m1.sqrt().atan()
}

/// Prandtl-Meyer function nu(M) in radians.
pub fn prandtl_meyer(m: f64, gam: f64) -> Result<f64, DomainError> {
    require_supersonic(m)?;
    Ok(prandtl_meyer_unchecked(m, gam))
}

/// Mach number corresponding to a Prandtl-Meyer function value `nu`.
pub fn prandtl_meyer_mach(nu: f64, gam: f64, tol: f64) -> FlowResult<f64> {
    find_root(
        |m| Ok(prandtl_meyer_unchecked(m, gam) - nu),
        1.0,
        MAX_MACH,
        tol,
    )
}
