//! Supersonic flow past a semi-infinite cone.
//!
//! Numerically integrates the Taylor-Maccoll equation as described in
//! Anderson, "Modern Compressible Flow With Historical Perspective",
//! McGraw-Hill, 1990, pg. 301: an oblique-shock jump sets the state just
//! behind the shock, the two-state similarity ODE is marched from the shock
//! angle toward the axis, and the cone surface is located where the
//! tangential velocity component vanishes.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;
use serde::Serialize;
use tracing::debug;

use crate::constants::{DEFAULT_GAMMA, MAX_MACH};
use crate::error::{DomainError, FlowResult};
use crate::isentropic;
use crate::root_finding::find_root;
use crate::runge_kutta::{self, IntegrationTrace};
use crate::shock::{self, ShockBranch};

/// Tolerance used by the internal solvers and the cache match.
const TOL: f64 = 1e-9;

/// Magnitude of the initial ODE step, radians.
const STEP_SIZE: f64 = 1e-6;

/// Accepted-sample budget for one integration. The stopping condition is the
/// intended terminator; this only bounds runaway integrations.
const MAX_SAMPLES: usize = 1000;

/// Result bundle of one forward conical-shock solve.
///
/// Invariant: `0 <= theta_cone < theta_shock` and `surface_mach >= 1`,
/// except in the Mach-wave limit where `surface_mach` equals the free-stream
/// Mach number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShockSolution {
    /// Cone half-angle, radians.
    pub theta_cone: f64,
    /// Mach number on the cone surface.
    pub surface_mach: f64,
    /// Total pressure ratio across the oblique shock (PTc/PT0).
    pub pt_ratio: f64,
}

#[derive(Debug, Clone, Copy)]
struct CachedSolution {
    m1: f64,
    theta_shock: f64,
    solution: ShockSolution,
}

/// Taylor-Maccoll shooting solver for a semi-infinite cone in supersonic
/// flow.
///
/// Each instance owns a one-entry cache of the last `(M1, shock angle)`
/// forward solve, so the derived-ratio accessors and repeated calls with the
/// same inputs skip the ODE integration. The cache makes instances not
/// thread-safe; use one solver per thread or wrap in external mutual
/// exclusion.
#[derive(Debug, Clone)]
pub struct ConicalShockSolver {
    gamma: f64,
    cache: Option<CachedSolution>,
}

impl Default for ConicalShockSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConicalShockSolver {
    /// Solver for air (gamma = 1.4).
    pub fn new() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            cache: None,
        }
    }

    /// Solver for a gas with the given specific heat ratio.
    pub fn with_gamma(gamma: f64) -> Result<Self, DomainError> {
        if gamma <= 1.0 {
            return Err(DomainError::InvalidGamma(gamma));
        }
        Ok(Self { gamma, cache: None })
    }

    /// Specific heat ratio of the gas being analyzed.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Change the specific heat ratio, invalidating any cached solution.
    pub fn set_gamma(&mut self, gamma: f64) -> Result<(), DomainError> {
        if gamma <= 1.0 {
            return Err(DomainError::InvalidGamma(gamma));
        }
        if (self.gamma - gamma).abs() > f64::EPSILON {
            self.cache = None;
        }
        self.gamma = gamma;
        Ok(())
    }

    /// Cone half-angle producing an attached conical shock of angle
    /// `theta_shock` at upstream Mach `m1`.
    pub fn cone_angle(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        Ok(self.solve(m1, theta_shock)?.theta_cone)
    }

    /// Mach number on the cone surface.
    pub fn cone_mach(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        Ok(self.solve(m1, theta_shock)?.surface_mach)
    }

    /// Ratio of total to static temperature (TTc/Tc) on the cone surface.
    pub fn cone_tt_t(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        Ok(isentropic::stagnation_temperature_ratio(
            sol.surface_mach,
            self.gamma,
        ))
    }

    /// Static temperature on the cone surface over the free-stream static
    /// temperature (Tc/T0).
    pub fn cone_t_t0(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        // Total temperature is constant across the shock and cancels.
        Ok(isentropic::stagnation_temperature_ratio(m1, self.gamma)
            / isentropic::stagnation_temperature_ratio(sol.surface_mach, self.gamma))
    }

    /// Ratio of total to static pressure (PTc/Pc) on the cone surface.
    pub fn cone_pt_p(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        Ok(isentropic::stagnation_pressure_ratio(
            sol.surface_mach,
            self.gamma,
        ))
    }

    /// Static pressure on the cone surface over the free-stream static
    /// pressure (Pc/P0).
    pub fn cone_p_p0(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        // Total pressure is not constant across the shock; the solve carries
        // the loss as pt_ratio.
        Ok(isentropic::stagnation_pressure_ratio(m1, self.gamma) * sol.pt_ratio
            / isentropic::stagnation_pressure_ratio(sol.surface_mach, self.gamma))
    }

    /// Ratio of total to static density (rhoTc/rhoc) on the cone surface.
    pub fn cone_rhot_rho(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        Ok(isentropic::stagnation_density_ratio(
            sol.surface_mach,
            self.gamma,
        ))
    }

    /// Static density on the cone surface over the free-stream static
    /// density (rhoc/rho0).
    pub fn cone_rho_rho0(&mut self, m1: f64, theta_shock: f64) -> FlowResult<f64> {
        let sol = self.solve(m1, theta_shock)?;
        // Total density is constant across the shock and cancels.
        Ok(isentropic::stagnation_density_ratio(m1, self.gamma)
            / isentropic::stagnation_density_ratio(sol.surface_mach, self.gamma))
    }

    /// Full solution bundle for upstream Mach `m1` and shock angle
    /// `theta_shock` (radians, Mach wave angle to pi/2 inclusive).
    pub fn solve(&mut self, m1: f64, theta_shock: f64) -> FlowResult<ShockSolution> {
        if let Some(cached) = self.cache {
            if (cached.m1 - m1).abs() < TOL && (cached.theta_shock - theta_shock).abs() < TOL {
                return Ok(cached.solution);
            }
        }

        if m1 < 1.0 {
            return Err(DomainError::SubsonicMach(m1).into());
        }
        if theta_shock - TOL > FRAC_PI_2 {
            return Err(DomainError::ShockAboveNormal(theta_shock).into());
        }
        let mu = shock::mach_angle(m1)?;
        if theta_shock + TOL < mu {
            return Err(DomainError::ShockBelowMachWave {
                shock_angle: theta_shock,
                mach_angle: mu,
            }
            .into());
        }

        // Normal shock: the cone has degenerated to a flat face.
        if (theta_shock - FRAC_PI_2).abs() < TOL {
            let mc = shock::normal_shock_mach(m1, self.gamma)?;
            let pt_ratio = shock::total_pressure_ratio_across(m1, mc, self.gamma)?;
            debug!(m1, "normal shock limit");
            return Ok(self.store(
                m1,
                theta_shock,
                ShockSolution {
                    theta_cone: 0.0,
                    surface_mach: mc,
                    pt_ratio,
                },
            ));
        }
        // Mach wave: an infinitely weak shock deflecting the flow nowhere.
        if (theta_shock - mu).abs() < TOL {
            debug!(m1, "Mach wave limit");
            return Ok(self.store(
                m1,
                theta_shock,
                ShockSolution {
                    theta_cone: 0.0,
                    surface_mach: m1,
                    pt_ratio: 1.0,
                },
            ));
        }

        // Oblique-shock jump via the normal-component decomposition.
        let gam = self.gamma;
        let delta = shock::oblique_theta(m1, theta_shock, gam)?;
        let mn1 = shock::oblique_normal_mach(m1, theta_shock)?;
        let mn2 = shock::normal_shock_mach(mn1, gam)?;
        let m2 = shock::oblique_downstream_mach(mn2, theta_shock, delta);
        let pt_ratio = shock::total_pressure_ratio_across(mn1, mn2, gam)?;

        // Non-dimensional velocity just behind the shock, split into radial
        // and tangential components.
        let v2 = 1.0 / (1.0 + 2.0 / ((gam - 1.0) * m2 * m2)).sqrt();
        let y0 = Vector2::new(
            v2 * (theta_shock - delta).cos(),
            -v2 * (theta_shock - delta).sin(),
        );

        // March the Taylor-Maccoll equation from the shock toward the axis.
        // The cone surface is where the tangential component vanishes.
        let trace = runge_kutta::integrate(
            theta_shock,
            y0,
            |theta, y| taylor_maccoll(theta, y, gam),
            TOL / 10.0,
            -STEP_SIZE,
            STEP_SIZE / 1000.0,
            |theta, y: &Vector2<f64>, _| y[1] >= 0.0 || theta <= 0.0,
            MAX_SAMPLES,
        )?;
        debug!(
            m1,
            theta_shock,
            samples = trace.samples.len(),
            "Taylor-Maccoll integration complete"
        );

        let (theta_cone, vr) = surface_crossing(&trace);
        let vr_sq = vr * vr;
        let surface_mach = (2.0 * vr_sq / ((gam - 1.0) * (1.0 - vr_sq))).sqrt();

        Ok(self.store(
            m1,
            theta_shock,
            ShockSolution {
                theta_cone,
                surface_mach,
                pt_ratio,
            },
        ))
    }

    /// Shock angle producing cone half-angle `theta_cone` at upstream Mach
    /// `m1`, on the requested solution branch.
    pub fn shock_angle(
        &mut self,
        m1: f64,
        theta_cone: f64,
        branch: ShockBranch,
    ) -> FlowResult<f64> {
        if m1 < 1.0 {
            return Err(DomainError::SubsonicMach(m1).into());
        }

        // A vanishing cone reduces to a Mach wave or a normal shock.
        if theta_cone.abs() <= TOL / 10.0 {
            return match branch {
                ShockBranch::Weak => {
                    let mu = shock::mach_angle(m1)?;
                    self.store(
                        m1,
                        mu,
                        ShockSolution {
                            theta_cone: 0.0,
                            surface_mach: m1,
                            pt_ratio: 1.0,
                        },
                    );
                    Ok(mu)
                }
                ShockBranch::Strong => {
                    let mc = shock::normal_shock_mach(m1, self.gamma)?;
                    let pt_ratio = shock::total_pressure_ratio_across(m1, mc, self.gamma)?;
                    self.store(
                        m1,
                        FRAC_PI_2,
                        ShockSolution {
                            theta_cone: 0.0,
                            surface_mach: mc,
                            pt_ratio,
                        },
                    );
                    Ok(FRAC_PI_2)
                }
            };
        }

        let theta_s_crit = critical_shock_angle(m1);
        let (lo, hi) = match branch {
            ShockBranch::Weak => (shock::mach_angle(m1)?, theta_s_crit),
            ShockBranch::Strong => (theta_s_crit, FRAC_PI_2),
        };
        find_root(
            |theta_s| Ok(self.solve(m1, theta_s)?.theta_cone - theta_cone),
            lo,
            hi,
            TOL,
        )
    }

    /// Upstream Mach number producing the given cone half-angle and shock
    /// angle.
    pub fn free_stream_mach(&mut self, theta_cone: f64, theta_shock: f64) -> FlowResult<f64> {
        // A vanishing cone means the shock is a Mach wave of this angle.
        if theta_cone.abs() <= TOL / 10.0 {
            let m1 = 1.0 / theta_shock.sin();
            self.store(
                m1,
                theta_shock,
                ShockSolution {
                    theta_cone: 0.0,
                    surface_mach: m1,
                    pt_ratio: 1.0,
                },
            );
            return Ok(m1);
        }

        // No Mach number up to the cap can support a larger cone angle at
        // this shock angle.
        let theta_max = self.cone_angle(MAX_MACH, theta_shock)?;
        if theta_cone > theta_max {
            return Err(DomainError::DetachedConeShock.into());
        }

        find_root(
            |m| Ok(self.solve(m, theta_shock)?.theta_cone - theta_cone),
            1.0 / theta_shock.sin(),
            MAX_MACH,
            TOL,
        )
    }

    fn store(&mut self, m1: f64, theta_shock: f64, solution: ShockSolution) -> ShockSolution {
        self.cache = Some(CachedSolution {
            m1,
            theta_shock,
            solution,
        });
        solution
    }
}

/// Right-hand side of the Taylor-Maccoll equation as a two-state system in
/// the similarity variable theta, with y = (Vr', Vtheta').
fn taylor_maccoll(theta: f64, y: &Vector2<f64>, gam: f64) -> Vector2<f64> {
    let vr = y[0];
    let vt = y[1];
    let gm1o2 = 0.5 * (gam - 1.0);
    let vt_sq = vt * vt;
    let term = 1.0 - vr * vr - vt_sq;
    let g1 = vr * vt_sq - gm1o2 * (2.0 * vr + vt / theta.tan()) * term;
    let g2 = gm1o2 * term - vt_sq;
    Vector2::new(vt, g1 / g2)
}

/// Locate the sample pair straddling Vtheta' = 0 and linearly interpolate
/// the cone angle and the radial velocity component there.
fn surface_crossing(trace: &IntegrationTrace<2>) -> (f64, f64) {
    let samples = &trace.samples;
    let mut j = 1;
    while j < samples.len() - 1 && samples[j].1[1] < 0.0 {
        j += 1;
    }

    let (x1, y1) = samples[j - 1];
    let (x2, y2) = samples[j];
    let frac = -y1[1] / (y2[1] - y1[1]);
    let theta_cone = x1 + frac * (x2 - x1);
    let vr = y1[0] + frac * (y2[0] - y1[0]);
    (theta_cone, vr)
}

/// Critical shock angle dividing strong from weak conical solutions: a
/// two-piece polynomial fit to critical angles found by sweeping
/// `cone_angle` over Mach number and shock angle.
fn critical_shock_angle(m1: f64) -> f64 {
    let deg = if m1 <= 1.5 {
        47.984 * m1 * m1 - 145.41 * m1 + 178.86
    } else {
        -0.4583 * m1 * m1 + 4.1509 * m1 + 63.222
    };
    deg.to_radians()
}
