//! Error types for the flow solvers.
//!
//! Domain violations are detected before any expensive computation and are
//! never silently clamped. Solver failures (root finding, ODE integration)
//! propagate to the immediate caller; nothing in this crate retries or
//! recovers internally.

use thiserror::Error;

/// Invalid physical input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Mach number must be supersonic (got {0})")]
    SubsonicMach(f64),

    #[error("Mach number must be subsonic (got {0})")]
    SupersonicMach(f64),

    #[error("specific heat ratio must be greater than 1 (got {0})")]
    InvalidGamma(f64),

    #[error("shock angle {shock_angle} rad is below the Mach wave angle {mach_angle} rad")]
    ShockBelowMachWave { shock_angle: f64, mach_angle: f64 },

    #[error("shock angle {0} rad is greater than 90 degrees")]
    ShockAboveNormal(f64),

    #[error("incline angle indicates a detached shock")]
    DetachedShock,

    #[error("cone half-angle indicates a detached shock")]
    DetachedConeShock,

    #[error("area ratio A/A* must be at least 1 (got {0})")]
    AreaRatioBelowUnity(f64),

    #[error("downstream Mach number {m2} exceeds upstream Mach number {m1}")]
    DownstreamAboveUpstream { m1: f64, m2: f64 },
}

/// Failure of the bracketed 1-D root solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootError {
    #[error("root is not bracketed: f({lo}) = {f_lo}, f({hi}) = {f_hi}")]
    NotBracketed {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("no convergence after {0} iterations")]
    MaxIterationsExceeded(usize),
}

/// Failure of the adaptive ODE integrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("sample budget of {0} exhausted before the stopping condition was met")]
    SampleBudgetExceeded(usize),

    #[error("step size underflow at x = {0}")]
    StepSizeUnderflow(f64),

    #[error("state became non-finite at x = {0}")]
    NonFiniteState(f64),
}

/// Any failure a flow solve can produce.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Root(#[from] RootError),

    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

pub type FlowResult<T> = Result<T, FlowError>;
