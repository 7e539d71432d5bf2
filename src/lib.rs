//! # Shockflow
//!
//! Compressible-flow aerodynamic analysis: closed-form isentropic,
//! normal-shock and oblique-shock relations, and a numerically integrated
//! conical (Taylor-Maccoll) shock solver, built on a bracketed 1-D root
//! finder and an adaptive Runge-Kutta integrator.
//!
//! All angles are in radians and all inputs are dimensionless; callers at
//! the boundary own any degree or unit conversion.

// Re-export the main types
pub use conical_shock::{ConicalShockSolver, ShockSolution};
pub use error::{DomainError, FlowError, FlowResult, IntegrationError, RootError};
pub use isentropic::FlowRegime;
pub use shock::ShockBranch;

// Module declarations
pub mod compressibility;
pub mod conical_shock;
pub mod constants;
pub mod error;
pub mod isentropic;
pub mod root_finding;
pub mod runge_kutta;
pub mod shock;
pub mod skin_friction;
