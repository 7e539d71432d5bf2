//! Shared constants for the flow solvers.

/// Specific heat ratio of air.
pub const DEFAULT_GAMMA: f64 = 1.4;

/// Upper bracket for every inverse-Mach root solve. Flow relations flatten
/// out well below this, so it acts as "hypersonic infinity".
pub const MAX_MACH: f64 = 100.0;
