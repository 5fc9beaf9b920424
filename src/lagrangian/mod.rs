//! Lagrangian relaxation of the shared-edge coupling.
//!
//! - [`SubgradientConfig`] — Step multiplier, initial multipliers, cap, tolerance
//! - [`SubgradientSolver`] — Lazy iterator over [`SubgradientStep`]s
//! - [`SubgradientOutcome`] — Bounds and history of a finished run

mod config;
mod subgradient;

pub use config::SubgradientConfig;
pub use subgradient::{SubgradientOutcome, SubgradientSolver, SubgradientState, SubgradientStep};
