//! Solver context for binary integer programs with lazy constraints.
//!
//! - [`SolverConfig`] — Per-session settings (verbosity, lazy cuts, time limit)
//! - [`MilpModel`] — Variables, constraints, objective, `optimize`, results
//! - [`LinearExpr`] / [`LinearConstraint`] — Sparse linear rows
//! - [`CutSupplier`] — Callback interface producing lazy cuts per candidate
//! - [`CompositeSupplier`] — Concatenates several suppliers

mod config;
mod expr;
mod model;
mod supplier;

pub use config::{SolverConfig, DEFAULT_TIME_LIMIT_SECS};
pub use expr::{LinearConstraint, LinearExpr, Relation, Sense, VarId};
pub use model::{MilpModel, SolveStatus};
pub use supplier::{Assignment, CompositeSupplier, CutSupplier, NoCuts};
