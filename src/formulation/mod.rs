//! Integer programming formulations.
//!
//! - [`CycleFormulation`] — One Hamiltonian cycle: edge variables, degree
//!   rows, lazy subtour elimination
//! - [`TspModel`] — A single-cycle TSP with its own solver context
//! - [`DualCycleFormulation`] — Two cycles coupled by shared-edge
//!   indicators and a [`Similarity`] row

mod cycle;
mod dual;

pub use cycle::{CycleFormulation, TspModel, TspSolution};
pub use dual::{DualCycleFormulation, Multipliers, Similarity, SimilaritySense};
