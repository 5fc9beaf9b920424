//! # u-kstsp
//!
//! Exact and Lagrangian solvers for the k-similar two-instance TSP: two
//! Hamiltonian cycles over the same vertices, each measured in its own
//! instance, minimizing total length while sharing a required number of
//! edges.
//!
//! ## Modules
//!
//! - [`models`] — Points, two-instance input, symmetric edge map, tours
//! - [`distance`] — Rounded-up Euclidean distance matrix
//! - [`subtour`] — Connected components of selected edges, subtour detection
//! - [`milp`] — Binary integer program with lazy constraint generation
//! - [`formulation`] — Single-cycle TSP and dual-cycle k-similar models
//! - [`lagrangian`] — Subgradient optimization of the relaxed coupling
//! - [`error`] — Error and result types

pub mod distance;
pub mod error;
pub mod formulation;
pub mod lagrangian;
pub mod milp;
pub mod models;
pub mod subtour;

pub use error::{Error, Result};
