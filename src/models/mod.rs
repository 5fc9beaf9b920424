//! Domain model types for the k-similar two-instance TSP.
//!
//! Provides integer points, vertices carrying coordinates in both
//! instances, the problem input, a symmetric edge map keyed by unordered
//! vertex pairs, and tour/solution types derived from solver assignments.

mod edge_map;
mod instance;
mod point;
mod solution;
mod tour;

pub use edge_map::{canonical, pair_count, pairs, EdgeMap};
pub use instance::Instance;
pub use point::{DualPoint, Point, Side};
pub use solution::DualTourSolution;
pub use tour::Tour;
