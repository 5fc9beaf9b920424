//! Dual-tour solution type.

use serde::{Deserialize, Serialize};

use super::{Instance, Side, Tour};

/// Two tours over the same vertex set, one per instance.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::{DualTourSolution, Instance, Side, Tour};
///
/// let instance = Instance::parse("0 0 0 0\n1 0 2 0\n1 1 2 2\n0 1 0 2\n").unwrap();
/// let tour = Tour::new(vec![0, 1, 2, 3]);
/// let sol = DualTourSolution::new(&instance, tour.clone(), tour);
/// assert_eq!(sol.cost(Side::First), 4.0);
/// assert_eq!(sol.cost(Side::Second), 8.0);
/// assert_eq!(sol.total_cost(), 12.0);
/// assert_eq!(sol.shared_edges(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualTourSolution {
    tours: [Tour; 2],
    costs: [f64; 2],
    shared_edges: usize,
}

impl DualTourSolution {
    /// Evaluates both tours against their instances.
    pub fn new(instance: &Instance, first: Tour, second: Tour) -> Self {
        let costs = [
            first.cost(&instance.distance_matrix(Side::First)),
            second.cost(&instance.distance_matrix(Side::Second)),
        ];
        let shared_edges = first.shared_edges(&second);
        Self {
            tours: [first, second],
            costs,
            shared_edges,
        }
    }

    /// Tour in the given instance.
    pub fn tour(&self, side: Side) -> &Tour {
        &self.tours[side.index()]
    }

    /// Length of the tour in the given instance.
    pub fn cost(&self, side: Side) -> f64 {
        self.costs[side.index()]
    }

    /// Sum of both tour lengths.
    pub fn total_cost(&self) -> f64 {
        self.costs.iter().sum()
    }

    /// Number of edges used by both tours.
    pub fn shared_edges(&self) -> usize {
        self.shared_edges
    }
}
