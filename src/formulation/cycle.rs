//! Single Hamiltonian cycle formulation.
//!
//! # Model
//!
//! One binary `x[u][v]` per unordered vertex pair, costed by the edge
//! length, and one degree row per vertex:
//!
//! ```text
//! sum(x[u][v] for v != u) == 2     for every vertex u
//! ```
//!
//! Degree rows alone admit unions of disjoint cycles. Those are removed
//! lazily: on every integer candidate the formulation acts as a
//! [`CutSupplier`] and returns the subtour elimination constraint of the
//! smallest subtour, if any.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::milp::{
    Assignment, CutSupplier, LinearConstraint, LinearExpr, MilpModel, SolverConfig, VarId,
};
use crate::models::{EdgeMap, Tour};
use crate::subtour;

/// Edge variables and degree rows of one Hamiltonian cycle inside a model.
#[derive(Debug, Clone)]
pub struct CycleFormulation {
    edges: EdgeMap<VarId>,
    costs: EdgeMap<f64>,
}

impl CycleFormulation {
    /// Registers the cycle's variables and degree rows in `model`.
    ///
    /// `cost(u, v)` is called once per unordered pair with `u < v`.
    /// Returns an error for fewer than three vertices.
    pub fn build<F>(model: &mut MilpModel, size: usize, cost: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if size < 3 {
            return Err(Error::invalid_input(format!(
                "a Hamiltonian cycle needs at least 3 vertices, got {size}"
            )));
        }

        let costs = EdgeMap::from_fn(size, cost);
        let edges = costs.map(|_, &c| model.add_binary(c));

        for u in 0..size {
            let incident = (0..size).filter(|&v| v != u).map(|v| *edges.get(u, v));
            model.add_constraint(LinearExpr::sum(incident).equals(2.0));
        }

        Ok(Self { edges, costs })
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.edges.size()
    }

    /// Variable of the edge between `u` and `v`, in either orientation.
    pub fn edge(&self, u: usize, v: usize) -> VarId {
        *self.edges.get(u, v)
    }

    /// All edge variables.
    pub fn edges(&self) -> &EdgeMap<VarId> {
        &self.edges
    }

    /// Cost of the edge between `u` and `v`.
    pub fn cost(&self, u: usize, v: usize) -> f64 {
        *self.costs.get(u, v)
    }

    /// `sum(cost * x)` over all edges.
    pub fn objective(&self) -> LinearExpr {
        self.weighted_objective(|u, v| self.cost(u, v))
    }

    /// `sum(weight(u, v) * x[u][v])` over all edges.
    pub fn weighted_objective<F>(&self, weight: F) -> LinearExpr
    where
        F: Fn(usize, usize) -> f64,
    {
        self.edges
            .iter()
            .map(|((u, v), &var)| (var, weight(u, v)))
            .collect()
    }

    /// Edges selected by an assignment.
    pub fn selected_edges(&self, assignment: &Assignment) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter(|(_, &var)| assignment.is_selected(var))
            .map(|(uv, _)| uv)
            .collect()
    }

    /// Smallest subtour of the assignment, or `None` if it is a single tour.
    pub fn detect_violated_subtour(&self, assignment: &Assignment) -> Option<Vec<usize>> {
        subtour::find_subtour(self.size(), &self.selected_edges(assignment))
    }

    /// `sum(x[u][v] for u < v in S) <= |S| - 1`.
    pub fn subtour_cut(&self, subtour: &[usize]) -> LinearConstraint {
        let mut vars = Vec::new();
        for (i, &u) in subtour.iter().enumerate() {
            for &v in &subtour[i + 1..] {
                vars.push(self.edge(u, v));
            }
        }
        LinearExpr::sum(vars).leq(subtour.len().saturating_sub(1) as f64)
    }

    /// Tour encoded by an assignment, if it is a Hamiltonian cycle.
    pub fn tour(&self, assignment: &Assignment) -> Option<Tour> {
        subtour::tour_from_edges(self.size(), &self.selected_edges(assignment))
    }
}

impl CutSupplier for CycleFormulation {
    fn on_integer_candidate(&self, candidate: &Assignment) -> Vec<LinearConstraint> {
        match self.detect_violated_subtour(candidate) {
            Some(subtour) => {
                log::trace!("subtour of {} vertices: {:?}", subtour.len(), subtour);
                vec![self.subtour_cut(&subtour)]
            }
            None => Vec::new(),
        }
    }
}

/// Result of a single-cycle solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TspSolution {
    /// Optimal tour length.
    pub cost: f64,
    /// Optimal tour.
    pub tour: Tour,
}

/// A standalone single-cycle TSP owning its own solver context.
///
/// # Examples
///
/// ```
/// use u_kstsp::distance::DistanceMatrix;
/// use u_kstsp::formulation::TspModel;
/// use u_kstsp::milp::SolverConfig;
/// use u_kstsp::models::Point;
///
/// let dm = DistanceMatrix::from_points(&[
///     Point::new(0, 0),
///     Point::new(1, 0),
///     Point::new(1, 1),
///     Point::new(0, 1),
/// ]);
/// let mut tsp = TspModel::from_matrix(&SolverConfig::new("TSP"), &dm).unwrap();
/// let solution = tsp.solve().unwrap();
/// assert_eq!(solution.cost, 4.0);
/// assert_eq!(solution.tour.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TspModel {
    model: MilpModel,
    cycle: CycleFormulation,
}

impl TspModel {
    /// Builds a TSP over `size` vertices with the given edge costs.
    pub fn build<F>(config: &SolverConfig, size: usize, cost: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut model = MilpModel::new(config.clone());
        let cycle = CycleFormulation::build(&mut model, size, cost)?;
        Ok(Self { model, cycle })
    }

    /// Builds a TSP from a distance matrix.
    pub fn from_matrix(config: &SolverConfig, distances: &DistanceMatrix) -> Result<Self> {
        Self::build(config, distances.size(), |u, v| distances.get(u, v))
    }

    /// Solves to optimality with lazy subtour elimination.
    pub fn solve(&mut self) -> Result<TspSolution> {
        let status = self.model.optimize(&self.cycle)?;
        let (Some(assignment), Some(cost)) =
            (self.model.assignment(), self.model.objective_value())
        else {
            return Err(Error::no_solution(self.model.name(), status));
        };
        let tour = self.cycle.tour(assignment).ok_or_else(|| {
            Error::solver(format!(
                "{}: accepted candidate is not a tour",
                self.model.name()
            ))
        })?;
        Ok(TspSolution { cost, tour })
    }

    /// The underlying solver context.
    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    /// The cycle formulation.
    pub fn cycle(&self) -> &CycleFormulation {
        &self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn assignment_for(
        cycle: &CycleFormulation,
        num_vars: usize,
        edges: &[(usize, usize)],
    ) -> Assignment {
        let mut values = vec![0.0; num_vars];
        for &(u, v) in edges {
            values[cycle.edge(u, v).index()] = 1.0;
        }
        Assignment::new(values)
    }

    #[test]
    fn test_build_registers_pairs_and_degrees() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        let cycle =
            CycleFormulation::build(&mut model, 5, |u, v| (u + v) as f64).expect("valid");
        assert_eq!(model.num_vars(), 10);
        assert_eq!(model.num_constraints(), 5);
        assert_eq!(cycle.edge(1, 3), cycle.edge(3, 1));
        assert_eq!(cycle.cost(3, 1), 4.0);
    }

    #[test]
    fn test_build_too_small() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        assert!(CycleFormulation::build(&mut model, 2, |_, _| 1.0).is_err());
    }

    #[test]
    fn test_two_and_three_cycle_cut() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        let cycle = CycleFormulation::build(&mut model, 5, |_, _| 1.0).expect("valid");
        let edges = [(0, 1), (2, 3), (3, 4), (2, 4)];
        let candidate = assignment_for(&cycle, model.num_vars(), &edges);

        assert_eq!(cycle.detect_violated_subtour(&candidate), Some(vec![0, 1]));
        let cuts = cycle.on_integer_candidate(&candidate);
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].rhs(), 1.0);
        assert_eq!(cuts[0].expr().terms(), &[(cycle.edge(0, 1), 1.0)]);
        assert!(!cuts[0].is_satisfied(|v| candidate.value(v), 1e-9));
    }

    #[test]
    fn test_hamiltonian_candidate_has_no_cut() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        let cycle = CycleFormulation::build(&mut model, 4, |_, _| 1.0).expect("valid");
        let edges = [(0, 1), (1, 2), (2, 3), (0, 3)];
        let candidate = assignment_for(&cycle, model.num_vars(), &edges);
        assert!(cycle.on_integer_candidate(&candidate).is_empty());
        let tour = cycle.tour(&candidate).expect("tour");
        assert_eq!(tour.vertices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_candidate_has_no_cut() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        let cycle = CycleFormulation::build(&mut model, 4, |_, _| 1.0).expect("valid");
        let candidate = Assignment::new(vec![0.0; model.num_vars()]);
        assert!(cycle.on_integer_candidate(&candidate).is_empty());
        assert!(cycle.tour(&candidate).is_none());
    }

    #[test]
    fn test_subtour_cut_covers_internal_pairs() {
        let mut model = MilpModel::new(SolverConfig::new("t"));
        let cycle = CycleFormulation::build(&mut model, 6, |_, _| 1.0).expect("valid");
        let cut = cycle.subtour_cut(&[4, 0, 2]);
        assert_eq!(cut.rhs(), 2.0);
        assert_eq!(cut.expr().terms().len(), 3);
    }

    #[test]
    fn test_solve_separated_clusters() {
        // Two far-apart triangles: the first candidate is two subtours.
        let points = [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(0, 1),
            Point::new(100, 0),
            Point::new(101, 0),
            Point::new(100, 1),
        ];
        let dm = DistanceMatrix::from_points(&points);
        let mut tsp = TspModel::from_matrix(&SolverConfig::new("clusters"), &dm).expect("valid");
        let solution = tsp.solve().expect("solve");

        assert_eq!(solution.tour.len(), 6);
        assert!((solution.tour.cost(&dm) - solution.cost).abs() < 1e-9);
        assert!(tsp.model().num_lazy_constraints() >= 1);
    }
}
