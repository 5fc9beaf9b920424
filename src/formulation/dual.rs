//! Dual-cycle (k-similar) formulation.
//!
//! # Model
//!
//! Two [`CycleFormulation`]s over the same vertex indices, one costed by
//! each instance, share a solver context. One binary `z[u][v]` per pair
//! marks an edge used by both cycles:
//!
//! ```text
//! z[u][v] <= x1[u][v]
//! z[u][v] <= x2[u][v]
//! z[u][v] >= x1[u][v] + x2[u][v] - 1
//! sum(z) >= k                          (or <= k, == k; see SimilaritySense)
//! ```
//!
//! The first two rows are the coupling the Lagrangian procedure relaxes
//! into the objective; [`DualCycleFormulation::relaxed`] builds the model
//! without them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CycleFormulation, TspModel, TspSolution};
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::milp::{
    Assignment, CompositeSupplier, CutSupplier, LinearConstraint, LinearExpr, MilpModel, Relation,
    Sense, SolverConfig, VarId,
};
use crate::models::{pair_count, DualTourSolution, EdgeMap, Instance, Side};

/// Direction of the similarity row `sum(z) <sense> k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimilaritySense {
    /// At least `k` shared edges.
    #[default]
    AtLeast,
    /// At most `k` shared edges.
    AtMost,
    /// Exactly `k` shared edges.
    Exactly,
}

/// Required number of edges common to both tours.
///
/// # Examples
///
/// ```
/// use u_kstsp::formulation::Similarity;
///
/// let s = Similarity::at_least(3);
/// assert!(s.is_satisfied(4));
/// assert!(!s.is_satisfied(2));
/// assert_eq!(s.to_string(), ">= 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Similarity {
    pub k: usize,
    pub sense: SimilaritySense,
}

impl Similarity {
    pub fn new(k: usize, sense: SimilaritySense) -> Self {
        Self { k, sense }
    }

    pub fn at_least(k: usize) -> Self {
        Self::new(k, SimilaritySense::AtLeast)
    }

    pub fn at_most(k: usize) -> Self {
        Self::new(k, SimilaritySense::AtMost)
    }

    pub fn exactly(k: usize) -> Self {
        Self::new(k, SimilaritySense::Exactly)
    }

    /// Relation of the similarity row.
    pub fn relation(&self) -> Relation {
        match self.sense {
            SimilaritySense::AtLeast => Relation::GreaterEqual,
            SimilaritySense::AtMost => Relation::LessEqual,
            SimilaritySense::Exactly => Relation::Equal,
        }
    }

    /// Returns `true` if `shared` edges meet the requirement.
    pub fn is_satisfied(&self, shared: usize) -> bool {
        match self.sense {
            SimilaritySense::AtLeast => shared >= self.k,
            SimilaritySense::AtMost => shared <= self.k,
            SimilaritySense::Exactly => shared == self.k,
        }
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.relation(), self.k)
    }
}

/// Per-pair multipliers of the two relaxed coupling rows, one map per cycle.
pub type Multipliers = [EdgeMap<f64>; 2];

/// Two Hamiltonian cycles and their shared-edge indicators in one model.
#[derive(Debug, Clone)]
pub struct DualCycleFormulation {
    instance: Instance,
    similarity: Similarity,
    model: MilpModel,
    cycles: [CycleFormulation; 2],
    shared: EdgeMap<VarId>,
}

impl DualCycleFormulation {
    /// Builds the complete k-similar model: both cycles, the exact AND
    /// linking of every indicator and the similarity row.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_kstsp::formulation::{DualCycleFormulation, Similarity};
    /// use u_kstsp::milp::SolverConfig;
    /// use u_kstsp::models::Instance;
    ///
    /// let instance = Instance::parse("0 0 0 0\n1 0 1 0\n1 1 1 1\n0 1 0 1\n").unwrap();
    /// let mut problem =
    ///     DualCycleFormulation::build(&instance, Similarity::at_least(4), &SolverConfig::new("ksTSP"))
    ///         .unwrap();
    /// assert_eq!(problem.solve().unwrap(), 8.0);
    /// assert_eq!(problem.solution().unwrap().shared_edges(), 4);
    /// ```
    pub fn build(
        instance: &Instance,
        similarity: Similarity,
        config: &SolverConfig,
    ) -> Result<Self> {
        let mut problem = Self::with_indicators(instance, similarity, config)?;
        problem.add_shared_edge_constraints();
        problem.add_shared_edge_lower_links();
        Ok(problem)
    }

    /// Builds the model with `z <= x1` and `z <= x2` left out, to be priced
    /// into the objective by [`lagrangian_objective`](Self::lagrangian_objective).
    pub fn relaxed(
        instance: &Instance,
        similarity: Similarity,
        config: &SolverConfig,
    ) -> Result<Self> {
        let mut problem = Self::with_indicators(instance, similarity, config)?;
        problem.add_shared_edge_lower_links();
        Ok(problem)
    }

    fn with_indicators(
        instance: &Instance,
        similarity: Similarity,
        config: &SolverConfig,
    ) -> Result<Self> {
        let size = instance.len();
        if similarity.k > pair_count(size) {
            return Err(Error::invalid_input(format!(
                "k = {} exceeds the {} vertex pairs of {size} vertices",
                similarity.k,
                pair_count(size)
            )));
        }

        let mut model = MilpModel::new(config.clone());
        let first = CycleFormulation::build(&mut model, size, |u, v| {
            instance.distance(Side::First, u, v) as f64
        })?;
        let second = CycleFormulation::build(&mut model, size, |u, v| {
            instance.distance(Side::Second, u, v) as f64
        })?;
        let shared = EdgeMap::from_fn(size, |_, _| model.add_binary(0.0));

        let mut problem = Self {
            instance: instance.clone(),
            similarity,
            model,
            cycles: [first, second],
            shared,
        };
        problem.add_similarity_constraint();
        Ok(problem)
    }

    /// Adds `z <= x1` and `z <= x2` for every pair.
    pub fn add_shared_edge_constraints(&mut self) {
        for ((u, v), &z) in self.shared.iter() {
            for cycle in &self.cycles {
                let mut row = LinearExpr::sum([z]);
                row.add_term(cycle.edge(u, v), -1.0);
                self.model.add_constraint(row.leq(0.0));
            }
        }
    }

    /// Adds `z >= x1 + x2 - 1` for every pair.
    pub fn add_shared_edge_lower_links(&mut self) {
        for ((u, v), &z) in self.shared.iter() {
            let row: LinearExpr = [
                (z, 1.0),
                (self.cycles[0].edge(u, v), -1.0),
                (self.cycles[1].edge(u, v), -1.0),
            ]
            .into_iter()
            .collect();
            self.model.add_constraint(row.geq(-1.0));
        }
    }

    fn add_similarity_constraint(&mut self) {
        let row = LinearExpr::sum(self.shared.values().copied());
        self.model
            .add_constraint(row.constrain(self.similarity.relation(), self.similarity.k as f64));
    }

    /// Subtour cuts of both cycles for one candidate, first cycle first.
    pub fn subtour_elim(&self, candidate: &Assignment) -> Vec<LinearConstraint> {
        CompositeSupplier::new()
            .with(&self.cycles[0])
            .with(&self.cycles[1])
            .on_integer_candidate(candidate)
    }

    /// Total length of both cycles.
    pub fn objective(&self) -> LinearExpr {
        let mut expr = self.cycles[0].objective();
        expr.extend(self.cycles[1].objective());
        expr
    }

    /// Both cycle lengths plus `l1 * (z - x1) + l2 * (z - x2)` per pair.
    pub fn lagrangian_objective(&self, multipliers: &Multipliers) -> LinearExpr {
        let mut expr = self.objective();
        for ((u, v), &z) in self.shared.iter() {
            let l1 = *multipliers[0].get(u, v);
            let l2 = *multipliers[1].get(u, v);
            expr.add_term(z, l1 + l2);
            expr.add_term(self.cycles[0].edge(u, v), -l1);
            expr.add_term(self.cycles[1].edge(u, v), -l2);
        }
        expr
    }

    /// Minimizes the total length; returns the optimal value.
    pub fn solve(&mut self) -> Result<f64> {
        let objective = self.objective();
        self.solve_with(objective)
    }

    /// Minimizes the Lagrangian objective; returns the optimal value.
    pub fn solve_lagrangian(&mut self, multipliers: &Multipliers) -> Result<f64> {
        if multipliers.iter().any(|m| m.size() != self.size()) {
            return Err(Error::invalid_input(format!(
                "multipliers sized for {} and {} vertices, model has {}",
                multipliers[0].size(),
                multipliers[1].size(),
                self.size()
            )));
        }
        let objective = self.lagrangian_objective(multipliers);
        self.solve_with(objective)
    }

    /// Minimizes `objective` with lazy subtour elimination on both cycles.
    pub fn solve_with(&mut self, objective: LinearExpr) -> Result<f64> {
        self.model.set_objective(objective, Sense::Minimize);

        let supplier = CompositeSupplier::new()
            .with(&self.cycles[0])
            .with(&self.cycles[1]);
        let status = self.model.optimize(&supplier)?;

        match self.model.objective_value() {
            Some(value) if self.model.solution_count() > 0 => Ok(value),
            _ => Err(Error::no_solution(self.model.name(), status)),
        }
    }

    /// `z - x1` and `z - x2` per pair at the last solution.
    pub fn subgradient(&self) -> Result<Multipliers> {
        let assignment = self.last_assignment()?;
        let component = |cycle: &CycleFormulation| {
            self.shared
                .map(|(u, v), &z| assignment.value(z) - assignment.value(cycle.edge(u, v)))
        };
        Ok([component(&self.cycles[0]), component(&self.cycles[1])])
    }

    /// Both tours of the last solution.
    pub fn solution(&self) -> Option<DualTourSolution> {
        let assignment = self.model.assignment()?;
        let first = self.cycles[0].tour(assignment)?;
        let second = self.cycles[1].tour(assignment)?;
        Some(DualTourSolution::new(&self.instance, first, second))
    }

    /// Number of indicators set in the last solution.
    pub fn shared_count(&self) -> Option<usize> {
        let assignment = self.model.assignment()?;
        Some(
            self.shared
                .values()
                .filter(|&&z| assignment.is_selected(z))
                .count(),
        )
    }

    /// Solves one TSP whose edge cost is the sum of both instances'
    /// distances, ignoring similarity.
    ///
    /// The tour used for both cycles shares all of its edges, so under
    /// [`SimilaritySense::AtLeast`] its doubled-up cost is feasible for the
    /// coupled problem.
    pub fn upper_bound(&self) -> Result<TspSolution> {
        let config = self
            .model
            .config()
            .renamed(format!("{}-sum", self.model.name()));
        let summed = DistanceMatrix::sum(
            &self.instance.distance_matrix(Side::First),
            &self.instance.distance_matrix(Side::Second),
        )
        .ok_or_else(|| Error::solver("instance sides differ in size"))?;
        TspModel::from_matrix(&config, &summed)?.solve()
    }

    fn last_assignment(&self) -> Result<&Assignment> {
        self.model
            .assignment()
            .ok_or_else(|| Error::no_solution(self.model.name(), self.model.status()))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn size(&self) -> usize {
        self.instance.len()
    }

    pub fn similarity(&self) -> Similarity {
        self.similarity
    }

    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    /// Cycle formulation of one instance.
    pub fn cycle(&self, side: Side) -> &CycleFormulation {
        &self.cycles[side.index()]
    }

    /// Indicator variable of the pair `(u, v)`.
    pub fn shared(&self, u: usize, v: usize) -> VarId {
        *self.shared.get(u, v)
    }
}
