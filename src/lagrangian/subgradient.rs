//! Subgradient optimization of the Lagrangian dual.
//!
//! # Algorithm
//!
//! 1. Solve one TSP on summed edge costs for the upper bound `Zub` and set
//!    every multiplier to `l0`
//! 2. Solve the relaxed model under the current multipliers: its optimum
//!    `Zlb` is a lower bound on the coupled optimum
//! 3. Subgradient `g = z - x` per pair and cycle
//! 4. Polyak step `alpha = pi * (Zub - Zlb) / |g|^2`, then
//!    `l = max(0, l + alpha * g)`
//! 5. Stop when `g` is zero or no multiplier moved by more than the
//!    tolerance; fail once the iteration cap is reached
//!
//! Whenever the tours of an iteration already meet the similarity
//! requirement their true cost is a feasible value and may tighten `Zub`.
//!
//! # Reference
//!
//! Held, M., Wolfe, P. & Crowder, H. P. (1974). "Validation of subgradient
//! optimization", *Mathematical Programming* 6, 62-88.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::SubgradientConfig;
use crate::error::{Error, Result};
use crate::formulation::{DualCycleFormulation, Multipliers, Similarity};
use crate::milp::SolverConfig;
use crate::models::{DualTourSolution, EdgeMap, Instance};

/// Lifecycle of a [`SubgradientSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubgradientState {
    /// Upper bound not computed yet.
    Init,
    Iterating,
    /// Multipliers stabilized or the subgradient vanished.
    Converged,
    /// The iteration cap was reached first.
    MaxIterExceeded,
}

/// One iteration of the subgradient loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgradientStep {
    /// 1-based iteration number.
    pub iteration: usize,
    /// `Zlb` of this iteration.
    pub lower_bound: f64,
    /// Best `Zlb` so far.
    pub best_lower_bound: f64,
    /// `Zub` after this iteration.
    pub upper_bound: f64,
    pub step_size: f64,
    pub subgradient_norm_sq: f64,
    /// State after this iteration.
    pub state: SubgradientState,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgradientOutcome {
    pub iterations: usize,
    /// Best lower bound.
    pub lower_bound: f64,
    /// Final upper bound.
    pub upper_bound: f64,
    pub state: SubgradientState,
    /// Cheapest tour pair seen that meets the similarity requirement.
    pub best_primal: Option<DualTourSolution>,
    pub history: Vec<SubgradientStep>,
}

/// Lazy subgradient loop over the relaxed dual-cycle model.
///
/// Every call to `next` runs one iteration and yields its
/// [`SubgradientStep`]; the caller may stop at any time. After a step in
/// state [`MaxIterExceeded`](SubgradientState::MaxIterExceeded) the next
/// item is [`Error::IterationBudgetExceeded`]. The iterator is fused after
/// convergence or any error. Restarting means building a new solver.
///
/// # Examples
///
/// ```
/// use u_kstsp::formulation::Similarity;
/// use u_kstsp::lagrangian::{SubgradientConfig, SubgradientSolver, SubgradientState};
/// use u_kstsp::milp::SolverConfig;
/// use u_kstsp::models::Instance;
///
/// let instance = Instance::parse("0 0 0 0\n1 0 1 0\n1 1 1 1\n0 1 0 1\n").unwrap();
/// let mut solver = SubgradientSolver::new(
///     &instance,
///     Similarity::at_least(4),
///     &SolverConfig::new("ksTSP"),
///     SubgradientConfig::default(),
/// )
/// .unwrap();
/// let outcome = solver.run().unwrap();
/// assert_eq!(outcome.state, SubgradientState::Converged);
/// assert_eq!(outcome.lower_bound, outcome.upper_bound);
/// ```
#[derive(Debug, Clone)]
pub struct SubgradientSolver {
    problem: DualCycleFormulation,
    config: SubgradientConfig,
    state: SubgradientState,
    multipliers: Multipliers,
    pi: f64,
    upper_bound: f64,
    best_lower_bound: f64,
    best_primal: Option<DualTourSolution>,
    iteration: usize,
    finished: bool,
}

impl SubgradientSolver {
    /// Builds the relaxed model. No solve happens until the first step.
    pub fn new(
        instance: &Instance,
        similarity: Similarity,
        solver: &SolverConfig,
        config: SubgradientConfig,
    ) -> Result<Self> {
        config.validate()?;
        let problem = DualCycleFormulation::relaxed(instance, similarity, solver)?;
        let size = problem.size();
        let l0 = config.initial_multiplier;
        Ok(Self {
            problem,
            pi: config.pi,
            config,
            state: SubgradientState::Init,
            multipliers: [EdgeMap::filled(size, l0), EdgeMap::filled(size, l0)],
            upper_bound: f64::INFINITY,
            best_lower_bound: f64::NEG_INFINITY,
            best_primal: None,
            iteration: 0,
            finished: false,
        })
    }

    /// Drives the loop to the end, keeping every step.
    pub fn run(&mut self) -> Result<SubgradientOutcome> {
        let mut history = Vec::new();
        for step in self.by_ref() {
            history.push(step?);
        }
        Ok(SubgradientOutcome {
            iterations: self.iteration,
            lower_bound: self.best_lower_bound,
            upper_bound: self.upper_bound,
            state: self.state,
            best_primal: self.best_primal.clone(),
            history,
        })
    }

    fn initialize(&mut self) -> Result<()> {
        let tsp = self.problem.upper_bound()?;
        self.upper_bound = tsp.cost;
        if self.problem.similarity().is_satisfied(tsp.tour.len()) {
            self.best_primal = Some(DualTourSolution::new(
                self.problem.instance(),
                tsp.tour.clone(),
                tsp.tour,
            ));
        }
        self.state = SubgradientState::Iterating;
        log::debug!(
            "subgradient: Zub = {} from the summed-cost tour",
            self.upper_bound
        );
        Ok(())
    }

    fn step(&mut self) -> Result<SubgradientStep> {
        if self.state == SubgradientState::Init {
            self.initialize()?;
        }

        self.iteration += 1;
        let lower_bound = self.problem.solve_lagrangian(&self.multipliers)?;
        self.best_lower_bound = self.best_lower_bound.max(lower_bound);
        self.tighten_upper_bound();

        let g = self.problem.subgradient()?;
        let norm_sq: f64 = g.iter().flat_map(|m| m.values()).map(|x| x * x).sum();

        let (step_size, state) = if norm_sq == 0.0 {
            (0.0, SubgradientState::Converged)
        } else {
            let alpha = (self.pi * (self.upper_bound - lower_bound) / norm_sq).max(0.0);
            let mut max_change = 0.0_f64;
            for (lm, gi) in self.multipliers.iter_mut().zip(&g) {
                for (l, &gv) in lm.values_mut().zip(gi.values()) {
                    let next = (*l + alpha * gv).max(0.0);
                    max_change = max_change.max((next - *l).abs());
                    *l = next;
                }
            }
            self.pi *= self.config.pi_decay;

            let state = if max_change <= self.config.tolerance {
                SubgradientState::Converged
            } else if self.iteration >= self.config.max_iterations {
                SubgradientState::MaxIterExceeded
            } else {
                SubgradientState::Iterating
            };
            (alpha, state)
        };
        self.state = state;

        log::debug!(
            "subgradient {}: Zlb = {lower_bound}, Zub = {}, |g|^2 = {norm_sq}, alpha = {step_size}, {:?}",
            self.iteration,
            self.upper_bound,
            state
        );

        Ok(SubgradientStep {
            iteration: self.iteration,
            lower_bound,
            best_lower_bound: self.best_lower_bound,
            upper_bound: self.upper_bound,
            step_size,
            subgradient_norm_sq: norm_sq,
            state,
        })
    }

    fn tighten_upper_bound(&mut self) {
        let Some(solution) = self.problem.solution() else {
            return;
        };
        if self.problem.similarity().is_satisfied(solution.shared_edges())
            && solution.total_cost() < self.upper_bound
        {
            log::debug!(
                "subgradient {}: feasible tours tighten Zub to {}",
                self.iteration,
                solution.total_cost()
            );
            self.upper_bound = solution.total_cost();
            self.best_primal = Some(solution);
        }
    }

    pub fn state(&self) -> SubgradientState {
        self.state
    }

    /// Iterations run so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn multipliers(&self) -> &Multipliers {
        &self.multipliers
    }

    /// Current `Zub`; infinite before the first step.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Best `Zlb`; negative infinity before the first step.
    pub fn best_lower_bound(&self) -> f64 {
        self.best_lower_bound
    }

    pub fn best_primal(&self) -> Option<&DualTourSolution> {
        self.best_primal.as_ref()
    }

    /// The relaxed model.
    pub fn problem(&self) -> &DualCycleFormulation {
        &self.problem
    }
}

impl Iterator for SubgradientSolver {
    type Item = Result<SubgradientStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.state {
            SubgradientState::Converged => {
                self.finished = true;
                None
            }
            SubgradientState::MaxIterExceeded => {
                self.finished = true;
                Some(Err(Error::IterationBudgetExceeded {
                    iterations: self.iteration,
                    best_bound: self.best_lower_bound,
                }))
            }
            SubgradientState::Init | SubgradientState::Iterating => {
                let result = self.step();
                if result.is_err() {
                    self.finished = true;
                }
                Some(result)
            }
        }
    }
}

impl FusedIterator for SubgradientSolver {}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Instance {
        Instance::parse("0 0 0 0\n1 0 1 0\n1 1 1 1\n0 1 0 1\n").expect("valid")
    }

    /// The second instance swaps vertices 1 and 2, so the optimal tours
    /// differ and share only two edges.
    fn crossed() -> Instance {
        Instance::parse("0 0 0 0\n10 0 10 10\n10 10 10 0\n0 10 0 10\n").expect("valid")
    }

    fn solver(instance: &Instance, k: usize, config: SubgradientConfig) -> SubgradientSolver {
        SubgradientSolver::new(
            instance,
            Similarity::at_least(k),
            &SolverConfig::new("ksTSP-lagrange"),
            config,
        )
        .expect("valid")
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = SubgradientSolver::new(
            &square(),
            Similarity::at_least(0),
            &SolverConfig::new("t"),
            SubgradientConfig::default().with_pi(-1.0),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_lazy_until_first_step() {
        let s = solver(&square(), 4, SubgradientConfig::default());
        assert_eq!(s.state(), SubgradientState::Init);
        assert_eq!(s.iterations(), 0);
        assert!(s.upper_bound().is_infinite());
        assert!(s.multipliers()[0].values().all(|&l| l == 1.0));
    }

    #[test]
    fn test_identical_geometry_converges_at_once() {
        let mut s = solver(&square(), 4, SubgradientConfig::default());
        let step = s.next().expect("one step").expect("solve");
        assert_eq!(step.iteration, 1);
        assert_eq!(step.state, SubgradientState::Converged);
        assert!((step.lower_bound - 8.0).abs() < 1e-6);
        assert!((step.upper_bound - 8.0).abs() < 1e-6);
        assert_eq!(step.subgradient_norm_sq, 0.0);
        assert!(s.next().is_none());
        assert!(s.next().is_none());
        assert_eq!(s.best_primal().map(|p| p.shared_edges()), Some(4));
    }

    #[test]
    fn test_budget_exceeded_reports_best_bound() {
        let config = SubgradientConfig::default()
            .with_initial_multiplier(0.0)
            .with_max_iterations(1);
        let mut s = solver(&crossed(), 4, config);

        let step = s.next().expect("one step").expect("solve");
        // Without multipliers both tours are free: 40 + 40. They share two
        // edges only, so Zub stays at the summed-cost tour: 90.
        assert!((step.lower_bound - 80.0).abs() < 1e-6);
        assert!((s.upper_bound() - 90.0).abs() < 1e-6);
        assert!(step.step_size > 0.0);
        assert_eq!(step.state, SubgradientState::MaxIterExceeded);

        match s.next() {
            Some(Err(Error::IterationBudgetExceeded {
                iterations,
                best_bound,
            })) => {
                assert_eq!(iterations, 1);
                assert!((best_bound - 80.0).abs() < 1e-6);
            }
            other => panic!("expected budget error, got {other:?}"),
        }
        assert!(s.next().is_none());
    }

    #[test]
    fn test_multipliers_stay_non_negative() {
        let config = SubgradientConfig::default()
            .with_max_iterations(5)
            .with_pi_decay(0.5);
        let mut s = solver(&crossed(), 4, config);
        for step in s.by_ref() {
            if step.is_err() {
                break;
            }
        }
        assert!(s.iterations() >= 1);
        assert!(s
            .multipliers()
            .iter()
            .all(|m| m.values().all(|&l| l >= 0.0)));
    }
}
