//! Binary MILP model with lazy constraint generation.
//!
//! # Algorithm
//!
//! [`MilpModel::optimize`] solves the integer program with the constraints
//! registered so far, then hands the optimal integer candidate to a
//! [`CutSupplier`]. Any cuts it returns join the model's lazy pool and the
//! program is solved again; an empty answer accepts the candidate.
//!
//! Each round solves a relaxation of the full (lazily described) model to
//! optimality, so the first candidate that violates no cut is optimal for
//! the full model. Lazy cuts persist across later `optimize` calls on the
//! same model, so re-solving with a different objective starts from every
//! cut found so far.
//!
//! Each round is delegated to the pure-Rust `microlp` backend of `good_lp`.

use std::fmt;
use std::time::Instant;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use serde::{Deserialize, Serialize};

use super::{
    Assignment, CutSupplier, LinearConstraint, LinearExpr, Relation, Sense, SolverConfig, VarId,
};
use crate::error::{Error, Result};

const FEASIBILITY_TOL: f64 = 1e-6;

/// Outcome of the last [`MilpModel::optimize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No integer point satisfies the constraints.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// The time limit expired before a cut-free candidate was found.
    TimeLimit,
    /// Not solved yet.
    #[default]
    Unknown,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "Optimal"),
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Unbounded => write!(f, "Unbounded"),
            Self::TimeLimit => write!(f, "TimeLimit"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A binary integer program: variables, constraints, objective, and the
/// result of the last solve.
///
/// # Examples
///
/// ```
/// use u_kstsp::milp::{LinearExpr, MilpModel, NoCuts, SolveStatus, SolverConfig};
///
/// let mut model = MilpModel::new(SolverConfig::new("pick-two"));
/// let vars: Vec<_> = [4.0, 1.0, 3.0, 2.0]
///     .iter()
///     .map(|&cost| model.add_binary(cost))
///     .collect();
/// model.add_constraint(LinearExpr::sum(vars.iter().copied()).equals(2.0));
///
/// let status = model.optimize(&NoCuts).unwrap();
/// assert_eq!(status, SolveStatus::Optimal);
/// assert_eq!(model.objective_value(), Some(3.0));
/// assert_eq!(model.value(vars[1]), Some(1.0));
/// assert_eq!(model.value(vars[0]), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct MilpModel {
    config: SolverConfig,
    costs: Vec<f64>,
    constraints: Vec<LinearConstraint>,
    lazy: Vec<LinearConstraint>,
    objective: Option<(LinearExpr, Sense)>,
    status: SolveStatus,
    solution: Option<Assignment>,
    objective_value: Option<f64>,
    rounds: usize,
}

impl MilpModel {
    /// Creates an empty model.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            costs: Vec::new(),
            constraints: Vec::new(),
            lazy: Vec::new(),
            objective: None,
            status: SolveStatus::Unknown,
            solution: None,
            objective_value: None,
            rounds: 0,
        }
    }

    /// The configuration this model was created with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Registers a binary variable with the given objective coefficient.
    ///
    /// The coefficient is used when no explicit objective is set.
    pub fn add_binary(&mut self, cost: f64) -> VarId {
        self.costs.push(cost);
        VarId(self.costs.len() - 1)
    }

    /// Adds a constraint to the model.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Adds a lazy constraint. It stays in the model for later solves.
    pub fn add_lazy_constraint(&mut self, constraint: LinearConstraint) {
        self.lazy.push(constraint);
    }

    /// Replaces the objective.
    pub fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.objective = Some((expr, sense));
    }

    /// Current objective: the explicit one, or the sum of variable costs
    /// minimized.
    pub fn objective(&self) -> (LinearExpr, Sense) {
        match &self.objective {
            Some((expr, sense)) => (expr.clone(), *sense),
            None => {
                let expr = self
                    .costs
                    .iter()
                    .enumerate()
                    .filter(|(_, &cost)| cost != 0.0)
                    .map(|(i, &cost)| (VarId(i), cost))
                    .collect();
                (expr, Sense::Minimize)
            }
        }
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.costs.len()
    }

    /// Number of constraints added up front.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of lazy constraints generated so far.
    pub fn num_lazy_constraints(&self) -> usize {
        self.lazy.len()
    }

    /// Solves the model, consulting `supplier` on every integer candidate.
    ///
    /// Infeasibility and time limits are reported through the returned
    /// status (with zero solutions); only backend failures are errors.
    pub fn optimize(&mut self, supplier: &dyn CutSupplier) -> Result<SolveStatus> {
        let start = Instant::now();
        let deadline = self.config.time_limit();
        let (objective, sense) = self.objective();

        self.status = SolveStatus::Unknown;
        self.solution = None;
        self.objective_value = None;
        self.rounds = 0;

        if !self.config.lazy_constraints {
            log::warn!(
                "{}: lazy constraints disabled, accepting the first candidate",
                self.name()
            );
        }

        loop {
            if deadline.is_some_and(|limit| start.elapsed() >= limit) {
                log::warn!(
                    "{}: time limit reached after {} round(s)",
                    self.name(),
                    self.rounds
                );
                self.status = SolveStatus::TimeLimit;
                return Ok(self.status);
            }

            self.rounds += 1;
            let values = match self.solve_round(&objective, sense) {
                Ok(values) => values,
                Err(ResolutionError::Infeasible) => {
                    self.status = SolveStatus::Infeasible;
                    return Ok(self.status);
                }
                Err(ResolutionError::Unbounded) => {
                    self.status = SolveStatus::Unbounded;
                    return Ok(self.status);
                }
                Err(e) => return Err(Error::solver(format!("{}: {e}", self.name()))),
            };

            let candidate = Assignment::new(values);
            let cuts = if self.config.lazy_constraints {
                supplier.on_integer_candidate(&candidate)
            } else {
                Vec::new()
            };

            if cuts.is_empty() {
                let value = objective.evaluate(|v| candidate.value(v));
                self.objective_value = Some(value);
                self.solution = Some(candidate);
                self.status = SolveStatus::Optimal;

                let summary = format!(
                    "{}: optimal {value} after {} round(s), {} lazy cut(s), {:.3}s",
                    self.name(),
                    self.rounds,
                    self.lazy.len(),
                    start.elapsed().as_secs_f64()
                );
                if self.config.verbose {
                    log::info!("{summary}");
                } else {
                    log::debug!("{summary}");
                }
                return Ok(self.status);
            }

            log::debug!(
                "{}: round {}: {} lazy cut(s)",
                self.name(),
                self.rounds,
                cuts.len()
            );
            self.lazy.extend(cuts);
        }
    }

    /// Status of the last solve.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Number of solutions available from the last solve (zero or one).
    pub fn solution_count(&self) -> usize {
        usize::from(self.solution.is_some())
    }

    /// Objective value of the last solution.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Value of a variable in the last solution.
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.solution.as_ref().map(|s| s.value(var))
    }

    /// All variable values of the last solution.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.solution.as_ref()
    }

    /// Number of integer programs solved by the last `optimize` call.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn solve_round(
        &self,
        objective: &LinearExpr,
        sense: Sense,
    ) -> std::result::Result<Vec<f64>, ResolutionError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = self
            .costs
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let goal = to_expression(objective, &handles);
        let unsolved = match sense {
            Sense::Minimize => vars.minimise(goal),
            Sense::Maximize => vars.maximise(goal),
        };
        let mut problem = unsolved.using(microlp);

        for c in self.constraints.iter().chain(&self.lazy) {
            if c.expr().terms().is_empty() {
                // Constant rows are decided here; the backend never sees them.
                if c.is_satisfied(|_| 0.0, FEASIBILITY_TOL) {
                    continue;
                }
                return Err(ResolutionError::Infeasible);
            }
            problem = problem.with(to_constraint(c, &handles));
        }

        let solution = problem.solve()?;
        Ok(handles.iter().map(|&h| solution.value(h).round()).collect())
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for &(var, coef) in expr.terms() {
        out += coef * handles[var.index()];
    }
    out
}

fn to_constraint(c: &LinearConstraint, handles: &[Variable]) -> good_lp::Constraint {
    let lhs = to_expression(c.expr(), handles);
    let rhs = c.rhs();
    match c.relation() {
        Relation::LessEqual => constraint!(lhs <= rhs),
        Relation::GreaterEqual => constraint!(lhs >= rhs),
        Relation::Equal => constraint!(lhs == rhs),
    }
}
