//! Error types.

use thiserror::Error;

use crate::milp::SolveStatus;

/// Errors surfaced by model construction, solving, and the subgradient loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The solver returned without any integer-feasible solution.
    #[error("could not find a solution for {context} (status: {status})")]
    NoSolution { context: String, status: SolveStatus },
    /// The subgradient loop hit its iteration cap before converging.
    #[error("max iteration reached after {iterations} iterations (best lower bound {best_bound})")]
    IterationBudgetExceeded { iterations: usize, best_bound: f64 },
    #[error("solver failure: {0}")]
    Solver(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn no_solution(context: impl Into<String>, status: SolveStatus) -> Self {
        Self::NoSolution {
            context: context.into(),
            status,
        }
    }

    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_solution_message() {
        let err = Error::no_solution("ksTSP", SolveStatus::Infeasible);
        assert_eq!(
            err.to_string(),
            "could not find a solution for ksTSP (status: Infeasible)"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::invalid_input("line 3: expected 4 integers");
        assert_eq!(err.to_string(), "invalid input: line 3: expected 4 integers");
    }

    #[test]
    fn test_budget_exceeded_carries_bound() {
        let err = Error::IterationBudgetExceeded {
            iterations: 10,
            best_bound: 42.5,
        };
        match err {
            Error::IterationBudgetExceeded { best_bound, .. } => assert_eq!(best_bound, 42.5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
