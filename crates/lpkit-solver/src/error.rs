use thiserror::Error;

use crate::solution::SolutionStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("No feasible point satisfies every constraint")]
    Infeasible,
    #[error("Objective can be improved without limit")]
    Unbounded,
    #[error("No optimum reached within {limit} iterations")]
    IterationLimit { limit: usize },
    #[error("Objective function has no coefficients")]
    EmptyObjective,
    #[error("Constraint {constraint} has {found} coefficients, expected {expected}")]
    DimensionMismatch {
        constraint: String,
        expected: usize,
        found: usize,
    },
    #[error("{field} has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Non-finite number in {location}")]
    NonFinite { location: String },
    #[error("Graphical method needs exactly 2 variables, got {0}")]
    NotTwoVariables(usize),
}

impl SolveError {
    /// The status a failed solution reports for this error
    pub fn status(&self) -> SolutionStatus {
        match self {
            SolveError::Infeasible => SolutionStatus::Infeasible,
            SolveError::Unbounded => SolutionStatus::Unbounded,
            SolveError::IterationLimit { .. } => SolutionStatus::IterationLimit,
            SolveError::EmptyObjective
            | SolveError::DimensionMismatch { .. }
            | SolveError::LengthMismatch { .. }
            | SolveError::NonFinite { .. }
            | SolveError::NotTwoVariables(_) => SolutionStatus::InvalidInput,
        }
    }
}
