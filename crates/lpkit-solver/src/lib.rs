mod error;
pub mod geometry;
mod graphical;
pub mod plot;
mod problem;
mod simplex;
mod solution;
mod solver;
pub mod table;
mod trace;
#[cfg(feature = "serde")]
pub mod wire;

pub use error::SolveError;
pub use graphical::candidate_vertices;
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, Sense, SignOperator, SignOperators};
pub use solution::{Solution, SolutionStatus};
pub use solver::{solve_lp_problem, Method, Solver};
pub use table::TableData;
