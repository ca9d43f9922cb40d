use crate::solver::Method;
use crate::table::TableData;

/// The result of solving an LP problem
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Method that produced this solution, if dispatch happened
    pub method: Option<Method>,
    /// Optimal values for each variable (empty unless optimal)
    pub coordinates: Vec<f64>,
    /// Objective value at `coordinates` (0 unless optimal)
    pub value: f64,
    /// Display table describing how the solution was reached
    pub table: TableData,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The iteration cap was reached before optimality
    IterationLimit,
    /// The problem description was malformed
    InvalidInput,
}

impl SolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::IterationLimit => "iteration_limit",
            SolutionStatus::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Solution {
    pub fn optimal(method: Method, coordinates: Vec<f64>, value: f64, table: TableData) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            method: Some(method),
            coordinates,
            value,
            table,
        }
    }

    /// Empty result: no coordinates, zero value, empty table
    pub fn failed(status: SolutionStatus, method: Option<Method>) -> Self {
        Self {
            status,
            method,
            coordinates: Vec::new(),
            value: 0.0,
            table: TableData::empty(),
        }
    }

    /// True iff a finite optimal feasible solution was found
    pub fn is_valid(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
