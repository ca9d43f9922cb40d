use std::str::FromStr;

use log::debug;

use crate::error::SolveError;
use crate::graphical;
use crate::problem::LpProblem;
use crate::simplex::{self, Engine};
use crate::solution::Solution;

/// Solving method requested by the caller
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Vertex enumeration; only meaningful for 2 variables
    #[default]
    Graphical,
    /// Tableau simplex
    Simplex,
    /// Simplex over the general (slack/surplus/artificial) form
    General,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Graphical => "graphical",
            Method::Simplex => "simplex",
            Method::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Option<Method> {
        match name.trim().to_ascii_lowercase().as_str() {
            "graphical" => Some(Method::Graphical),
            "simplex" => Some(Method::Simplex),
            "general" => Some(Method::General),
            _ => None,
        }
    }

    /// Unknown names fall back to the default method
    pub fn from_name_or_default(name: &str) -> Method {
        Self::from_name(name).unwrap_or_default()
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::from_name(s).ok_or_else(|| format!("unknown method '{}', expected graphical, simplex or general", s))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point that picks a method and always returns a well-formed solution
#[derive(Debug, Clone)]
pub struct Solver {
    /// Iteration cap of the simplex method
    max_iterations: usize,
    /// Iteration cap of the general-form method
    general_iterations: usize,
    /// Tolerance for reduced costs and pivot elements
    tolerance: f64,
    /// Tolerance for constraint checks and phase 1 feasibility
    feasibility_tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            general_iterations: 20,
            tolerance: 1e-10,
            feasibility_tolerance: 1e-8,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_general_iterations(mut self, max: usize) -> Self {
        self.general_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = tol;
        self
    }

    /// Solve `problem`, mapping every failure to an invalid solution.
    ///
    /// Two-variable problems always use the graphical method. Otherwise
    /// `General` selects the general-form path and anything else the
    /// simplex method.
    pub fn solve(&self, problem: &LpProblem, method: Method) -> Solution {
        if let Err(e) = problem.validate() {
            debug!("rejecting problem: {}", e);
            return Solution::failed(e.status(), None);
        }
        let problem = problem.normalized();

        let method = Self::route(&problem, method);
        debug!(
            "solving {} variables, {} constraints with the {} method",
            problem.num_variables(),
            problem.num_constraints(),
            method
        );

        let result = match method {
            Method::Graphical => self.solve_graphical(&problem),
            Method::Simplex => self.solve_simplex(&problem),
            Method::General => self.solve_general(&problem),
        };
        result.unwrap_or_else(|e| {
            debug!("{} method failed: {}", method, e);
            Solution::failed(e.status(), Some(method))
        })
    }

    /// The method actually used for `requested` on `problem`
    pub fn route(problem: &LpProblem, requested: Method) -> Method {
        if problem.num_variables() == 2 {
            return Method::Graphical;
        }
        match requested {
            Method::General => Method::General,
            Method::Simplex | Method::Graphical => Method::Simplex,
        }
    }

    /// Vertex enumeration; the problem must have exactly 2 variables
    pub fn solve_graphical(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        problem.validate()?;
        graphical::solve(problem, self.feasibility_tolerance)
    }

    pub fn solve_simplex(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        problem.validate()?;
        simplex::solve(problem, &self.engine(self.max_iterations), Method::Simplex)
    }

    pub fn solve_general(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        problem.validate()?;
        simplex::solve(problem, &self.engine(self.general_iterations), Method::General)
    }

    fn engine(&self, max_iterations: usize) -> Engine {
        Engine {
            max_iterations,
            tolerance: self.tolerance,
            feasibility_tolerance: self.feasibility_tolerance,
        }
    }
}

/// Solve with default settings
pub fn solve_lp_problem(problem: &LpProblem, method: Method) -> Solution {
    Solver::default().solve(problem, method)
}
