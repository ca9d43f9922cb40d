//! JSON shapes shared with the web front end.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::problem::{Constraint, ConstraintOp, LpProblem, Objective, Sense, SignOperator, SignOperators};
use crate::solution::{Solution, SolutionStatus};
use crate::solver::Method;
use crate::table::TableData;

/// A problem as submitted by the form layer: parallel constraint arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemInput {
    pub problem_type: Sense,
    pub objective_function: Vec<f64>,
    pub constraint_coefficients: Vec<Vec<f64>>,
    pub constraint_signs: Vec<ConstraintOp>,
    pub constraint_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_operator: Option<SignOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_operators: Option<Vec<SignOperator>>,
}

impl TryFrom<ProblemInput> for LpProblem {
    type Error = SolveError;

    fn try_from(input: ProblemInput) -> Result<Self, Self::Error> {
        let m = input.constraint_coefficients.len();
        if input.constraint_signs.len() != m {
            return Err(SolveError::LengthMismatch {
                field: "constraintSigns",
                expected: m,
                found: input.constraint_signs.len(),
            });
        }
        if input.constraint_values.len() != m {
            return Err(SolveError::LengthMismatch {
                field: "constraintValues",
                expected: m,
                found: input.constraint_values.len(),
            });
        }

        let n = input.objective_function.len();
        let constraints = input
            .constraint_coefficients
            .into_iter()
            .zip(input.constraint_signs)
            .zip(input.constraint_values)
            .enumerate()
            .map(|(i, ((coefficients, op), rhs))| Constraint {
                name: format!("c{}", i + 1),
                coefficients,
                op,
                rhs,
            })
            .collect();

        Ok(LpProblem {
            variables: (1..=n).map(|j| format!("x{j}")).collect(),
            objective: Objective {
                coefficients: input.objective_function,
                sense: input.problem_type,
            },
            constraints,
            operators: SignOperators {
                objective: input.objective_operator,
                constraints: input.constraint_operators,
            },
        })
    }
}

impl From<&LpProblem> for ProblemInput {
    fn from(problem: &LpProblem) -> Self {
        Self {
            problem_type: problem.objective.sense,
            objective_function: problem.objective.coefficients.clone(),
            constraint_coefficients: problem.constraints.iter().map(|c| c.coefficients.clone()).collect(),
            constraint_signs: problem.constraints.iter().map(|c| c.op).collect(),
            constraint_values: problem.constraints.iter().map(|c| c.rhs).collect(),
            objective_operator: problem.operators.objective,
            constraint_operators: problem.operators.constraints.clone(),
        }
    }
}

/// A solution in the shape the display layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionOutput {
    pub is_valid: bool,
    pub status: SolutionStatus,
    pub method: Option<Method>,
    pub coordinates: Vec<f64>,
    pub value: f64,
    pub table_data: TableData,
}

impl From<&Solution> for SolutionOutput {
    fn from(solution: &Solution) -> Self {
        Self {
            is_valid: solution.is_valid(),
            status: solution.status,
            method: solution.method,
            coordinates: solution.coordinates.clone(),
            value: solution.value,
            table_data: solution.table.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solve_lp_problem;

    const TEXTBOOK: &str = r#"{
        "problemType": "max",
        "objectiveFunction": [3, 2],
        "constraintCoefficients": [[2, 1], [1, 2]],
        "constraintSigns": ["<=", "<="],
        "constraintValues": [10, 8]
    }"#;

    #[test]
    fn test_parse_form_record() {
        let input: ProblemInput = serde_json::from_str(TEXTBOOK).unwrap();
        let problem = LpProblem::try_from(input).unwrap();

        assert_eq!(problem.variables, vec!["x1", "x2"]);
        assert_eq!(problem.constraints[1].name, "c2");
        assert_eq!(problem.constraints[1].op, ConstraintOp::Le);
        assert_eq!(problem.operators, SignOperators::default());
    }

    #[test]
    fn test_operators_and_symbols() {
        let json = r#"{
            "problemType": "min",
            "objectiveFunction": [1, 1],
            "constraintCoefficients": [[1, 1]],
            "constraintSigns": ["≥"],
            "constraintValues": [4],
            "objectiveOperator": "-",
            "constraintOperators": ["+"]
        }"#;
        let input: ProblemInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.constraint_signs, vec![ConstraintOp::Ge]);
        assert_eq!(input.objective_operator, Some(SignOperator::Minus));

        let problem = LpProblem::try_from(input).unwrap();
        assert_eq!(problem.objective.sense, Sense::Min);
        assert_eq!(problem.operators.constraints, Some(vec![SignOperator::Plus]));
    }

    #[test]
    fn test_mismatched_arrays() {
        let mut input: ProblemInput = serde_json::from_str(TEXTBOOK).unwrap();
        input.constraint_values.pop();

        assert_eq!(
            LpProblem::try_from(input),
            Err(SolveError::LengthMismatch {
                field: "constraintValues",
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_solution_output_shape() {
        let input: ProblemInput = serde_json::from_str(TEXTBOOK).unwrap();
        let problem = LpProblem::try_from(input).unwrap();
        let solution = solve_lp_problem(&problem, Method::Graphical);

        let value = serde_json::to_value(SolutionOutput::from(&solution)).unwrap();
        assert_eq!(value["isValid"], true);
        assert_eq!(value["status"], "optimal");
        assert_eq!(value["method"], "graphical");
        assert_eq!(value["value"], 16.0);
        assert_eq!(value["tableData"]["headers"][0], "Constraint");
    }

    #[test]
    fn test_problem_round_trip() {
        let input: ProblemInput = serde_json::from_str(TEXTBOOK).unwrap();
        let problem = LpProblem::try_from(input.clone()).unwrap();
        assert_eq!(ProblemInput::from(&problem), input);
    }
}
