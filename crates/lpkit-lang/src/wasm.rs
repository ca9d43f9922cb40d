//! WASM bindings for the web front end
//!
//! Problems cross the boundary in the form layer's record shape
//! (`ProblemInput`) and solutions come back as `SolutionOutput`.

use wasm_bindgen::prelude::*;

use lpkit_solver::plot;
use lpkit_solver::wire::{ProblemInput, SolutionOutput};
use lpkit_solver::{solve_lp_problem, LpProblem, Method, Solution, SolveError};

use crate::parser::Parser;
use crate::{parse_problem, ModelError};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn solve_to_output(problem: Result<LpProblem, SolveError>, method: &str) -> SolutionOutput {
    let solution = match problem {
        Ok(problem) => solve_lp_problem(&problem, Method::from_name_or_default(method)),
        Err(e) => Solution::failed(e.status(), None),
    };
    SolutionOutput::from(&solution)
}

/// Solve a problem record; unknown method names use the graphical method
#[wasm_bindgen]
pub fn solve(problem: JsValue, method: &str) -> Result<JsValue, JsValue> {
    let input: ProblemInput =
        serde_wasm_bindgen::from_value(problem).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&solve_to_output(LpProblem::try_from(input), method))
}

/// Parse, compile and solve a text model
#[wasm_bindgen]
pub fn solve_model(source: &str, method: &str) -> Result<JsValue, JsValue> {
    let problem = parse_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&solve_to_output(Ok(problem), method))
}

/// Parse source code and return the AST as JSON
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let model = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&model)
}

/// Compile a text model into the problem record shape
#[wasm_bindgen]
pub fn compile(source: &str) -> Result<JsValue, JsValue> {
    let problem = parse_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&ProblemInput::from(&problem))
}

/// Validate source code and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    serde_wasm_bindgen::to_value(&diagnostics(source)).unwrap_or(JsValue::NULL)
}

/// Vertices of the feasible region of a two-variable problem record
#[wasm_bindgen]
pub fn feasible_region(problem: JsValue) -> Result<JsValue, JsValue> {
    let input: ProblemInput =
        serde_wasm_bindgen::from_value(problem).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let problem = LpProblem::try_from(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&plot::feasible_region(&problem.normalized()))
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub start: usize,
    pub end: usize,
    pub severity: String,
    pub message: String,
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    match parse_problem(source) {
        Ok(_) => Vec::new(),
        Err(e) => {
            let span = e.span();
            vec![Diagnostic {
                start: span.map(|s| s.start).unwrap_or(0),
                end: span.map(|s| s.end).unwrap_or(source.len()),
                severity: "error".to_string(),
                message: match &e {
                    ModelError::Parse(e) => format!("Syntax error: {}", e),
                    ModelError::Compile(e) => e.to_string(),
                },
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics() {
        assert!(diagnostics("max: x\nx <= 1").is_empty());

        let found = diagnostics("max: x\nmax: y");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (7, 13));
        assert_eq!(found[0].message, "Only one objective is allowed");

        let found = diagnostics("max: x +");
        assert_eq!((found[0].start, found[0].end), (0, 8));
        assert_eq!(found[0].message, "Syntax error: Unexpected end of file");
    }

    #[test]
    fn test_solve_to_output() {
        let problem = parse_problem("max: 3x1 + 2x2\n2x1 + x2 <= 10\nx1 + 2x2 <= 8").unwrap();
        let output = solve_to_output(Ok(problem), "simplex");
        assert!(output.is_valid);
        assert_eq!(output.method, Some(Method::Graphical));

        let output = solve_to_output(Err(SolveError::EmptyObjective), "simplex");
        assert!(!output.is_valid);
        assert!(output.coordinates.is_empty());
    }
}
