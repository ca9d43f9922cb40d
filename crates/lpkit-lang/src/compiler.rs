use std::collections::{HashMap, HashSet};

use lpkit_solver::LpProblem;
use thiserror::Error;

use crate::ast::*;
use crate::lexer::Span;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Model must start with a max or min objective")]
    MissingObjective(Span),
    #[error("Only one objective is allowed")]
    DuplicateObjective(Span),
    #[error("Duplicate constraint name: {name}")]
    DuplicateConstraint { name: String, span: Span },
    #[error("Constant term not allowed in objective")]
    ConstantInObjective(Span),
    #[error("Objective has no variables")]
    EmptyObjective(Span),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::MissingObjective(span)
            | CompileError::DuplicateObjective(span)
            | CompileError::ConstantInObjective(span)
            | CompileError::EmptyObjective(span) => *span,
            CompileError::DuplicateConstraint { span, .. } => *span,
        }
    }
}

/// Turns a parsed model into an `LpProblem`.
///
/// Variables are numbered in order of first appearance, objective first.
#[derive(Debug, Default)]
pub struct Compiler {
    variables: Vec<String>,
    index: HashMap<String, usize>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(mut self, model: &Model) -> Result<LpProblem, CompileError> {
        let mut statements = model.statements.iter();

        let objective = match statements.next() {
            Some(Statement::Objective(o)) => o,
            Some(other) => return Err(CompileError::MissingObjective(other.span())),
            None => return Err(CompileError::MissingObjective(Span::new(0, 0))),
        };
        if let Some(constant) = objective.terms.iter().find(|t| t.is_constant()) {
            return Err(CompileError::ConstantInObjective(constant.span));
        }
        if objective.terms.is_empty() {
            return Err(CompileError::EmptyObjective(objective.span));
        }
        self.register(&objective.terms);

        let mut constraints: Vec<(String, &ConstraintDecl)> = Vec::new();
        let mut names = HashSet::new();
        for statement in statements {
            match statement {
                Statement::Objective(o) => return Err(CompileError::DuplicateObjective(o.span)),
                Statement::Constraint(c) => {
                    let name = c
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("c{}", constraints.len() + 1));
                    if !names.insert(name.clone()) {
                        return Err(CompileError::DuplicateConstraint { name, span: c.span });
                    }
                    self.register(&c.terms);
                    constraints.push((name, c));
                }
            }
        }

        let mut problem = LpProblem::new(self.variables.clone());
        let (coefficients, _) = self.row(&objective.terms);
        problem.set_objective(coefficients, objective.sense);
        for (name, c) in constraints {
            let (coefficients, constant) = self.row(&c.terms);
            problem.add_constraint(name, coefficients, c.op, c.rhs - constant);
        }
        Ok(problem)
    }

    fn register(&mut self, terms: &[Term]) {
        for name in terms.iter().filter_map(|t| t.variable.as_ref()) {
            if !self.index.contains_key(name) {
                self.index.insert(name.clone(), self.variables.len());
                self.variables.push(name.clone());
            }
        }
    }

    /// Dense coefficients plus the sum of constant terms
    fn row(&self, terms: &[Term]) -> (Vec<f64>, f64) {
        let mut coefficients = vec![0.0; self.variables.len()];
        let mut constant = 0.0;
        for term in terms {
            match term.variable.as_ref().and_then(|v| self.index.get(v)) {
                Some(&j) => coefficients[j] += term.coefficient,
                None => constant += term.coefficient,
            }
        }
        (coefficients, constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use lpkit_solver::{solve_lp_problem, ConstraintOp, Method, Sense, SolutionStatus};

    fn compile(source: &str) -> Result<LpProblem, CompileError> {
        let model = Parser::parse(source).unwrap();
        Compiler::new().compile(&model)
    }

    #[test]
    fn test_compile_simple_model() {
        let problem = compile(
            r#"
            max: 3x1 + 2x2
            c1: 2x1 + x2 <= 10
            x1 + 2*x2 <= 8
            "#,
        )
        .unwrap();

        assert_eq!(problem.variables, vec!["x1", "x2"]);
        assert_eq!(problem.objective.coefficients, vec![3.0, 2.0]);
        assert_eq!(problem.objective.sense, Sense::Max);
        assert_eq!(problem.constraints[0].name, "c1");
        assert_eq!(problem.constraints[1].name, "c2");
        assert_eq!(problem.constraints[1].coefficients, vec![1.0, 2.0]);
    }

    #[test]
    fn test_compile_and_solve() {
        let problem = compile("max: 3x1 + 2x2\n2x1 + x2 <= 10\nx1 + 2x2 <= 8").unwrap();
        let solution = solve_lp_problem(&problem, Method::Graphical);

        println!("Status: {:?}", solution.status);
        println!("Coordinates: {:?}", solution.coordinates);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.value - 16.0).abs() < 1e-9, "got {}", solution.value);
    }

    #[test]
    fn test_demo_models() {
        let textbook = compile(include_str!("../../../demos/textbook.lp")).unwrap();
        assert_eq!(textbook.constraints[0].name, "machine_a");
        let solution = solve_lp_problem(&textbook, Method::Simplex);
        assert!((solution.value - 16.0).abs() < 1e-9, "got {}", solution.value);

        let diet = compile(include_str!("../../../demos/diet.lp")).unwrap();
        assert_eq!(diet.num_variables(), 3);
        assert_eq!(diet.constraints[2].name, "c3");
        let solution = solve_lp_problem(&diet, Method::Simplex);
        println!("{}", solution.table);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.value - 7.0).abs() < 1e-9, "got {}", solution.value);
        assert!(diet.is_satisfied_by(&solution.coordinates, 1e-9));
    }

    #[test]
    fn test_variables_in_order_of_appearance() {
        let problem = compile("min: b + a\nsupply: c + a - a + 2b >= 3").unwrap();
        assert_eq!(problem.variables, vec!["b", "a", "c"]);
        assert_eq!(problem.objective.coefficients, vec![1.0, 1.0, 0.0]);
        // a - a cancels, c only appears in the constraint
        assert_eq!(problem.constraints[0].coefficients, vec![2.0, 0.0, 1.0]);
        assert_eq!(problem.constraints[0].op, ConstraintOp::Ge);
    }

    #[test]
    fn test_constants_move_to_rhs() {
        let problem = compile("max: x\nx + 4 - 1 <= 10").unwrap();
        assert_eq!(problem.constraints[0].rhs, 7.0);
    }

    #[test]
    fn test_objective_errors() {
        assert_eq!(
            compile("x <= 4\nmax: x"),
            Err(CompileError::MissingObjective(Span::new(0, 6)))
        );
        assert_eq!(compile(""), Err(CompileError::MissingObjective(Span::new(0, 0))));
        assert!(matches!(
            compile("max: x\nmin: x"),
            Err(CompileError::DuplicateObjective(_))
        ));
        assert!(matches!(
            compile("max: x + 5"),
            Err(CompileError::ConstantInObjective(_))
        ));
        assert_eq!(compile("max:"), Err(CompileError::EmptyObjective(Span::new(0, 4))));
    }

    #[test]
    fn test_duplicate_constraint_names() {
        let err = compile("max: x\nc2: x <= 1\nx <= 2").unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateConstraint {
                name: "c2".to_string(),
                span: Span::new(18, 24),
            }
        );
    }
}
