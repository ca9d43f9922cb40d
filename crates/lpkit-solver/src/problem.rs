use crate::error::SolveError;

/// Represents a linear programming problem over non-negative variables
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Variable names, used for display only
    pub variables: Vec<String>,
    /// Objective function
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
    /// Optional `+`/`-` toggles supplied by a form layer
    pub operators: SignOperators,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to maximize or minimize
    pub sense: Sense,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Max,
    Min,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for display)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<=", alias = "≤"))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">=", alias = "≥"))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl ConstraintOp {
    /// Whether `lhs op rhs` holds within an absolute tolerance
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ConstraintOp::Le => lhs <= rhs + tolerance,
            ConstraintOp::Ge => lhs >= rhs - tolerance,
            ConstraintOp::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }

    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "≤",
            ConstraintOp::Ge => "≥",
            ConstraintOp::Eq => "=",
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOperator {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Plus,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Minus,
}

/// Sign toggles for the objective row and each constraint row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignOperators {
    pub objective: Option<SignOperator>,
    /// Ignored unless there is exactly one entry per constraint
    pub constraints: Option<Vec<SignOperator>>,
}

impl SignOperator {
    /// `Minus` keeps the first coefficient and forces every other one negative.
    pub fn apply(self, coefficients: &[f64]) -> Vec<f64> {
        match self {
            SignOperator::Plus => coefficients.to_vec(),
            SignOperator::Minus => coefficients
                .iter()
                .enumerate()
                .map(|(j, &c)| if j == 0 { c } else { -c.abs() })
                .collect(),
        }
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                sense: Sense::Max,
            },
            constraints: Vec::new(),
            operators: SignOperators::default(),
        }
    }

    /// Create a problem whose variables are named `x1..xn`
    pub fn with_dimension(n: usize) -> Self {
        Self::new((1..=n).map(|i| format!("x{i}")).collect())
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, sense: Sense) {
        self.objective = Objective { coefficients, sense };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Name of variable `j`, falling back to `x{j+1}`
    pub fn variable_name(&self, j: usize) -> String {
        self.variables
            .get(j)
            .cloned()
            .unwrap_or_else(|| format!("x{}", j + 1))
    }

    /// Evaluate the objective at a point
    pub fn objective_at(&self, point: &[f64]) -> f64 {
        dot(&self.objective.coefficients, point)
    }

    /// Check dimensions and finiteness of every number
    pub fn validate(&self) -> Result<(), SolveError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(SolveError::EmptyObjective);
        }
        if self.objective.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(SolveError::NonFinite {
                location: "objective".to_string(),
            });
        }
        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(SolveError::DimensionMismatch {
                    constraint: c.name.clone(),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|x| !x.is_finite()) {
                return Err(SolveError::NonFinite {
                    location: c.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Apply the sign operators and return a problem without any
    pub fn normalized(&self) -> LpProblem {
        let mut problem = self.clone();
        if let Some(op) = self.operators.objective {
            problem.objective.coefficients = op.apply(&self.objective.coefficients);
        }
        if let Some(ops) = &self.operators.constraints {
            if ops.len() == self.constraints.len() {
                for (constraint, op) in problem.constraints.iter_mut().zip(ops) {
                    constraint.coefficients = op.apply(&constraint.coefficients);
                }
            }
        }
        problem.operators = SignOperators::default();
        problem
    }

    /// Whether `point` satisfies every constraint and non-negativity
    pub fn is_satisfied_by(&self, point: &[f64], tolerance: f64) -> bool {
        point.len() == self.num_variables()
            && point.iter().all(|&v| v >= -tolerance)
            && self
                .constraints
                .iter()
                .all(|c| c.op.holds(dot(&c.coefficients, point), c.rhs, tolerance))
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
