use lpkit_solver::{ConstraintOp, Sense};

use crate::lexer::Span;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub statements: Vec<Statement>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Objective(ObjectiveDecl),
    Constraint(ConstraintDecl),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Objective(o) => o.span,
            Statement::Constraint(c) => c.span,
        }
    }
}

/// `max: 3x1 + 2x2`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveDecl {
    pub span: Span,
    pub sense: Sense,
    pub terms: Vec<Term>,
}

/// `c1: 2x1 + x2 <= 10`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDecl {
    pub span: Span,
    pub name: Option<String>,
    pub terms: Vec<Term>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

/// A signed coefficient with an optional variable; `None` is a constant
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub span: Span,
    pub coefficient: f64,
    pub variable: Option<String>,
}

impl Term {
    pub fn is_constant(&self) -> bool {
        self.variable.is_none()
    }
}
