pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

use lpkit_solver::LpProblem;
use thiserror::Error;

pub use ast::*;
pub use compiler::{CompileError, Compiler};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ModelError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ModelError::Parse(e) => e.span(),
            ModelError::Compile(e) => Some(e.span()),
        }
    }
}

/// Parse and compile a text model in one step
pub fn parse_problem(source: &str) -> Result<LpProblem, ModelError> {
    let model = Parser::parse(source)?;
    Ok(Compiler::new().compile(&model)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_problem_reports_both_stages() {
        let problem = parse_problem("min: x1 + x2\nx1 + x2 >= 4").unwrap();
        assert_eq!(problem.num_variables(), 2);

        let err = parse_problem("max: x1 +").unwrap_err();
        assert_eq!(err, ModelError::Parse(ParseError::UnexpectedEof));
        assert_eq!(err.span(), None);

        let err = parse_problem("x1 <= 4").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(0, 7)));
        assert_eq!(err.to_string(), "Model must start with a max or min objective");
    }
}
