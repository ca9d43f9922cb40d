use lpkit_solver::{ConstraintOp, Sense};
use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof | ParseError::InvalidNumber(_) => None,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Comments are dropped here; newlines stay significant
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Model, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_model()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Start of the current token
    fn start(&self) -> usize {
        self.current().map(|t| t.span.start).unwrap_or(0)
    }

    /// End of the last consumed token
    fn previous_end(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            None => ParseError::UnexpectedEof,
            Some(t) if t.kind == TokenKind::Eof => ParseError::UnexpectedEof,
            Some(t) => {
                let found = match t.kind {
                    TokenKind::Ident | TokenKind::Number | TokenKind::Error => format!("'{}'", t.text),
                    kind => kind.describe().to_string(),
                };
                ParseError::UnexpectedToken {
                    expected: expected.to_string(),
                    found,
                    span: t.span,
                }
            }
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek_kind() == kind {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(kind.describe()))
    }

    fn parse_model(&mut self) -> Result<Model, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_separators();
            if self.peek_kind() == TokenKind::Eof {
                break;
            }
            statements.push(self.parse_statement()?);
            self.end_statement()?;
        }

        Ok(Model { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek_kind() {
            TokenKind::Max | TokenKind::Min => Ok(Statement::Objective(self.parse_objective()?)),
            _ => Ok(Statement::Constraint(self.parse_constraint()?)),
        }
    }

    fn end_statement(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of statement")),
        }
    }

    fn parse_objective(&mut self) -> Result<ObjectiveDecl, ParseError> {
        let start = self.start();
        let sense = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Min) => Sense::Min,
            _ => Sense::Max,
        };
        if self.peek_kind() == TokenKind::Colon {
            self.advance();
        }
        let terms = self.parse_terms()?;

        Ok(ObjectiveDecl {
            span: Span::new(start, self.previous_end()),
            sense,
            terms,
        })
    }

    fn parse_constraint(&mut self) -> Result<ConstraintDecl, ParseError> {
        let start = self.start();

        let mut name = None;
        if self.peek_kind() == TokenKind::Ident && self.peek_kind_at(1) == TokenKind::Colon {
            name = self.advance().map(|t| t.text);
            self.advance();
        }

        let terms = self.parse_terms()?;
        let op = match self.peek_kind() {
            TokenKind::Le => ConstraintOp::Le,
            TokenKind::Ge => ConstraintOp::Ge,
            TokenKind::Eq => ConstraintOp::Eq,
            _ => return Err(self.unexpected("'<=', '>=' or '='")),
        };
        self.advance();
        let rhs = self.parse_signed_number()?;

        Ok(ConstraintDecl {
            span: Span::new(start, self.previous_end()),
            name,
            terms,
            op,
            rhs,
        })
    }

    /// A possibly empty sum of terms
    fn parse_terms(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut terms = Vec::new();

        loop {
            let start = self.start();
            let mut sign = 1.0;
            let mut signed = false;
            match self.peek_kind() {
                TokenKind::Plus => {
                    self.advance();
                    signed = true;
                }
                TokenKind::Minus => {
                    self.advance();
                    sign = -1.0;
                    signed = true;
                }
                // `3x1 -2x2` lexes the sign into the number
                TokenKind::Number if !terms.is_empty() => {
                    let glued = self.current().is_some_and(|t| t.text.starts_with('-'));
                    if !glued {
                        break;
                    }
                }
                _ if terms.is_empty() => {}
                _ => break,
            }

            match self.peek_kind() {
                TokenKind::Number | TokenKind::Ident => terms.push(self.parse_term(sign, start)?),
                _ if terms.is_empty() && !signed => break,
                _ => return Err(self.unexpected("number or variable")),
            }
        }

        Ok(terms)
    }

    fn parse_term(&mut self, sign: f64, start: usize) -> Result<Term, ParseError> {
        let mut coefficient = sign;
        if self.peek_kind() == TokenKind::Number {
            coefficient *= self.parse_number()?;
            match self.peek_kind() {
                TokenKind::Star => {
                    self.advance();
                }
                TokenKind::Ident => {}
                _ => {
                    return Ok(Term {
                        span: Span::new(start, self.previous_end()),
                        coefficient,
                        variable: None,
                    });
                }
            }
        }

        let variable = self.expect(TokenKind::Ident)?;
        Ok(Term {
            span: Span::new(start, variable.span.end),
            coefficient,
            variable: Some(variable.text),
        })
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let token = self.expect(TokenKind::Number)?;
        token
            .text
            .parse()
            .map_err(|_| ParseError::InvalidNumber(token.text.clone()))
    }

    fn parse_signed_number(&mut self) -> Result<f64, ParseError> {
        let sign = match self.peek_kind() {
            TokenKind::Plus => {
                self.advance();
                1.0
            }
            TokenKind::Minus => {
                self.advance();
                -1.0
            }
            _ => 1.0,
        };
        if self.peek_kind() != TokenKind::Number {
            return Err(self.unexpected("number"));
        }
        Ok(sign * self.parse_number()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTBOOK: &str = r#"
        // classic two variable model
        max: 3x1 + 2x2
        c1: 2x1 + x2 <= 10
        x1 + 2*x2 <= 8
    "#;

    fn constraint(statement: &Statement) -> &ConstraintDecl {
        match statement {
            Statement::Constraint(c) => c,
            other => panic!("Expected constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_model() {
        let model = Parser::parse(TEXTBOOK).unwrap();
        assert_eq!(model.statements.len(), 3);

        match &model.statements[0] {
            Statement::Objective(o) => {
                assert_eq!(o.sense, Sense::Max);
                assert_eq!(o.terms.len(), 2);
                assert_eq!(o.terms[0].coefficient, 3.0);
                assert_eq!(o.terms[1].variable.as_deref(), Some("x2"));
            }
            _ => panic!("Expected objective"),
        }

        let c1 = constraint(&model.statements[1]);
        assert_eq!(c1.name.as_deref(), Some("c1"));
        assert_eq!(c1.op, ConstraintOp::Le);
        assert_eq!(c1.rhs, 10.0);

        let c2 = constraint(&model.statements[2]);
        assert_eq!(c2.name, None);
        assert_eq!(c2.terms[1].coefficient, 2.0);
        assert_eq!(c2.terms[1].variable.as_deref(), Some("x2"));
    }

    #[test]
    fn test_signs_and_constants() {
        let model = Parser::parse("minimize x - 2y\n-x -3.5y + 4 >= -2; y = 1").unwrap();
        assert_eq!(model.statements.len(), 3);

        match &model.statements[0] {
            Statement::Objective(o) => {
                assert_eq!(o.sense, Sense::Min);
                assert_eq!(o.terms[1].coefficient, -2.0);
            }
            _ => panic!("Expected objective"),
        }

        let c = constraint(&model.statements[1]);
        let coefficients: Vec<f64> = c.terms.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![-1.0, -3.5, 4.0]);
        assert!(c.terms[2].is_constant());
        assert_eq!(c.op, ConstraintOp::Ge);
        assert_eq!(c.rhs, -2.0);

        let eq = constraint(&model.statements[2]);
        assert_eq!(eq.op, ConstraintOp::Eq);
    }

    #[test]
    fn test_spans() {
        let model = Parser::parse("max: x1\nc1: 2x1 <= 4").unwrap();
        assert_eq!(model.statements[0].span(), Span::new(0, 7));

        let c = constraint(&model.statements[1]);
        assert_eq!(c.span, Span::new(8, 20));
        assert_eq!(c.terms[0].span, Span::new(12, 15));
    }

    #[test]
    fn test_missing_operator() {
        let err = Parser::parse("max: x1\nx1 + x2 10").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, span } => {
                assert_eq!(expected, "'<=', '>=' or '='");
                assert_eq!(found, "'10'");
                assert_eq!(span, Span::new(16, 18));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_dangling_operator() {
        assert_eq!(Parser::parse("max: 3x1 +"), Err(ParseError::UnexpectedEof));
        assert_eq!(Parser::parse("max: x1\nx1 <="), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn test_two_statements_on_one_line() {
        let err = Parser::parse("max: x1 x2 <= 4").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }), "got {:?}", err);

        let model = Parser::parse("max: x1; x1 <= 4;").unwrap();
        assert_eq!(model.statements.len(), 2);
    }
}
