use std::str::Chars;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Max,
    Min,

    // Literals
    Ident,
    Number,

    // Operators
    Plus,
    Minus,
    Star,
    Le,
    Ge,
    Eq,

    // Delimiters
    Colon,
    Semicolon,

    // Special
    Newline,
    Comment,
    Eof,
    Error,
}

impl TokenKind {
    /// Short human readable name used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Max | TokenKind::Min => "objective keyword",
            TokenKind::Ident => "variable",
            TokenKind::Number => "number",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::Eq => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Newline => "end of line",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid character",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    fn line_comment(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // first /
        self.advance(); // second /
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.token_from(TokenKind::Comment, start)
    }

    fn block_comment(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek() {
                Some('*') => {
                    self.advance();
                    if self.peek() == Some('/') {
                        self.advance();
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => break, // Unterminated comment
            }
        }
        self.token_from(TokenKind::Comment, start)
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;

        // Optional negative
        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // Decimal part only when a digit follows the dot
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.token_from(TokenKind::Number, start)
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let kind = match text.to_ascii_lowercase().as_str() {
            "max" | "maximize" | "maximise" => TokenKind::Max,
            "min" | "minimize" | "minimise" => TokenKind::Min,
            _ => TokenKind::Ident,
        };
        Token::new(kind, Span::new(start, self.pos), text)
    }

    /// Consume the current char, then `second` if it follows
    fn operator(&mut self, kind: TokenKind, second: char) -> Option<Token> {
        let start = self.pos;
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            return Some(self.token_from(kind, start));
        }
        None
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '\n' => {
                self.advance();
                Token::new(TokenKind::Newline, Span::new(start, self.pos), "\n")
            }
            '/' => match self.peek_next() {
                Some('/') => self.line_comment(),
                Some('*') => self.block_comment(),
                _ => {
                    self.advance();
                    self.token_from(TokenKind::Error, start)
                }
            },
            '+' => {
                self.advance();
                self.token_from(TokenKind::Plus, start)
            }
            '-' => {
                // Could be negative number or minus operator
                if self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    return self.read_number();
                }
                self.advance();
                self.token_from(TokenKind::Minus, start)
            }
            '*' => {
                self.advance();
                self.token_from(TokenKind::Star, start)
            }
            ':' => {
                self.advance();
                self.token_from(TokenKind::Colon, start)
            }
            ';' => {
                self.advance();
                self.token_from(TokenKind::Semicolon, start)
            }
            '≤' => {
                self.advance();
                self.token_from(TokenKind::Le, start)
            }
            '≥' => {
                self.advance();
                self.token_from(TokenKind::Ge, start)
            }
            '<' => self
                .operator(TokenKind::Le, '=')
                .unwrap_or_else(|| self.token_from(TokenKind::Error, start)),
            '>' => self
                .operator(TokenKind::Ge, '=')
                .unwrap_or_else(|| self.token_from(TokenKind::Error, start)),
            '=' => self
                .operator(TokenKind::Eq, '=')
                .unwrap_or_else(|| self.token_from(TokenKind::Eq, start)),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_ident(),
            _ => {
                self.advance();
                self.token_from(TokenKind::Error, start)
            }
        }
    }
}
