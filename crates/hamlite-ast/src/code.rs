//! Recursive descent parser for `-` code lines.
//!
//! ```text
//! line       := assignment | range
//! assignment := IDENT ':=' expr
//! range      := 'for' bind (',' bind)? ':=' 'range' path
//! expr       := STRING | INT | FLOAT | path
//! path       := IDENT ('.' IDENT)*
//! ```

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::{Expr, Literal, ParseError, Path};

/// A parsed code line, before it is given a depth and location.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeLine {
    Assignment {
        name: String,
        value: Expr,
    },
    Range {
        key: Option<String>,
        value: Option<String>,
        collection: Path,
    },
}

/// Parse the text after a `-` sigil; `column` is where that text starts.
pub fn parse(source: &str, line: usize, column: usize) -> Result<CodeLine, ParseError> {
    let tokens = Lexer::new(source, line, column).tokenize()?;
    CodeParser::new(tokens, line).parse()
}

struct CodeParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
    eof: Token,
}

impl CodeParser {
    fn new(tokens: Vec<Token>, line: usize) -> Self {
        let eof = tokens
            .last()
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, 0));
        Self {
            tokens,
            pos: 0,
            line,
            eof,
        }
    }

    fn parse(&mut self) -> Result<CodeLine, ParseError> {
        let code = match self.current_kind() {
            TokenKind::KwFor => self.parse_range()?,
            TokenKind::Ident(_) => self.parse_assignment()?,
            _ => return self.unexpected_token("'for' or an identifier"),
        };
        self.consume(&TokenKind::Eof)?;
        Ok(code)
    }

    fn parse_assignment(&mut self) -> Result<CodeLine, ParseError> {
        let name = self.parse_identifier()?;
        self.consume(&TokenKind::Define)?;
        let value = self.parse_expr()?;
        Ok(CodeLine::Assignment { name, value })
    }

    fn parse_range(&mut self) -> Result<CodeLine, ParseError> {
        self.consume(&TokenKind::KwFor)?;
        let key = self.parse_identifier()?;
        let value = if matches!(self.current_kind(), TokenKind::Comma) {
            self.advance_token();
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.consume(&TokenKind::Define)?;
        self.consume(&TokenKind::KwRange)?;
        let collection = self.parse_path()?;

        Ok(CodeLine::Range {
            key: binding(key),
            value: value.and_then(binding),
            collection,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let literal = match self.current_kind() {
            TokenKind::Str(s) => Literal::String(s.clone()),
            TokenKind::Int(n) => Literal::Int(*n),
            TokenKind::Float(n) => Literal::Float(*n),
            TokenKind::Ident(_) => return self.parse_path().map(Expr::Lookup),
            _ => return self.unexpected_token("a literal or a lookup"),
        };
        self.advance_token();
        Ok(Expr::Literal(literal))
    }

    fn parse_path(&mut self) -> Result<Path, ParseError> {
        let mut segments = vec![self.parse_identifier()?];
        while matches!(self.current_kind(), TokenKind::Dot) {
            self.advance_token();
            segments.push(self.parse_identifier()?);
        }
        Ok(Path::new(segments))
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance_token();
                Ok(name)
            }
            _ => self.unexpected_token("an identifier"),
        }
    }

    fn consume(&mut self, expected: &TokenKind) -> Result<(), ParseError> {
        if self.current_kind() == expected {
            self.advance_token();
            Ok(())
        } else {
            self.unexpected_token(&expected.to_string())
        }
    }

    fn unexpected_token<T>(&self, expected: &str) -> Result<T, ParseError> {
        let token = self.current_token();
        Err(ParseError::Code {
            message: format!("expected {expected}, found {}", token.kind),
            line: self.line,
            column: token.column,
        })
    }

    fn current_token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current_token().kind
    }

    fn advance_token(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }
}

fn binding(name: String) -> Option<String> {
    (name != "_").then_some(name)
}
