use crate::token::{to_keyword, Token, TokenKind};
use crate::ParseError;

/// Lexer for the code following a `-` sigil
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    /// Column of `chars[0]` within the full source line
    column_offset: usize,
}

impl Lexer {
    /// Create a new lexer for `source`, which starts at `column` on `line`
    pub fn new(source: &str, line: usize, column: usize) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line,
            column_offset: column,
        }
    }

    /// Tokenize the source and return a vector of tokens ending in `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(c) = self.current_char() else {
                break;
            };
            let column = self.column();

            match c {
                '.' if !self.peek_char().is_some_and(|n| n.is_ascii_digit()) => {
                    self.advance();
                    tokens.push(Token::new(TokenKind::Dot, column));
                }
                ',' => {
                    self.advance();
                    tokens.push(Token::new(TokenKind::Comma, column));
                }
                ':' if self.peek_char() == Some('=') => {
                    self.advance();
                    self.advance();
                    tokens.push(Token::new(TokenKind::Define, column));
                }
                '"' => tokens.push(self.tokenize_string()?),
                '`' => tokens.push(self.tokenize_raw_string()?),
                c if c.is_ascii_digit() || c == '-' || c == '.' => {
                    tokens.push(self.tokenize_number()?)
                }
                c if Self::is_ident_start(c) => tokens.push(self.tokenize_identifier()),
                c => return Err(self.error(format!("unexpected character '{c}'"), column)),
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.column()));
        Ok(tokens)
    }

    fn tokenize_identifier(&mut self) -> Token {
        let column = self.column();
        let mut value = String::new();

        while let Some(c) = self.current_char() {
            if Self::is_ident_cont(c) {
                value.push(self.advance());
            } else {
                break;
            }
        }

        let kind = to_keyword(&value).unwrap_or(TokenKind::Ident(value));
        Token::new(kind, column)
    }

    fn tokenize_string(&mut self) -> Result<Token, ParseError> {
        let column = self.column();
        self.advance(); // "
        let mut value = String::new();

        loop {
            match self.current_char() {
                None => return Err(self.error("unterminated string literal", column)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.current_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(other) => {
                            return Err(self.error(
                                format!("unknown escape sequence '\\{other}'"),
                                self.column(),
                            ))
                        }
                        None => return Err(self.error("unterminated string literal", column)),
                    };
                    self.advance();
                    value.push(escaped);
                }
                Some(_) => value.push(self.advance()),
            }
        }

        Ok(Token::new(TokenKind::Str(value), column))
    }

    fn tokenize_raw_string(&mut self) -> Result<Token, ParseError> {
        let column = self.column();
        self.advance(); // `
        let mut value = String::new();

        loop {
            match self.current_char() {
                None => return Err(self.error("unterminated raw string literal", column)),
                Some('`') => {
                    self.advance();
                    break;
                }
                Some(_) => value.push(self.advance()),
            }
        }

        Ok(Token::new(TokenKind::Str(value), column))
    }

    fn tokenize_number(&mut self) -> Result<Token, ParseError> {
        let column = self.column();
        let mut text = String::new();

        if self.current_char() == Some('-') {
            text.push(self.advance());
        }
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' {
                text.push(self.advance());
            } else if (c == '-' || c == '+') && text.ends_with(['e', 'E']) {
                text.push(self.advance());
            } else {
                break;
            }
        }

        let is_float = text.contains(['.', 'e', 'E']);
        let kind = if is_float {
            text.parse::<f64>().ok().map(TokenKind::Float)
        } else {
            text.parse::<i64>().ok().map(TokenKind::Int)
        };

        kind.map(|kind| Token::new(kind, column))
            .ok_or_else(|| self.error(format!("invalid number literal '{text}'"), column))
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn error(&self, message: impl Into<String>, column: usize) -> ParseError {
        ParseError::Code {
            message: message.into(),
            line: self.line,
            column,
        }
    }

    fn column(&self) -> usize {
        self.column_offset + self.pos
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let c = self.chars.get(self.pos).copied().unwrap_or_default();
        self.pos += 1;
        c
    }

    fn is_ident_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }

    fn is_ident_cont(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source, 1, 1)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_assignment_tokens() {
        assert_eq!(
            kinds("name := \"value\""),
            vec![
                TokenKind::Ident("name".to_string()),
                TokenKind::Define,
                TokenKind::Str("value".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_define_without_spaces() {
        assert_eq!(
            kinds("x:=3"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Define,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_range_keywords() {
        let tokens = kinds("for i, v := range items.all");
        assert_eq!(tokens[0], TokenKind::KwFor);
        assert_eq!(tokens[2], TokenKind::Comma);
        assert_eq!(tokens[5], TokenKind::KwRange);
        assert_eq!(tokens[7], TokenKind::Dot);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("2.75")[0], TokenKind::Float(2.75));
        assert_eq!(kinds("-2")[0], TokenKind::Int(-2));
        assert_eq!(kinds(".5")[0], TokenKind::Float(0.5));
        assert_eq!(kinds("1e3")[0], TokenKind::Float(1000.0));
    }

    #[test]
    fn test_string_escapes_and_raw() {
        assert_eq!(
            kinds(r#""a\"b""#)[0],
            TokenKind::Str("a\"b".to_string())
        );
        assert_eq!(kinds("`a\\nb`")[0], TokenKind::Str("a\\nb".to_string()));
    }

    #[test]
    fn test_columns_are_offset() {
        let tokens = Lexer::new("a := 1", 4, 3).tokenize().unwrap();
        assert_eq!(tokens[0].column, 3);
        assert_eq!(tokens[1].column, 5);
        assert_eq!(tokens[2].column, 8);
    }

    #[test]
    fn test_unterminated_string_error() {
        let err = Lexer::new("a := \"oops", 7, 2).tokenize().unwrap_err();
        match err {
            ParseError::Code { line, column, .. } => {
                assert_eq!(line, 7);
                assert_eq!(column, 7);
            }
            other => panic!("expected code error, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_character() {
        assert!(Lexer::new("a := @b", 1, 1).tokenize().is_err());
    }
}
