/// Token kinds of the embedded control-flow grammar (`- ...` lines)
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (a single path segment)
    Ident(String),
    /// Quoted string literal, escapes already applied
    Str(String),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),

    /// Dot symbol .
    Dot,
    /// Comma symbol ,
    Comma,
    /// Short variable declaration :=
    Define,

    /// Keyword: for
    KwFor,
    /// Keyword: range
    KwRange,

    /// End of line
    Eof,
}

/// A token with its 1-based column within the source line
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, column: usize) -> Self {
        Self { kind, column }
    }
}

/// Try to convert a string to a keyword token kind
pub fn to_keyword(s: &str) -> Option<TokenKind> {
    match s {
        "for" => Some(TokenKind::KwFor),
        "range" => Some(TokenKind::KwRange),
        _ => None,
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "identifier '{s}'"),
            TokenKind::Str(s) => write!(f, "string {s:?}"),
            TokenKind::Int(n) => write!(f, "integer {n}"),
            TokenKind::Float(n) => write!(f, "float {n}"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Define => f.write_str("':='"),
            TokenKind::KwFor => f.write_str("'for'"),
            TokenKind::KwRange => f.write_str("'range'"),
            TokenKind::Eof => f.write_str("end of line"),
        }
    }
}
