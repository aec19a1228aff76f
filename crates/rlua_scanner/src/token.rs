//! Token kinds and the token record produced by the scanner.

use rlua_core::text::TextSpan;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

/// The closed set of token kinds.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    Eof, Illegal,
    // Identifiers and literals
    Ident, Number, String,
    // Operators
    Assign, Plus, Minus, Asterisk, Slash, Modulo, Power, Concat,
    Eq, NotEq, Lt, Lte, Gt, Gte, Hash,
    // Delimiters
    Comma, Semicolon, Colon, Dot,
    LParen, RParen, LBrace, RBrace, LBracket, RBracket,
    // Keywords
    And, Break, Do, Else, ElseIf, End, False, For, Function, If, In, Local,
    Nil, Not, Or, Repeat, Return, Then, True, Until, While,
}

impl TokenKind {
    /// Canonical display name: the fixed lexeme for operators, delimiters and
    /// keywords, an upper-case tag for everything else.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",

            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Modulo => "%",
            TokenKind::Power => "^",
            TokenKind::Concat => "..",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "~=",
            TokenKind::Lt => "<",
            TokenKind::Lte => "<=",
            TokenKind::Gt => ">",
            TokenKind::Gte => ">=",
            TokenKind::Hash => "#",

            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",

            TokenKind::And => "and",
            TokenKind::Break => "break",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::ElseIf => "elseif",
            TokenKind::End => "end",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Local => "local",
            TokenKind::Nil => "nil",
            TokenKind::Not => "not",
            TokenKind::Or => "or",
            TokenKind::Repeat => "repeat",
            TokenKind::Return => "return",
            TokenKind::Then => "then",
            TokenKind::True => "true",
            TokenKind::Until => "until",
            TokenKind::While => "while",
        }
    }

    pub fn is_keyword(self) -> bool {
        (TokenKind::And as u8..=TokenKind::While as u8).contains(&(self as u8))
    }

    pub fn is_operator(self) -> bool {
        (TokenKind::Assign as u8..=TokenKind::Hash as u8).contains(&(self as u8))
    }

    pub fn is_delimiter(self) -> bool {
        (TokenKind::Comma as u8..=TokenKind::RBracket as u8).contains(&(self as u8))
    }

    /// Whether the kind carries source-dependent text (identifier, number or string).
    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::Number | TokenKind::String)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every keyword spelling and the kind it resolves to.
pub const KEYWORDS: [(&str, TokenKind); 21] = [
    ("and", TokenKind::And),
    ("break", TokenKind::Break),
    ("do", TokenKind::Do),
    ("else", TokenKind::Else),
    ("elseif", TokenKind::ElseIf),
    ("end", TokenKind::End),
    ("false", TokenKind::False),
    ("for", TokenKind::For),
    ("function", TokenKind::Function),
    ("if", TokenKind::If),
    ("in", TokenKind::In),
    ("local", TokenKind::Local),
    ("nil", TokenKind::Nil),
    ("not", TokenKind::Not),
    ("or", TokenKind::Or),
    ("repeat", TokenKind::Repeat),
    ("return", TokenKind::Return),
    ("then", TokenKind::Then),
    ("true", TokenKind::True),
    ("until", TokenKind::Until),
    ("while", TokenKind::While),
];

fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| KEYWORDS.iter().copied().collect())
}

/// Resolve an identifier's text to its keyword kind, or `Ident` if it is not
/// a keyword. Matching is exact and case-sensitive.
pub fn lookup_ident(text: &str) -> TokenKind {
    keyword_table()
        .get(text)
        .copied()
        .unwrap_or(TokenKind::Ident)
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Decoded text: unescaped content for strings, raw text for numbers,
    /// the lexeme for everything else, empty for `Eof`.
    pub literal: String,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// Column tracker value at the token's first character (1-based within the line).
    pub column: u32,
    /// Bytes of the whole lexeme, quotes and brackets included.
    pub span: TextSpan,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line: 0,
            column: 0,
            span: TextSpan::default(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = span;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Type:{} Literal:{} Line:{} Column:{}}}",
            self.kind, self.literal, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_keywords() {
        for (text, kind) in KEYWORDS {
            assert_eq!(lookup_ident(text), kind);
            assert_eq!(kind.as_str(), text);
            assert!(kind.is_keyword());
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup_ident("And"), TokenKind::Ident);
        assert_eq!(lookup_ident("LOCAL"), TokenKind::Ident);
        assert_eq!(lookup_ident("locals"), TokenKind::Ident);
        assert_eq!(lookup_ident("_end"), TokenKind::Ident);
    }

    #[test]
    fn test_kind_groups_are_disjoint() {
        for kind in [TokenKind::Concat, TokenKind::Hash, TokenKind::Assign] {
            assert!(kind.is_operator());
            assert!(!kind.is_delimiter() && !kind.is_keyword());
        }
        for kind in [TokenKind::Comma, TokenKind::Dot, TokenKind::RBracket] {
            assert!(kind.is_delimiter());
            assert!(!kind.is_operator() && !kind.is_keyword());
        }
        assert!(TokenKind::Number.is_literal());
        assert!(!TokenKind::Eof.is_literal());
        assert!(!TokenKind::Illegal.is_operator());
    }

    #[test]
    fn test_token_display() {
        let tok = Token::new(TokenKind::Local, "local").at(3, 5);
        assert_eq!(tok.to_string(), "{Type:local Literal:local Line:3 Column:5}");

        let eof = Token::new(TokenKind::Eof, "").at(1, 1);
        assert_eq!(eof.to_string(), "{Type:EOF Literal: Line:1 Column:1}");
        assert!(eof.is_eof());
    }
}
