//! Tokens produced by the lexer.

use crate::{Name, Span};
use std::fmt;

/// How a string literal was written. Decoded text is the same for all
/// styles; the parser only needs the style to reject text blocks where a
/// plain literal is required.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StrStyle {
    Double,
    Single,
    VerbatimDouble,
    VerbatimSingle,
    TextBlock,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    Ident(Name),
    Number(f64),
    Str(String, StrStyle),

    // Keywords
    Assert,
    Else,
    Error,
    False,
    For,
    Function,
    If,
    Import,
    ImportStr,
    ImportBin,
    In,
    Local,
    Null,
    TailStrict,
    Then,
    SelfKw,
    Super,
    True,

    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Dollar,
    Colon,
    ColonColon,
    ColonColonColon,
    PlusColon,
    PlusColonColon,
    PlusColonColonColon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    Shl,
    Shr,
    Amp,
    Caret,
    Pipe,
    AmpAmp,
    PipePipe,
    Bang,
    Tilde,
    Eq,

    Eof,
}

impl TokenKind {
    /// Fixed spelling of keyword and punctuation tokens.
    pub fn as_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Ident(_) | TokenKind::Number(_) | TokenKind::Str(..) | TokenKind::Eof => {
                return None
            }
            TokenKind::Assert => "assert",
            TokenKind::Else => "else",
            TokenKind::Error => "error",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::ImportStr => "importstr",
            TokenKind::ImportBin => "importbin",
            TokenKind::In => "in",
            TokenKind::Local => "local",
            TokenKind::Null => "null",
            TokenKind::TailStrict => "tailstrict",
            TokenKind::Then => "then",
            TokenKind::SelfKw => "self",
            TokenKind::Super => "super",
            TokenKind::True => "true",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Dollar => "$",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::ColonColonColon => ":::",
            TokenKind::PlusColon => "+:",
            TokenKind::PlusColonColon => "+::",
            TokenKind::PlusColonColonColon => "+:::",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Amp => "&",
            TokenKind::Caret => "^",
            TokenKind::Pipe => "|",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Eq => "=",
        })
    }

    /// Short description for "expected X, got Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(_) => "identifier".to_string(),
            TokenKind::Number(_) => "number".to_string(),
            TokenKind::Str(..) => "string".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            other => format!("\"{}\"", other.as_str().unwrap_or("?")),
        }
    }

    /// Same variant, ignoring payloads.
    #[inline]
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output. Always terminated by a single [`TokenKind::Eof`].
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Local.describe(), "\"local\"");
        assert_eq!(TokenKind::PlusColonColon.describe(), "\"+::\"");
        assert_eq!(TokenKind::Eof.describe(), "end of file");
        assert_eq!(TokenKind::Number(1.5).describe(), "number");
    }

    #[test]
    fn test_same_kind_ignores_payload() {
        let a = TokenKind::Str("a".into(), StrStyle::Double);
        let b = TokenKind::Str("b".into(), StrStyle::TextBlock);
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&TokenKind::Comma));
    }
}
