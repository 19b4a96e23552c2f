//! Raw logos tokens, before interning and keyword mapping.

use crate::strings::{block_comment, number, quoted, text_block, verbatim};
use crate::LexErrorKind;
use logos::Logos;

/// Error produced inside logos callbacks.
#[derive(Default, Debug, Clone, PartialEq)]
pub(crate) enum RawError {
    /// No token pattern matched.
    #[default]
    Unrecognized,
    Kind(LexErrorKind),
}

impl RawError {
    pub(crate) fn into_kind(self, slice: &str) -> LexErrorKind {
        match self {
            RawError::Unrecognized => {
                LexErrorKind::UnexpectedChar(slice.chars().next().unwrap_or('\0'))
            }
            RawError::Kind(kind) => kind,
        }
    }
}

impl From<LexErrorKind> for RawError {
    fn from(kind: LexErrorKind) -> Self {
        RawError::Kind(kind)
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    #[regex(r"(//|#)[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?", number)]
    Number(f64),
    #[token("\"", |lex| quoted(lex, '"'))]
    DoubleStr(String),
    #[token("'", |lex| quoted(lex, '\''))]
    SingleStr(String),
    #[token("@\"", |lex| verbatim(lex, '"'))]
    VerbatimDouble(String),
    #[token("@'", |lex| verbatim(lex, '\''))]
    VerbatimSingle(String),
    #[token("|||", text_block)]
    TextBlock(String),

    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*")]
    Ident,

    #[token("assert")]
    Assert,
    #[token("else")]
    Else,
    #[token("error")]
    Error,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("importstr")]
    ImportStr,
    #[token("importbin")]
    ImportBin,
    #[token("in")]
    In,
    #[token("local")]
    Local,
    #[token("null")]
    Null,
    #[token("tailstrict")]
    TailStrict,
    #[token("then")]
    Then,
    #[token("self")]
    SelfKw,
    #[token("super")]
    Super,
    #[token("true")]
    True,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("$")]
    Dollar,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(":::")]
    ColonColonColon,
    #[token("+:")]
    PlusColon,
    #[token("+::")]
    PlusColonColon,
    #[token("+:::")]
    PlusColonColonColon,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Amp,
    #[token("^")]
    Caret,
    #[token("|")]
    Pipe,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("=")]
    Assign,
}
