use jsonnet_diagnostic::ErrorCode;
use jsonnet_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unknown escape sequence in string literal: '\\{0}'")]
    InvalidEscape(char),
    #[error("\\u must be followed by 4 hexadecimal digits")]
    InvalidUnicodeEscape,
    #[error("number literal may not have a leading zero")]
    LeadingZero,
    #[error("couldn't lex number, junk after decimal point")]
    MissingFraction,
    #[error("couldn't lex number, junk after exponent")]
    MissingExponent,
    #[error("multi-line comment has no terminating */")]
    UnterminatedComment,
    #[error("text block syntax requires new line after |||")]
    TextBlockNewline,
    #[error("text block's first line must start with whitespace")]
    TextBlockIndent,
    #[error("text block not terminated with |||")]
    TextBlockUnterminated,
    #[error("unexpected end of file in text block")]
    TextBlockEof,
}

/// A lexical error and the byte range it covers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnexpectedChar(_) => ErrorCode::E0002,
            LexErrorKind::LeadingZero
            | LexErrorKind::MissingFraction
            | LexErrorKind::MissingExponent => ErrorCode::E0003,
            LexErrorKind::InvalidEscape(_) | LexErrorKind::InvalidUnicodeEscape => ErrorCode::E0004,
            LexErrorKind::UnterminatedComment => ErrorCode::E0005,
            LexErrorKind::TextBlockNewline
            | LexErrorKind::TextBlockIndent
            | LexErrorKind::TextBlockUnterminated
            | LexErrorKind::TextBlockEof => ErrorCode::E0006,
        }
    }
}
