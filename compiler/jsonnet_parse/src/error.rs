use jsonnet_diagnostic::ErrorCode;
use jsonnet_ir::Loc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, got {found}")]
    Unexpected { expected: String, found: String },
    #[error("unexpected: {found} while parsing terminal")]
    ExpectedExpression { found: String },
    #[error("duplicate local var: {0}")]
    DuplicateLocal(String),
    #[error("duplicate parameter: {0}")]
    DuplicateParam(String),
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    #[error("positional argument after a named argument")]
    PositionalAfterNamed,
    #[error("computed imports are not allowed")]
    ComputedImport,
    #[error("cannot use text blocks in import statements")]
    TextBlockImport,
    #[error("cannot use +: syntax sugar in a method: {0}")]
    PlusMethod(String),
    #[error("{0}")]
    InvalidObjectComp(&'static str),
    #[error("did not expect: {found}")]
    TrailingInput { found: String },
}

/// A syntax error at a source location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub loc: Loc,
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ParseErrorKind::Unexpected { .. } | ParseErrorKind::TrailingInput { .. } => {
                ErrorCode::E1001
            }
            ParseErrorKind::ExpectedExpression { .. } => ErrorCode::E1002,
            ParseErrorKind::DuplicateLocal(_) => ErrorCode::E1003,
            ParseErrorKind::DuplicateParam(_) => ErrorCode::E1004,
            ParseErrorKind::DuplicateField(_) => ErrorCode::E1005,
            ParseErrorKind::PositionalAfterNamed => ErrorCode::E1006,
            ParseErrorKind::ComputedImport | ParseErrorKind::TextBlockImport => ErrorCode::E1007,
            ParseErrorKind::PlusMethod(_) | ParseErrorKind::InvalidObjectComp(_) => {
                ErrorCode::E1008
            }
        }
    }
}
