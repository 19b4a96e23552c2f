use jsonnet_diagnostic::ErrorCode;
use jsonnet_ir::Loc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StaticErrorKind {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Can't use self outside of an object.")]
    SelfOutsideObject,
    #[error("Can't use super outside of an object.")]
    SuperOutsideObject,
    #[error("Can't use $ outside of an object.")]
    DollarOutsideObject,
    #[error("duplicate binding: {0}")]
    DuplicateBinding(String),
    #[error("import path is empty")]
    EmptyImport,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct StaticError {
    pub kind: StaticErrorKind,
    pub loc: Loc,
}

impl StaticError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            StaticErrorKind::UnknownVariable(_) => ErrorCode::E2001,
            StaticErrorKind::SelfOutsideObject
            | StaticErrorKind::SuperOutsideObject
            | StaticErrorKind::DollarOutsideObject => ErrorCode::E2002,
            StaticErrorKind::DuplicateBinding(_) => ErrorCode::E2003,
            StaticErrorKind::EmptyImport => ErrorCode::E2004,
        }
    }
}
