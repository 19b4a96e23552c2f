//! Runtime errors.
//!
//! Errors are raised without a location; [`EvalError::at`] fills it in from
//! the innermost node being evaluated as the error propagates, and callers
//! append [`TraceFrame`]s while unwinding through calls, fields and imports.

use jsonnet_diagnostic::{ErrorCode, TraceFrame};
use jsonnet_ir::Loc;

/// Which front-end stage rejected a program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompileStage {
    Lexical,
    Syntax,
    Static,
}

/// A lexical, syntax or static error in a snippet, import or external
/// code variable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub stage: CompileStage,
    pub code: ErrorCode,
    pub message: String,
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    /// `error` expression or failed assertion.
    #[error("{0}")]
    User(String),
    #[error("{0}")]
    Type(String),
    #[error("division by zero.")]
    DivisionByZero,
    #[error("overflow")]
    Overflow,
    #[error("not a number")]
    NotANumber,
    #[error("field does not exist: {0}")]
    FieldNotFound(String),
    #[error("index out of bounds: {index} not within [0, {len})")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("attempt to use super when there is no super class.")]
    NoSuper,
    #[error("{0}")]
    Call(String),
    #[error("infinite recursion: value depends on itself")]
    InfiniteRecursion,
    #[error("max stack frames exceeded.")]
    StackOverflow,
    #[error("{0}")]
    Manifest(String),
    #[error("import cycle: {0}")]
    ImportCycle(String),
    #[error("Undefined external variable: {0}")]
    UndefinedExtVar(String),
    #[error("couldn't open import {path:?}: {message}")]
    Import { path: String, message: String },
    #[error("{0}")]
    Builtin(String),
    #[error("native function {name} failed: {message}")]
    Native { name: String, message: String },
    #[error("{0}")]
    Compile(Box<CompileError>),
    /// A core tree the analyzer should have rejected.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub loc: Option<Loc>,
    /// Frames appended while unwinding, innermost first.
    pub trace: Vec<TraceFrame>,
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            loc: None,
            trace: Vec::new(),
        }
    }

    /// Set the location unless a more precise one is already recorded.
    #[must_use]
    pub fn at(mut self, loc: Loc) -> Self {
        if self.loc.is_none() && !loc.is_synthetic() {
            self.loc = Some(loc);
        }
        self
    }

    #[must_use]
    pub fn with_frame(mut self, loc: Option<Loc>, description: impl Into<String>) -> Self {
        self.trace
            .push(TraceFrame::new(loc.filter(|l| !l.is_synthetic()), description));
        self
    }

    /// The failing expression followed by the unwound frames.
    pub fn frames(&self) -> Vec<TraceFrame> {
        let mut frames = Vec::with_capacity(self.trace.len() + 1);
        if self.loc.is_some() {
            frames.push(TraceFrame::new(self.loc, ""));
        }
        frames.extend(self.trace.iter().cloned());
        frames
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            EvalErrorKind::User(_) => ErrorCode::E3001,
            EvalErrorKind::Type(_) | EvalErrorKind::Internal(_) => ErrorCode::E3002,
            EvalErrorKind::DivisionByZero | EvalErrorKind::Overflow | EvalErrorKind::NotANumber => {
                ErrorCode::E3003
            }
            EvalErrorKind::FieldNotFound(_)
            | EvalErrorKind::IndexOutOfBounds { .. }
            | EvalErrorKind::NoSuper => ErrorCode::E3004,
            EvalErrorKind::Call(_) => ErrorCode::E3005,
            EvalErrorKind::InfiniteRecursion => ErrorCode::E3006,
            EvalErrorKind::StackOverflow => ErrorCode::E3007,
            EvalErrorKind::Manifest(_) => ErrorCode::E3008,
            EvalErrorKind::ImportCycle(_) => ErrorCode::E3009,
            EvalErrorKind::UndefinedExtVar(_) => ErrorCode::E3010,
            EvalErrorKind::Import { .. } => ErrorCode::E4001,
            EvalErrorKind::Builtin(_) => ErrorCode::E4002,
            EvalErrorKind::Native { .. } => ErrorCode::E4003,
            EvalErrorKind::Compile(err) => err.code,
        }
    }
}

impl From<CompileError> for EvalError {
    fn from(err: CompileError) -> Self {
        let loc = err.loc;
        EvalError::new(EvalErrorKind::Compile(Box::new(err))).at(loc)
    }
}

// Factories for the common cases.

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Type(message.into()))
}

#[cold]
pub fn binary_type_mismatch(op: &str, left: &str, right: &str) -> EvalError {
    type_error(format!(
        "binary operator {op} does not operate on types {left} and {right}"
    ))
}

#[cold]
pub fn user_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::User(message.into()))
}

#[cold]
pub fn field_not_found(field: &str) -> EvalError {
    EvalError::new(EvalErrorKind::FieldNotFound(field.to_string()))
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn call_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Call(message.into()))
}

#[cold]
pub fn builtin_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Builtin(message.into()))
}

#[cold]
pub fn internal_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Internal(message.into()))
}

#[cold]
pub fn manifest_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Manifest(message.into()))
}
