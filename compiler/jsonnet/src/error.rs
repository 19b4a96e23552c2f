//! Errors returned by the embedding API.

use jsonnet_diagnostic::{render_trace, ErrorCode, SourceMap};
use jsonnet_eval::EvalError;
use std::fmt;

/// Which class of failure ended a render.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token.
    Lexical,
    /// Grammar violation.
    Syntax,
    /// Unbound variable or misplaced `self`/`super`/`$`.
    Static,
    /// Failure while evaluating or manifesting.
    Runtime,
    /// Importer, native function or built-in precondition failure.
    Host,
}

impl ErrorKind {
    fn of(code: ErrorCode) -> Self {
        if code.is_lexer_error() {
            ErrorKind::Lexical
        } else if code.is_parser_error() {
            ErrorKind::Syntax
        } else if code.is_static_error() {
            ErrorKind::Static
        } else if code.is_host_error() {
            ErrorKind::Host
        } else {
            ErrorKind::Runtime
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Lexical => "LEXICAL",
            ErrorKind::Syntax => "SYNTAX",
            ErrorKind::Static => "STATIC",
            ErrorKind::Runtime => "RUNTIME",
            ErrorKind::Host => "HOST",
        })
    }
}

/// A failed render: classification, message and rendered stack trace.
///
/// Displays as `RUNTIME ERROR: message` followed by one tab-indented
/// `location<TAB>description` line per frame.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ERROR: {message}{}", trace_lines(.trace))]
pub struct Error {
    kind: ErrorKind,
    code: ErrorCode,
    message: String,
    trace: Vec<String>,
}

fn trace_lines(trace: &[String]) -> String {
    trace.iter().map(|line| format!("\n\t{line}")).collect()
}

impl Error {
    pub(crate) fn from_eval(err: &EvalError, sources: &SourceMap, max_trace: usize) -> Self {
        let code = err.code();
        Error {
            kind: ErrorKind::of(code),
            code,
            message: err.kind.to_string(),
            trace: render_trace(&err.frames(), sources, max_trace),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rendered frames, innermost first.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonnet_eval::EvalErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_without_locations() {
        let err = EvalError::new(EvalErrorKind::User("boom".to_string()))
            .with_frame(None, "function <f>");
        let err = Error::from_eval(&err, &SourceMap::new(), 20);
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert_eq!(err.to_string(), "RUNTIME ERROR: boom\n\t<builtin>\tfunction <f>");
    }

    #[test]
    fn test_classification_follows_code() {
        assert_eq!(ErrorKind::of(ErrorCode::E0001), ErrorKind::Lexical);
        assert_eq!(ErrorKind::of(ErrorCode::E1002), ErrorKind::Syntax);
        assert_eq!(ErrorKind::of(ErrorCode::E2001), ErrorKind::Static);
        assert_eq!(ErrorKind::of(ErrorCode::E3007), ErrorKind::Runtime);
        assert_eq!(ErrorKind::of(ErrorCode::E4001), ErrorKind::Host);
    }
}
