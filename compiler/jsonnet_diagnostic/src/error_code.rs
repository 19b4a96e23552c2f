use std::fmt;

/// Error codes for every diagnostic.
///
/// The first digit names the stage:
/// - E0xxx: lexical errors
/// - E1xxx: syntax errors
/// - E2xxx: static errors
/// - E3xxx: runtime errors
/// - E4xxx: host errors (importer, native functions, built-in preconditions)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Character that cannot start a token
    E0002,
    /// Malformed number literal
    E0003,
    /// Unknown escape sequence
    E0004,
    /// Unterminated block comment
    E0005,
    /// Malformed text block
    E0006,

    // Parser (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected an expression
    E1002,
    /// Duplicate local binding
    E1003,
    /// Duplicate function parameter
    E1004,
    /// Duplicate object field
    E1005,
    /// Positional argument after named argument
    E1006,
    /// Import path is not a plain string literal
    E1007,
    /// Malformed object comprehension
    E1008,

    // Static analysis (E2xxx)
    /// Unbound variable
    E2001,
    /// `self`, `super` or `$` used outside an object
    E2002,
    /// Same name bound twice in one scope
    E2003,
    /// Import path is empty
    E2004,

    // Runtime (E3xxx)
    /// Explicit `error` or failed assertion
    E3001,
    /// Operand or argument of the wrong type
    E3002,
    /// Arithmetic failure (division by zero, overflow, NaN)
    E3003,
    /// Missing field or out-of-range index
    E3004,
    /// Function call arguments do not match parameters
    E3005,
    /// Value depends on itself
    E3006,
    /// Evaluation exceeded the stack frame limit
    E3007,
    /// Value cannot be rendered as requested
    E3008,
    /// Import cycle
    E3009,
    /// Unknown external variable
    E3010,

    // Host (E4xxx)
    /// Importer could not resolve a path
    E4001,
    /// Built-in function argument check failed
    E4002,
    /// Host native function failed
    E4003,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
        }
    }

    pub fn is_lexer_error(self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_static_error(self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_runtime_error(self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn is_host_error(self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
