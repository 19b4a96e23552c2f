//! Parser for Jsonnet.
//!
//! Recursive descent for terms and precedence climbing for binary
//! operators. `local`, `if`, `function`, `assert` and `error` extend as far
//! to the right as possible. The parser fails on the first error and never
//! returns a partial tree.

mod cursor;
mod error;
mod grammar;


pub use error::{ParseError, ParseErrorKind};

use cursor::Cursor;
use jsonnet_ir::ast::Expr;
use jsonnet_ir::{FileId, Loc, Span, StringInterner, TokenList};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Parse a whole program.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, file: FileId, interner: &StringInterner) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens, file, interner);
    let expr = parser.parse_expr()?;
    if !parser.cursor.is_at_end() {
        return Err(ParseError {
            kind: ParseErrorKind::TrailingInput {
                found: parser.cursor.current_kind().describe(),
            },
            loc: parser.cursor.loc(parser.cursor.current_span()),
        });
    }
    Ok(expr)
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a TokenList, file: FileId, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, file),
            interner,
        }
    }

    /// Location from the start of `start` through the end of `end`.
    fn span_to(&self, start: Span, end: Loc) -> Loc {
        Loc::new(end.file, start.merge(end.span))
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError {
            kind,
            loc: self.cursor.loc(span),
        }
    }
}
