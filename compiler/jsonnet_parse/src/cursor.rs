//! Token cursor with lookahead and consumption helpers.

use crate::{ParseError, ParseErrorKind};
use jsonnet_ir::{FileId, Loc, Name, Span, Token, TokenKind, TokenList};

pub(crate) struct Cursor<'a> {
    tokens: &'a TokenList,
    file: FileId,
    pos: usize,
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList, file: FileId) -> Self {
        Cursor {
            tokens,
            file,
            pos: 0,
        }
    }

    /// Current token; past the end this is the final EOF token.
    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.get(self.tokens.len().saturating_sub(1)))
            .unwrap_or(&EOF)
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn peek_kind(&self, ahead: usize) -> &'a TokenKind {
        self.tokens
            .get(self.pos + ahead)
            .map_or(&EOF.kind, |t| &t.kind)
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    /// Consume the current token, returning its span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let name = *name;
                Ok((name, self.advance()))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Error describing the current token as not what was `expected`.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Unexpected {
                expected: expected.into(),
                found: self.current_kind().describe(),
            },
            loc: self.loc(self.current_span()),
        }
    }

    #[inline]
    pub(crate) fn loc(&self, span: Span) -> Loc {
        Loc::new(self.file, span)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }
}
