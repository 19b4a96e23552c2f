//! Bindings, parameters, arguments, comprehension clauses and asserts.

use crate::{PResult, ParseError, ParseErrorKind, Parser};
use jsonnet_ir::ast::{Arg, Assert, Bind, CompSpec, Param};
use jsonnet_ir::{Span, TokenKind};

impl Parser<'_> {
    /// `name = expr` or `name(params) = expr`.
    pub(crate) fn parse_bind(&mut self) -> PResult<Bind> {
        let (name, start) = self.cursor.expect_ident()?;
        let params = if self.cursor.eat(&TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };
        self.cursor.expect(&TokenKind::Eq)?;
        let body = self.parse_expr()?;
        let loc = self.span_to(start, body.loc);
        Ok(Bind {
            name,
            params,
            body,
            loc,
        })
    }

    /// Parameter list after `(`, through the closing `)`.
    pub(crate) fn parse_params(&mut self) -> PResult<Vec<Param>> {
        let mut params: Vec<Param> = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            let (name, span) = self.cursor.expect_ident()?;
            let default = if self.cursor.eat(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if params.iter().any(|p| p.name == name) {
                return Err(self.error(
                    ParseErrorKind::DuplicateParam(self.interner.lookup(name).to_string()),
                    span,
                ));
            }
            let loc = match &default {
                Some(d) => self.span_to(span, d.loc),
                None => self.cursor.loc(span),
            };
            params.push(Param { name, default, loc });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Call arguments after `(`, stopping before the closing `)`.
    pub(crate) fn parse_args(&mut self) -> PResult<Vec<Arg>> {
        let mut args = Vec::new();
        let mut seen_named = false;
        while !self.cursor.check(&TokenKind::RParen) {
            let named = match (self.cursor.current_kind(), self.cursor.peek_kind(1)) {
                (TokenKind::Ident(name), TokenKind::Eq) => Some(*name),
                _ => None,
            };
            if let Some(name) = named {
                self.cursor.advance();
                self.cursor.advance();
                let value = self.parse_expr()?;
                args.push(Arg {
                    name: Some(name),
                    value,
                });
                seen_named = true;
            } else {
                let span = self.cursor.current_span();
                if seen_named {
                    return Err(self.error(ParseErrorKind::PositionalAfterNamed, span));
                }
                let value = self.parse_expr()?;
                args.push(Arg { name: None, value });
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    /// `for x in e` and `if e` clauses; the first must be a `for`.
    pub(crate) fn parse_comp_specs(&mut self) -> PResult<Vec<CompSpec>> {
        let mut specs = Vec::new();
        if !self.cursor.check(&TokenKind::For) {
            return Err(self.cursor.unexpected("\"for\""));
        }
        loop {
            if self.cursor.eat(&TokenKind::For) {
                let (var, _) = self.cursor.expect_ident()?;
                self.cursor.expect(&TokenKind::In)?;
                let array = self.parse_expr()?;
                specs.push(CompSpec::For { var, array });
            } else if self.cursor.eat(&TokenKind::If) {
                specs.push(CompSpec::If(self.parse_expr()?));
            } else {
                return Ok(specs);
            }
        }
    }

    /// Condition and optional `: message` after the `assert` keyword.
    pub(crate) fn parse_assert_tail(&mut self, start: Span) -> PResult<Assert> {
        let cond = self.parse_expr()?;
        let message = if self.cursor.eat(&TokenKind::Colon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = message.as_ref().map_or(cond.loc, |m| m.loc);
        let loc = self.span_to(start, end);
        Ok(Assert { cond, message, loc })
    }

    pub(crate) fn duplicate_local(&self, bind: &Bind) -> ParseError {
        ParseError {
            kind: ParseErrorKind::DuplicateLocal(self.interner.lookup(bind.name).to_string()),
            loc: bind.loc,
        }
    }
}
