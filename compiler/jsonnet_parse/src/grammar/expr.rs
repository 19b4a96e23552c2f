//! Expression grammar.

use crate::{PResult, ParseErrorKind, Parser};
use jsonnet_ir::ast::{Bind, Expr, ExprKind};
use jsonnet_ir::{BinaryOp, Span, StrStyle, TokenKind, UnaryOp};
use jsonnet_stack::ensure_sufficient_stack;

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::Ge,
        TokenKind::In => BinaryOp::In,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::Ne,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        _ => return None,
    })
}

fn unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Tilde => UnaryOp::BitNot,
        _ => return None,
    })
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(BinaryOp::MAX_PRECEDENCE)
    }

    /// Precedence climbing over operators binding no looser than `max_prec`.
    fn parse_binary(&mut self, max_prec: u8) -> PResult<Expr> {
        ensure_sufficient_stack(|| {
            let mut lhs = self.parse_unary()?;
            while let Some(op) = binary_op(self.cursor.current_kind()) {
                let prec = op.precedence();
                if prec > max_prec {
                    break;
                }
                self.cursor.advance();
                if op == BinaryOp::In && self.cursor.check(&TokenKind::Super) {
                    let end = self.cursor.advance();
                    let loc = self.span_to(lhs.loc.span, self.cursor.loc(end));
                    lhs = Expr::new(ExprKind::InSuper(Box::new(lhs)), loc);
                    continue;
                }
                let rhs = self.parse_binary(prec - 1)?;
                let loc = lhs.loc.to(rhs.loc);
                lhs = Expr::new(
                    ExprKind::Binary {
                        op,
                        left: Box::new(lhs),
                        right: Box::new(rhs),
                    },
                    loc,
                );
            }
            Ok(lhs)
        })
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let Some(op) = unary_op(self.cursor.current_kind()) else {
            return self.parse_postfix();
        };
        let start = self.cursor.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let loc = self.span_to(start, operand.loc);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            loc,
        ))
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let index = self.parse_field_ident()?;
                    let loc = expr.loc.to(index.loc);
                    expr = Expr::new(
                        ExprKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        loc,
                    );
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    expr = self.parse_index_or_slice(expr)?;
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_args()?;
                    let mut end = self.cursor.expect(&TokenKind::RParen)?;
                    let tailstrict = self.cursor.check(&TokenKind::TailStrict);
                    if tailstrict {
                        end = self.cursor.advance();
                    }
                    let loc = self.span_to(expr.loc.span, self.cursor.loc(end));
                    expr = Expr::new(
                        ExprKind::Apply {
                            target: Box::new(expr),
                            args,
                            tailstrict,
                        },
                        loc,
                    );
                }
                TokenKind::LBrace => {
                    let object = self.parse_object()?;
                    let loc = expr.loc.to(object.loc);
                    expr = Expr::new(
                        ExprKind::ApplyBrace {
                            target: Box::new(expr),
                            object: Box::new(object),
                        },
                        loc,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Identifier after `.`, as a string literal node.
    fn parse_field_ident(&mut self) -> PResult<Expr> {
        let (name, span) = self.cursor.expect_ident()?;
        Ok(Expr::new(
            ExprKind::Str(self.interner.lookup(name).to_string()),
            self.cursor.loc(span),
        ))
    }

    /// After `[`: `target[i]` or `target[start:end:step]` with any part
    /// omitted.
    fn parse_index_or_slice(&mut self, target: Expr) -> PResult<Expr> {
        let slice_sep = |kind: &TokenKind| matches!(kind, TokenKind::Colon | TokenKind::ColonColon);
        let start = if slice_sep(self.cursor.current_kind()) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if let Some(index) = start {
            if self.cursor.check(&TokenKind::RBracket) {
                let end = self.cursor.advance();
                let loc = self.span_to(target.loc.span, self.cursor.loc(end));
                return Ok(Expr::new(
                    ExprKind::Index {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    loc,
                ));
            }
            return self.parse_slice_rest(target, Some(index));
        }
        self.parse_slice_rest(target, None)
    }

    fn parse_slice_rest(&mut self, target: Expr, start: Option<Expr>) -> PResult<Expr> {
        let mut end = None;
        let mut step = None;
        if self.cursor.eat(&TokenKind::ColonColon) {
            if !self.cursor.check(&TokenKind::RBracket) {
                step = Some(self.parse_expr()?);
            }
        } else if self.cursor.eat(&TokenKind::Colon) {
            if !self.cursor.check(&TokenKind::RBracket) && !self.cursor.check(&TokenKind::Colon) {
                end = Some(self.parse_expr()?);
            }
            if self.cursor.eat(&TokenKind::Colon) && !self.cursor.check(&TokenKind::RBracket) {
                step = Some(self.parse_expr()?);
            }
        } else {
            return Err(self.cursor.unexpected("\":\" or \"]\""));
        }
        let close = self.cursor.expect(&TokenKind::RBracket)?;
        let loc = self.span_to(target.loc.span, self.cursor.loc(close));
        Ok(Expr::new(
            ExprKind::Slice {
                target: Box::new(target),
                start: start.map(Box::new),
                end: end.map(Box::new),
                step: step.map(Box::new),
            },
            loc,
        ))
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let token = self.cursor.current();
        let span = token.span;
        let simple = match &token.kind {
            TokenKind::Null => Some(ExprKind::Null),
            TokenKind::True => Some(ExprKind::True),
            TokenKind::False => Some(ExprKind::False),
            TokenKind::SelfKw => Some(ExprKind::SelfRef),
            TokenKind::Dollar => Some(ExprKind::Dollar),
            TokenKind::Number(n) => Some(ExprKind::Number(*n)),
            TokenKind::Str(s, _) => Some(ExprKind::Str(s.clone())),
            TokenKind::Ident(name) => Some(ExprKind::Var(*name)),
            _ => None,
        };
        if let Some(kind) = simple {
            self.cursor.advance();
            return Ok(Expr::new(kind, self.cursor.loc(span)));
        }

        match &token.kind {
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Super => self.parse_super(),
            TokenKind::Local => self.parse_local(),
            TokenKind::If => self.parse_if(),
            TokenKind::Function => {
                self.cursor.advance();
                self.cursor.expect(&TokenKind::LParen)?;
                let params = self.parse_params()?;
                let body = self.parse_expr()?;
                let loc = self.span_to(span, body.loc);
                Ok(Expr::new(
                    ExprKind::Function {
                        params,
                        body: Box::new(body),
                    },
                    loc,
                ))
            }
            TokenKind::Assert => {
                self.cursor.advance();
                let assert = self.parse_assert_tail(span)?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                let body = self.parse_expr()?;
                let loc = self.span_to(span, body.loc);
                Ok(Expr::new(
                    ExprKind::Assert {
                        assert: Box::new(assert),
                        body: Box::new(body),
                    },
                    loc,
                ))
            }
            TokenKind::Error => {
                self.cursor.advance();
                let msg = self.parse_expr()?;
                let loc = self.span_to(span, msg.loc);
                Ok(Expr::new(ExprKind::Error(Box::new(msg)), loc))
            }
            TokenKind::Import | TokenKind::ImportStr | TokenKind::ImportBin => {
                let which = token.kind.clone();
                self.cursor.advance();
                let (path, end) = self.parse_import_path()?;
                let kind = match which {
                    TokenKind::ImportStr => ExprKind::ImportStr(path),
                    TokenKind::ImportBin => ExprKind::ImportBin(path),
                    _ => ExprKind::Import(path),
                };
                Ok(Expr::new(kind, self.cursor.loc(span.merge(end))))
            }
            other => Err(self.error(
                ParseErrorKind::ExpectedExpression {
                    found: other.describe(),
                },
                span,
            )),
        }
    }

    fn parse_import_path(&mut self) -> PResult<(String, Span)> {
        let token = self.cursor.current();
        match &token.kind {
            TokenKind::Str(_, StrStyle::TextBlock) => {
                Err(self.error(ParseErrorKind::TextBlockImport, token.span))
            }
            TokenKind::Str(path, _) => {
                let path = path.clone();
                Ok((path, self.cursor.advance()))
            }
            _ => Err(self.error(ParseErrorKind::ComputedImport, token.span)),
        }
    }

    fn parse_super(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance();
        let index = if self.cursor.eat(&TokenKind::Dot) {
            self.parse_field_ident()?
        } else if self.cursor.eat(&TokenKind::LBracket) {
            let index = self.parse_expr()?;
            self.cursor.expect(&TokenKind::RBracket)?;
            index
        } else {
            return Err(self.cursor.unexpected("\".\" or \"[\" after super"));
        };
        let loc = self.span_to(start, index.loc);
        Ok(Expr::new(ExprKind::SuperIndex(Box::new(index)), loc))
    }

    fn parse_local(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance();
        let mut binds: Vec<Bind> = Vec::new();
        loop {
            let bind = self.parse_bind()?;
            if binds.iter().any(|b| b.name == bind.name) {
                return Err(self.duplicate_local(&bind));
            }
            binds.push(bind);
            if self.cursor.eat(&TokenKind::Comma) {
                continue;
            }
            self.cursor.expect(&TokenKind::Semicolon)?;
            break;
        }
        let body = self.parse_expr()?;
        let loc = self.span_to(start, body.loc);
        Ok(Expr::new(
            ExprKind::Local {
                binds,
                body: Box::new(body),
            },
            loc,
        ))
    }

    fn parse_if(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance();
        let cond = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Then)?;
        let then_branch = self.parse_expr()?;
        let else_branch = if self.cursor.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = else_branch.as_ref().map_or(then_branch.loc, |e| e.loc);
        let loc = self.span_to(start, end);
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            loc,
        ))
    }

    fn parse_array(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance();
        if self.cursor.check(&TokenKind::RBracket) {
            let end = self.cursor.advance();
            return Ok(Expr::new(ExprKind::Array(Vec::new()), self.cursor.loc(start.merge(end))));
        }
        let first = self.parse_expr()?;
        let comma_for = self.cursor.check(&TokenKind::Comma)
            && matches!(self.cursor.peek_kind(1), TokenKind::For);
        if self.cursor.check(&TokenKind::For) || comma_for {
            self.cursor.eat(&TokenKind::Comma);
            let specs = self.parse_comp_specs()?;
            let end = self.cursor.expect(&TokenKind::RBracket)?;
            return Ok(Expr::new(
                ExprKind::ArrayComp {
                    body: Box::new(first),
                    specs,
                },
                self.cursor.loc(start.merge(end)),
            ));
        }
        let mut elements = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if self.cursor.check(&TokenKind::RBracket) {
                break;
            }
            elements.push(self.parse_expr()?);
        }
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), self.cursor.loc(start.merge(end))))
    }
}
