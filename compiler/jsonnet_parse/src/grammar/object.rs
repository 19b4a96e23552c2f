//! Object literals and object comprehensions.

use crate::{PResult, ParseErrorKind, Parser};
use jsonnet_ir::ast::{Bind, CompSpec, Expr, ExprKind, Field, FieldName, Member};
use jsonnet_ir::{Span, TokenKind, Visibility};
use rustc_hash::FxHashSet;

impl Parser<'_> {
    pub(crate) fn parse_object(&mut self) -> PResult<Expr> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        let mut specs = None;
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.check(&TokenKind::For) {
                specs = Some(self.parse_comp_specs()?);
                break;
            }
            members.push(self.parse_member()?);
            if !self.cursor.eat(&TokenKind::Comma) && !self.cursor.check(&TokenKind::For) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        let span = start.merge(end);
        match specs {
            Some(specs) => self.finish_object_comp(members, specs, span),
            None => self.finish_object(members, span),
        }
    }

    fn finish_object(&self, members: Vec<Member>, span: Span) -> PResult<Expr> {
        let mut names: FxHashSet<String> = FxHashSet::default();
        let mut locals = FxHashSet::default();
        for member in &members {
            match member {
                Member::Field(field) => {
                    let literal = match &field.name {
                        FieldName::Ident(name) => Some(self.interner.lookup(*name).to_string()),
                        FieldName::Str(s) => Some(s.clone()),
                        FieldName::Computed(_) => None,
                    };
                    if let Some(name) = literal {
                        if !names.insert(name.clone()) {
                            return Err(self.error(ParseErrorKind::DuplicateField(name), field.loc.span));
                        }
                    }
                }
                Member::Local(bind) => {
                    if !locals.insert(bind.name) {
                        return Err(self.duplicate_local(bind));
                    }
                }
                Member::Assert(_) => {}
            }
        }
        Ok(Expr::new(ExprKind::Object(members), self.cursor.loc(span)))
    }

    fn finish_object_comp(&self, members: Vec<Member>, specs: Vec<CompSpec>, span: Span) -> PResult<Expr> {
        let invalid = |msg| self.error(ParseErrorKind::InvalidObjectComp(msg), span);
        let mut locals: Vec<Bind> = Vec::new();
        let mut field = None;
        for member in members {
            match member {
                Member::Local(bind) => {
                    if locals.iter().any(|b| b.name == bind.name) {
                        return Err(self.duplicate_local(&bind));
                    }
                    locals.push(bind);
                }
                Member::Assert(_) => {
                    return Err(invalid("object comprehension cannot have asserts"));
                }
                Member::Field(f) => {
                    if field.is_some() {
                        return Err(invalid("object comprehension can only have one field"));
                    }
                    field = Some(f);
                }
            }
        }
        let Some(field) = field else {
            return Err(invalid("object comprehension must have a field"));
        };
        if field.visibility != Visibility::Inherit {
            return Err(invalid("object comprehensions cannot have hidden fields"));
        }
        let FieldName::Computed(key) = field.name else {
            return Err(invalid("object comprehension field name must be computed with [ ]"));
        };
        let value = match field.params {
            Some(params) => {
                let loc = field.body.loc;
                Expr::new(
                    ExprKind::Function {
                        params,
                        body: Box::new(field.body),
                    },
                    loc,
                )
            }
            None => field.body,
        };
        Ok(Expr::new(
            ExprKind::ObjectComp {
                locals,
                key,
                plus: field.plus,
                value: Box::new(value),
                specs,
            },
            self.cursor.loc(span),
        ))
    }

    fn parse_member(&mut self) -> PResult<Member> {
        let token = self.cursor.current();
        let start = token.span;
        let name = match &token.kind {
            TokenKind::Local => {
                self.cursor.advance();
                return Ok(Member::Local(self.parse_bind()?));
            }
            TokenKind::Assert => {
                self.cursor.advance();
                return Ok(Member::Assert(self.parse_assert_tail(start)?));
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                FieldName::Ident(*name)
            }
            TokenKind::Str(s, _) => {
                self.cursor.advance();
                FieldName::Str(s.clone())
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let expr = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RBracket)?;
                FieldName::Computed(Box::new(expr))
            }
            _ => return Err(self.cursor.unexpected("field name")),
        };

        let params = if self.cursor.eat(&TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };

        let (plus, visibility) = match self.cursor.current_kind() {
            TokenKind::Colon => (false, Visibility::Inherit),
            TokenKind::ColonColon => (false, Visibility::Hidden),
            TokenKind::ColonColonColon => (false, Visibility::Forced),
            TokenKind::PlusColon => (true, Visibility::Inherit),
            TokenKind::PlusColonColon => (true, Visibility::Hidden),
            TokenKind::PlusColonColonColon => (true, Visibility::Forced),
            _ => return Err(self.cursor.unexpected("\":\", \"::\" or \":::\"")),
        };
        let op_span = self.cursor.advance();
        if plus && params.is_some() {
            let shown = match &name {
                FieldName::Ident(n) => self.interner.lookup(*n).to_string(),
                FieldName::Str(s) => s.clone(),
                FieldName::Computed(_) => "<computed>".to_string(),
            };
            return Err(self.error(ParseErrorKind::PlusMethod(shown), op_span));
        }

        let body = self.parse_expr()?;
        let loc = self.span_to(start, body.loc);
        Ok(Member::Field(Field {
            name,
            plus,
            visibility,
            params,
            body,
            loc,
        }))
    }
}
