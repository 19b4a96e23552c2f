//! Expression lowering.

use crate::Desugarer;
use jsonnet_ir::ast::{Arg, Bind, Expr, ExprKind, Param};
use jsonnet_ir::{BinaryOp, CoreArg, CoreId, CoreKind, CoreParam, Loc, Name, UnaryOp};
use jsonnet_stack::ensure_sufficient_stack;
use std::rc::Rc;

impl Desugarer<'_> {
    pub(crate) fn lower(&mut self, expr: Expr) -> CoreId {
        ensure_sufficient_stack(|| self.lower_inner(expr))
    }

    fn lower_boxed(&mut self, expr: Box<Expr>) -> CoreId {
        self.lower(*expr)
    }

    fn lower_inner(&mut self, expr: Expr) -> CoreId {
        let loc = expr.loc;
        let kind = match expr.kind {
            ExprKind::Null => CoreKind::Null,
            ExprKind::True => CoreKind::True,
            ExprKind::False => CoreKind::False,
            ExprKind::SelfRef => CoreKind::SelfRef,
            ExprKind::Dollar => CoreKind::Var(Name::DOLLAR),
            ExprKind::Number(n) => CoreKind::Number(n),
            ExprKind::Str(s) => CoreKind::Str(Rc::from(s)),
            ExprKind::Var(name) => CoreKind::Var(name),

            ExprKind::Array(items) => {
                CoreKind::Array(items.into_iter().map(|e| self.lower(e)).collect())
            }
            ExprKind::ArrayComp { body, specs } => {
                let body = self.lower_boxed(body);
                let element = self.alloc(CoreKind::Array(vec![body]), loc);
                return self.lower_comp_specs(specs, element, loc);
            }
            ExprKind::Object(members) => return self.lower_object(members, loc),
            ExprKind::ObjectComp {
                locals,
                key,
                plus,
                value,
                specs,
            } => return self.lower_object_comp(locals, *key, plus, *value, specs, loc),

            ExprKind::Local { binds, body } => {
                let binds = self.lower_binds(binds);
                let body = self.lower_boxed(body);
                CoreKind::Local { binds, body }
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.lower_boxed(cond);
                let then_branch = self.lower_boxed(then_branch);
                let else_branch = match else_branch {
                    Some(e) => self.lower_boxed(e),
                    None => self.alloc(CoreKind::Null, loc),
                };
                CoreKind::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            ExprKind::Function { params, body } => self.lower_function(params, *body),
            ExprKind::Apply {
                target,
                args,
                tailstrict,
            } => {
                let target = self.lower_boxed(target);
                let args = self.lower_args(args);
                CoreKind::Apply {
                    target,
                    args,
                    tailstrict,
                }
            }
            ExprKind::ApplyBrace { target, object } => {
                let left = self.lower_boxed(target);
                let right = self.lower_boxed(object);
                CoreKind::Binary {
                    op: BinaryOp::Add,
                    left,
                    right,
                }
            }
            ExprKind::Index { target, index } => {
                let target = self.lower_boxed(target);
                let index = self.lower_boxed(index);
                CoreKind::Index { target, index }
            }
            ExprKind::Slice {
                target,
                start,
                end,
                step,
            } => {
                let target = self.lower_boxed(target);
                let mut args = vec![target];
                for part in [start, end, step] {
                    let arg = match part {
                        Some(e) => self.lower_boxed(e),
                        None => self.alloc(CoreKind::Null, loc),
                    };
                    args.push(arg);
                }
                return self.std_call("slice", args, loc);
            }
            ExprKind::SuperIndex(index) => CoreKind::SuperIndex(self.lower_boxed(index)),
            ExprKind::InSuper(field) => CoreKind::InSuper(self.lower_boxed(field)),
            ExprKind::Unary { op, operand } => CoreKind::Unary {
                op,
                operand: self.lower_boxed(operand),
            },
            ExprKind::Binary { op, left, right } => {
                let left = self.lower_boxed(left);
                let right = self.lower_boxed(right);
                return self.lower_binary(op, left, right, loc);
            }
            ExprKind::Assert { assert, body } => {
                let body = self.lower_boxed(body);
                return self.lower_assert(assert.cond, assert.message, body, assert.loc);
            }
            ExprKind::Error(msg) => CoreKind::Error(self.lower_boxed(msg)),
            ExprKind::Import(path) => CoreKind::Import(Rc::from(path)),
            ExprKind::ImportStr(path) => CoreKind::ImportStr(Rc::from(path)),
            ExprKind::ImportBin(path) => CoreKind::ImportBin(Rc::from(path)),
        };
        self.alloc(kind, loc)
    }

    fn lower_binary(&mut self, op: BinaryOp, left: CoreId, right: CoreId, loc: Loc) -> CoreId {
        match op {
            BinaryOp::Eq => self.std_call("equals", vec![left, right], loc),
            BinaryOp::Ne => {
                let eq = self.std_call("equals", vec![left, right], loc);
                self.alloc(
                    CoreKind::Unary {
                        op: UnaryOp::Not,
                        operand: eq,
                    },
                    loc,
                )
            }
            BinaryOp::Mod => self.std_call("mod", vec![left, right], loc),
            BinaryOp::In => {
                let inherited = self.alloc(CoreKind::True, loc);
                self.std_call("objectHasEx", vec![right, left, inherited], loc)
            }
            _ => self.alloc(CoreKind::Binary { op, left, right }, loc),
        }
    }

    /// `if cond then success else error message`
    pub(crate) fn lower_assert(
        &mut self,
        cond: Expr,
        message: Option<Expr>,
        success: CoreId,
        loc: Loc,
    ) -> CoreId {
        let cond = self.lower(cond);
        let message = match message {
            Some(m) => self.lower(m),
            None => self.str_lit("Assertion failed", loc),
        };
        let failure = self.alloc(CoreKind::Error(message), loc);
        self.alloc(
            CoreKind::If {
                cond,
                then_branch: success,
                else_branch: failure,
            },
            loc,
        )
    }

    pub(crate) fn lower_function(&mut self, params: Vec<Param>, body: Expr) -> CoreKind {
        let params = params
            .into_iter()
            .map(|p| CoreParam {
                name: p.name,
                default: p.default.map(|d| self.lower(d)),
            })
            .collect();
        let body = self.lower(body);
        CoreKind::Function { params, body }
    }

    pub(crate) fn lower_binds(&mut self, binds: Vec<Bind>) -> Vec<(Name, CoreId)> {
        binds.into_iter().map(|b| (b.name, self.lower_bind(b))).collect()
    }

    fn lower_bind(&mut self, bind: Bind) -> CoreId {
        match bind.params {
            Some(params) => {
                let kind = self.lower_function(params, bind.body);
                self.alloc(kind, bind.loc)
            }
            None => self.lower(bind.body),
        }
    }

    fn lower_args(&mut self, args: Vec<Arg>) -> Vec<CoreArg> {
        args.into_iter()
            .map(|a| CoreArg {
                name: a.name,
                value: self.lower(a.value),
            })
            .collect()
    }
}
