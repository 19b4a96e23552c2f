//! Expression dispatch.

use super::Interpreter;
use crate::error::{field_not_found, index_out_of_bounds, internal_error, type_error, user_error};
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::heap::EnvId;
use crate::thunk::Thunk;
use crate::value::{Ctx, FuncValue, Value};
use jsonnet_ir::{CoreExpr, CoreId, CoreKind};
use jsonnet_stack::ensure_sufficient_stack;
use std::rc::Rc;

impl Interpreter {
    /// Evaluate `id` in `env` with object context `ctx`.
    ///
    /// Errors leaving this function carry the location of the innermost
    /// node that raised them.
    pub(crate) fn eval(&mut self, id: CoreId, env: EnvId, ctx: Ctx) -> EvalResult<Value> {
        let node = self.arena.shared(id);
        ensure_sufficient_stack(|| self.eval_node(id, &node, env, ctx)).map_err(|e| e.at(node.loc))
    }

    fn eval_node(&mut self, id: CoreId, node: &CoreExpr, env: EnvId, ctx: Ctx) -> EvalResult<Value> {
        match &node.kind {
            CoreKind::Null => Ok(Value::Null),
            CoreKind::True => Ok(Value::Bool(true)),
            CoreKind::False => Ok(Value::Bool(false)),
            CoreKind::Number(n) => Ok(Value::Number(*n)),
            CoreKind::Str(s) => Ok(Value::Str(s.clone())),
            CoreKind::Var(name) => {
                let thunk = self
                    .resolutions
                    .get(id)
                    .and_then(|var| self.heap.lookup(env, var.up, var.slot))
                    .ok_or_else(|| {
                        internal_error(format!("unresolved variable {}", self.interner.lookup(*name)))
                    })?;
                self.force(&thunk)
            }
            CoreKind::SelfRef => ctx
                .self_obj
                .map(Value::Object)
                .ok_or_else(|| internal_error("self outside of an object")),
            CoreKind::SuperIndex(index) => self.eval_super_index(*index, env, ctx),
            CoreKind::InSuper(name) => self.eval_in_super(*name, env, ctx),
            CoreKind::Function { .. } => Ok(Value::Function(Rc::new(FuncValue::Closure {
                func: id,
                env,
                ctx,
            }))),
            CoreKind::Apply {
                target,
                args,
                tailstrict,
            } => self.eval_apply(*target, args, *tailstrict, env, ctx, node.loc),
            CoreKind::Object { asserts, fields } => self.eval_object(fields, asserts, env, ctx),
            CoreKind::ObjectComp {
                field,
                plus_super,
                value,
                array,
                ..
            } => self.eval_object_comp(*field, *plus_super, *value, *array, env, ctx),
            CoreKind::Array(items) => Ok(Value::array(
                items.iter().map(|item| Thunk::expr(*item, env, ctx)).collect(),
            )),
            CoreKind::Binary { op, left, right } => self.eval_binary(*op, *left, *right, env, ctx),
            CoreKind::Unary { op, operand } => {
                let value = self.eval(*operand, env, ctx)?;
                self.unary(*op, value)
            }
            CoreKind::If {
                cond,
                then_branch,
                else_branch,
            } => match self.eval(*cond, env, ctx)? {
                Value::Bool(true) => self.eval(*then_branch, env, ctx),
                Value::Bool(false) => self.eval(*else_branch, env, ctx),
                other => Err(type_error(format!(
                    "condition must be boolean, got {}",
                    other.type_name()
                ))),
            },
            CoreKind::Local { binds, body } => {
                let frame = self.heap.reserve_frame(Some(env));
                let slots: Vec<Thunk> = binds
                    .iter()
                    .map(|(_, bind)| Thunk::expr(*bind, frame, ctx))
                    .collect();
                self.heap.fill_frame(frame, slots);
                self.eval(*body, frame, ctx)
            }
            CoreKind::Error(message) => {
                let message = match self.eval(*message, env, ctx)? {
                    Value::Str(s) => s.to_string(),
                    other => self.to_string_value(other)?.to_string(),
                };
                Err(user_error(message))
            }
            CoreKind::Index { target, index } => {
                let target = self.eval(*target, env, ctx)?;
                let index = self.eval(*index, env, ctx)?;
                self.index(target, index)
            }
            CoreKind::Import(path) => self.eval_import(path, node.loc),
            CoreKind::ImportStr(path) => {
                let (_, content) = self.resolve_import(path, node.loc)?;
                let text = std::str::from_utf8(&content).map_err(|_| {
                    EvalError::new(EvalErrorKind::Import {
                        path: path.to_string(),
                        message: "file is not valid UTF-8".to_string(),
                    })
                })?;
                Ok(Value::string(text))
            }
            CoreKind::ImportBin(path) => {
                let (_, content) = self.resolve_import(path, node.loc)?;
                Ok(Value::array_of(
                    content.iter().map(|b| Value::Number(f64::from(*b))),
                ))
            }
            CoreKind::Builtin { index, .. } => Ok(Value::Function(Rc::new(FuncValue::Builtin(*index)))),
        }
    }

    /// `target[index]` on an already evaluated target.
    pub(crate) fn index(&mut self, target: Value, index: Value) -> EvalResult<Value> {
        match (target, index) {
            (Value::Object(obj), Value::Str(name)) => {
                self.check_asserts(obj)?;
                let thunk = self
                    .object_field(obj, &name)
                    .ok_or_else(|| field_not_found(&name))?;
                self.force(&thunk)
            }
            (Value::Array(items), Value::Number(n)) => {
                let i = array_index(n)?;
                let thunk = usize::try_from(i)
                    .ok()
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| index_out_of_bounds(i, items.len()))?
                    .clone();
                self.force(&thunk)
            }
            (Value::Str(s), Value::Number(n)) => {
                let i = array_index(n)?;
                usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::string(c.to_string()))
                    .ok_or_else(|| index_out_of_bounds(i, s.chars().count()))
            }
            (Value::Object(_), other) => Err(type_error(format!(
                "object index must be string, got {}",
                other.type_name()
            ))),
            (Value::Array(_) | Value::Str(_), other) => Err(type_error(format!(
                "array index must be number, got {}",
                other.type_name()
            ))),
            (other, _) => Err(type_error(format!(
                "only strings, arrays and objects can be indexed, got {}",
                other.type_name()
            ))),
        }
    }
}

fn array_index(n: f64) -> EvalResult<i64> {
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(type_error(format!("index must be an integer, got {n}")));
    }
    Ok(n as i64)
}
