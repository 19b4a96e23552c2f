//! Thunk forcing and function application.

use super::Interpreter;
use crate::builtins;
use crate::error::{call_error, internal_error, type_error, EvalError, EvalErrorKind, EvalResult};
use crate::heap::EnvId;
use crate::thunk::{Begin, Suspended, Thunk};
use crate::value::{Ctx, FuncValue, NativeFn, Value};
use jsonnet_ir::{CoreArg, CoreId, CoreKind, Loc};
use std::rc::Rc;

/// One argument of a call, named or positional.
#[derive(Clone, Debug)]
pub(crate) struct CallArg {
    pub name: Option<Rc<str>>,
    pub thunk: Thunk,
}

impl CallArg {
    pub(crate) fn positional(thunk: Thunk) -> Self {
        CallArg { name: None, thunk }
    }

    pub(crate) fn named(name: impl Into<Rc<str>>, thunk: Thunk) -> Self {
        CallArg {
            name: Some(name.into()),
            thunk,
        }
    }
}

impl Interpreter {
    /// Value of `thunk`, computing and memoising it on first use.
    pub(crate) fn force(&mut self, thunk: &Thunk) -> EvalResult<Value> {
        match thunk.begin() {
            Begin::Ready(result) => result,
            Begin::Run(work) => {
                let result = self.run(work);
                thunk.finish(&result);
                result
            }
        }
    }

    fn run(&mut self, work: Suspended) -> EvalResult<Value> {
        match work {
            Suspended::Expr { expr, env, ctx } => self.eval(expr, env, ctx),
            Suspended::Field { object, leaf, name } => self.eval_field(object, leaf, &name),
            Suspended::Call { func, args } => {
                self.call(&func, args.into_iter().map(CallArg::positional).collect())
            }
        }
    }

    pub(super) fn eval_apply(
        &mut self,
        target: CoreId,
        args: &[CoreArg],
        tailstrict: bool,
        env: EnvId,
        ctx: Ctx,
        loc: Loc,
    ) -> EvalResult<Value> {
        let func = match self.eval(target, env, ctx)? {
            Value::Function(func) => func,
            other => {
                return Err(type_error(format!(
                    "only functions can be called, got {}",
                    other.type_name()
                )))
            }
        };
        let mut call_args = Vec::with_capacity(args.len());
        for arg in args {
            let thunk = Thunk::expr(arg.value, env, ctx);
            if tailstrict {
                self.force(&thunk)?;
            }
            call_args.push(CallArg {
                name: arg.name.map(|n| Rc::from(self.interner.lookup(n))),
                thunk,
            });
        }
        let name = self.callee_name(target, &func);
        self.call(&func, call_args)
            .map_err(|e| e.at(loc).with_frame(Some(loc), format!("function <{name}>")))
    }

    /// Name shown in trace frames for a call through `target`.
    fn callee_name(&self, target: CoreId, func: &FuncValue) -> String {
        match &self.arena.get(target).kind {
            CoreKind::Var(name) => self.interner.lookup(*name).to_string(),
            CoreKind::Index { index, .. } => match &self.arena.get(*index).kind {
                CoreKind::Str(s) => s.to_string(),
                _ => "anonymous".to_string(),
            },
            _ => match func {
                FuncValue::Builtin(index) => builtins::name(*index).to_string(),
                FuncValue::Native(native) => native.name.to_string(),
                FuncValue::Closure { .. } => "anonymous".to_string(),
            },
        }
    }

    /// Apply `func`, counting one frame against the stack limit.
    pub(crate) fn call(&mut self, func: &FuncValue, args: Vec<CallArg>) -> EvalResult<Value> {
        self.enter()?;
        let result = match func {
            FuncValue::Closure { func, env, ctx } => self.call_closure(*func, *env, *ctx, args),
            FuncValue::Builtin(index) => builtins::call(self, *index, args),
            FuncValue::Native(native) => self.call_native(native, args),
        };
        self.leave();
        result
    }

    /// Apply `func` to already evaluated positional arguments.
    pub(crate) fn apply(&mut self, func: &FuncValue, args: Vec<Value>) -> EvalResult<Value> {
        let args = args
            .into_iter()
            .map(|v| CallArg::positional(Thunk::done(v)))
            .collect();
        self.call(func, args)
    }

    fn call_closure(
        &mut self,
        func: CoreId,
        env: EnvId,
        ctx: Ctx,
        args: Vec<CallArg>,
    ) -> EvalResult<Value> {
        let node = self.arena.shared(func);
        let CoreKind::Function { params, body } = &node.kind else {
            return Err(internal_error("closure over a non-function node"));
        };
        let names: Vec<&str> = params.iter().map(|p| self.interner.lookup(p.name)).collect();
        let slots = bind_args(&names, args)?;

        let frame = self.heap.reserve_frame(Some(env));
        let mut filled = Vec::with_capacity(params.len());
        for (param, slot) in params.iter().zip(slots) {
            let thunk = match (slot, param.default) {
                (Some(thunk), _) => thunk,
                (None, Some(default)) => Thunk::expr(default, frame, ctx),
                (None, None) => {
                    return Err(call_error(format!(
                        "missing argument: {}",
                        self.interner.lookup(param.name)
                    )))
                }
            };
            filled.push(thunk);
        }
        self.heap.fill_frame(frame, filled);
        self.eval(*body, frame, ctx)
    }

    fn call_native(&mut self, native: &NativeFn, args: Vec<CallArg>) -> EvalResult<Value> {
        let names: Vec<&str> = native.params.iter().map(|p| &**p).collect();
        let slots = bind_args(&names, args)?;
        let mut json = Vec::with_capacity(slots.len());
        for (name, slot) in names.iter().zip(slots) {
            let thunk = slot.ok_or_else(|| call_error(format!("missing argument: {name}")))?;
            let value = self.force(&thunk)?;
            json.push(self.to_json(value)?);
        }
        let result = (native.callback)(&json).map_err(|message| {
            EvalError::new(EvalErrorKind::Native {
                name: native.name.to_string(),
                message,
            })
        })?;
        Ok(self.from_json(&result))
    }
}

/// Match arguments to parameters: positional ones in order, then named
/// ones by name. Unfilled parameters are `None`.
pub(crate) fn bind_args(params: &[&str], args: Vec<CallArg>) -> EvalResult<Vec<Option<Thunk>>> {
    let mut slots: Vec<Option<Thunk>> = vec![None; params.len()];
    let mut positional = 0;
    for arg in args {
        let index = match &arg.name {
            None => {
                if positional >= params.len() {
                    return Err(call_error(format!(
                        "too many arguments, function has {} parameter(s)",
                        params.len()
                    )));
                }
                positional += 1;
                positional - 1
            }
            Some(name) => params
                .iter()
                .position(|p| *p == &**name)
                .ok_or_else(|| call_error(format!("function has no parameter {name}")))?,
        };
        if slots[index].is_some() {
            return Err(call_error(format!(
                "argument {} already provided",
                params[index]
            )));
        }
        slots[index] = Some(arg.thunk);
    }
    Ok(slots)
}
