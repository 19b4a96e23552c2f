//! Type predicates, equality, conversion and host hooks.

use super::{Args, BUILTINS};
use crate::error::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::{FuncValue, Value};
use jsonnet_ir::CoreKind;
use std::rc::Rc;

pub(super) fn type_of(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::string(args.value(0).type_name()))
}

pub(super) fn is_array(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Array(_))))
}

pub(super) fn is_boolean(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Bool(_))))
}

pub(super) fn is_function(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Function(_))))
}

pub(super) fn is_number(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Number(_))))
}

pub(super) fn is_object(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Object(_))))
}

pub(super) fn is_string(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.value(0), Value::Str(_))))
}

/// Characters of a string, elements of an array, visible fields of an
/// object, or parameters of a function.
pub(super) fn length(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let len = match args.value(0) {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(obj) => interp.object_fields(*obj, false).len(),
        Value::Function(func) => match &**func {
            FuncValue::Closure { func, .. } => match &interp.arena.get(*func).kind {
                CoreKind::Function { params, .. } => params.len(),
                _ => 0,
            },
            FuncValue::Builtin(index) => BUILTINS.get(*index as usize).map_or(0, |b| b.params.len()),
            FuncValue::Native(native) => native.params.len(),
        },
        other => {
            return Err(args.error(format!(
                "length operates on strings, objects, functions and arrays, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Number(len as f64))
}

pub(super) fn primitive_equals(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let equal = match (args.value(0), args.value(1)) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (a, b) if a.type_name() != b.type_name() => false,
        (Value::Function(_), _) => return Err(args.error("cannot test equality of functions")),
        (other, _) => {
            return Err(args.error(format!(
                "primitiveEquals operates on primitive types, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Bool(equal))
}

pub(super) fn equals(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(interp.equals(args.value(0), args.value(1))?))
}

pub(super) fn to_string(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Str(interp.to_string_value(args.value(0).clone())?))
}

pub(super) fn trace(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let message = args.str(0)?;
    tracing::info!(message = &*message, "std.trace");
    Ok(args.value(1).clone())
}

pub(super) fn ext_var(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let name = args.str(0)?;
    interp.ext_var(&name)
}

/// Host function registered under the given name, or `null`.
pub(super) fn native(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let name = args.str(0)?;
    Ok(interp
        .native(&name)
        .map_or(Value::Null, |native| {
            Value::Function(Rc::new(FuncValue::Native(native)))
        }))
}
