//! Object reflection.

use super::Args;
use crate::error::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn object_fields_ex(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let obj = args.obj(0)?;
    let hidden = args.boolean(1)?;
    let names = interp.object_fields(obj, hidden);
    Ok(Value::array_of(names.into_iter().map(Value::Str)))
}

pub(super) fn object_has_ex(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let obj = args.obj(0)?;
    let name = args.str(1)?;
    let hidden = args.boolean(2)?;
    Ok(Value::Bool(interp.object_has(obj, &name, hidden)))
}
