//! Loading the standard library into a fresh interpreter.

use crate::builtins::BUILTINS;
use crate::error::{internal_error, EvalResult};
use crate::heap::ObjectId;
use crate::interpreter::Interpreter;
use crate::object::{FieldBody, Leaf, LeafField, ObjectValue};
use crate::thunk::Thunk;
use crate::value::{Ctx, FuncValue, Value};
use jsonnet_ir::Visibility;
use std::rc::Rc;

/// Library source, compiled once per interpreter.
pub(crate) const STD_SOURCE: &str = include_str!("std.jsonnet");

/// File name the library is registered under in the source map.
pub(crate) const STD_FILENAME: &str = "<std>";

/// Evaluate the library object and attach the native built-ins it does not
/// define itself. Both `std` and `$std` in the library's own frame refer to
/// the result.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn bootstrap(interp: &mut Interpreter) -> EvalResult<ObjectId> {
    let name: Rc<str> = Rc::from(STD_FILENAME);
    let root = interp.compile(&name, STD_SOURCE)?;

    let std_slot = Thunk::placeholder();
    let dollar_std_slot = Thunk::placeholder();
    let env = interp
        .heap
        .alloc_frame(None, [std_slot.clone(), dollar_std_slot.clone()]);
    let Value::Object(library) = interp.eval(root, env, Ctx::default())? else {
        return Err(internal_error("standard library is not an object"));
    };

    let mut natives = Leaf::default();
    for (index, builtin) in BUILTINS.iter().enumerate() {
        if interp.heap.object(library).find(builtin.name, 0).is_some() {
            continue;
        }
        natives.fields.insert(
            Rc::from(builtin.name),
            LeafField {
                visibility: Visibility::Hidden,
                plus_super: false,
                body: FieldBody::Value(Thunk::done(Value::Function(Rc::new(
                    FuncValue::Builtin(index as u32),
                )))),
            },
        );
    }
    tracing::trace!(natives = natives.fields.len(), "attaching native built-ins");
    let natives = ObjectValue::new(vec![Rc::new(natives)]);
    let std = ObjectValue::extend(&natives, interp.heap.object(library));
    let std = interp.heap.alloc_object(std);

    std_slot.set(Value::Object(std));
    dollar_std_slot.set(Value::Object(std));
    Ok(std)
}
