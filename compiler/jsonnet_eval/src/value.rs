//! Runtime values.

use crate::heap::{EnvId, ObjectId};
use crate::thunk::Thunk;
use jsonnet_ir::CoreId;
use std::fmt;
use std::rc::Rc;

/// A fully evaluated value. Array elements stay lazy; objects live in the
/// heap and are referred to by id.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Rc<[Thunk]>),
    Object(ObjectId),
    Function(Rc<FuncValue>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Thunk>) -> Self {
        Value::Array(Rc::from(items))
    }

    /// Array of already evaluated values.
    pub fn array_of(items: impl IntoIterator<Item = Value>) -> Self {
        Value::array(items.into_iter().map(Thunk::done).collect())
    }
}

/// Object context a closure or field body runs in: the object `self`
/// refers to and the leaf the code was written in, which `super` starts
/// searching after.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ctx {
    pub self_obj: Option<ObjectId>,
    pub leaf: u32,
}

/// Host callback registered with `std.native`.
pub type NativeCallback = dyn Fn(&[serde_json::Value]) -> Result<serde_json::Value, String>;

pub struct NativeFn {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub callback: Box<NativeCallback>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum FuncValue {
    /// A `function` literal; `func` is its core node.
    Closure { func: CoreId, env: EnvId, ctx: Ctx },
    /// Entry of the built-in table.
    Builtin(u32),
    Native(Rc<NativeFn>),
}
