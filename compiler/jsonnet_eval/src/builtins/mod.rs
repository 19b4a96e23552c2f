//! Native built-in functions.
//!
//! Each entry declares its parameter names, so built-ins accept named
//! arguments like any other function, and the number of leading
//! parameters that are required. Arguments are forced before the
//! implementation runs; omitted optional ones arrive as `null`.
//!
//! The standard library object exposes every entry not already defined by
//! the library source as a hidden field of the same name.

mod arrays;
mod encoding;
mod math;
mod objects;
mod strings;
mod types;

#[cfg(test)]
mod tests;

use crate::error::{builtin_error, call_error, internal_error, EvalResult};
use crate::heap::ObjectId;
use crate::interpreter::{bind_args, CallArg, Interpreter};
use crate::thunk::Thunk;
use crate::value::{FuncValue, Value};
use std::rc::Rc;

pub(crate) type BuiltinFn = fn(&mut Interpreter, &Args) -> EvalResult<Value>;

pub(crate) struct Builtin {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub required: usize,
    pub imp: BuiltinFn,
}

macro_rules! builtin {
    ($name:literal, [$($param:literal),*], $required:literal, $imp:path) => {
        Builtin {
            name: $name,
            params: &[$($param),*],
            required: $required,
            imp: $imp,
        }
    };
}

pub(crate) static BUILTINS: &[Builtin] = &[
    // types
    builtin!("type", ["x"], 1, types::type_of),
    builtin!("isArray", ["v"], 1, types::is_array),
    builtin!("isBoolean", ["v"], 1, types::is_boolean),
    builtin!("isFunction", ["v"], 1, types::is_function),
    builtin!("isNumber", ["v"], 1, types::is_number),
    builtin!("isObject", ["v"], 1, types::is_object),
    builtin!("isString", ["v"], 1, types::is_string),
    builtin!("length", ["x"], 1, types::length),
    builtin!("primitiveEquals", ["a", "b"], 2, types::primitive_equals),
    builtin!("equals", ["a", "b"], 2, types::equals),
    builtin!("toString", ["a"], 1, types::to_string),
    builtin!("trace", ["str", "rest"], 2, types::trace),
    builtin!("extVar", ["x"], 1, types::ext_var),
    builtin!("native", ["name"], 1, types::native),
    // math
    builtin!("mod", ["a", "b"], 2, math::modulo_op),
    builtin!("modulo", ["x", "y"], 2, math::modulo),
    builtin!("floor", ["x"], 1, math::floor),
    builtin!("ceil", ["x"], 1, math::ceil),
    builtin!("sqrt", ["x"], 1, math::sqrt),
    builtin!("pow", ["x", "n"], 2, math::pow),
    builtin!("exp", ["x"], 1, math::exp),
    builtin!("log", ["x"], 1, math::log),
    builtin!("exponent", ["x"], 1, math::exponent),
    builtin!("mantissa", ["x"], 1, math::mantissa),
    builtin!("abs", ["n"], 1, math::abs),
    builtin!("sign", ["n"], 1, math::sign),
    builtin!("max", ["a", "b"], 2, math::max),
    builtin!("min", ["a", "b"], 2, math::min),
    builtin!("sin", ["x"], 1, math::sin),
    builtin!("cos", ["x"], 1, math::cos),
    builtin!("tan", ["x"], 1, math::tan),
    builtin!("asin", ["x"], 1, math::asin),
    builtin!("acos", ["x"], 1, math::acos),
    builtin!("atan", ["x"], 1, math::atan),
    // strings
    builtin!("codepoint", ["str"], 1, strings::codepoint),
    builtin!("char", ["n"], 1, strings::chr),
    builtin!("substr", ["str", "from", "len"], 3, strings::substr),
    builtin!("startsWith", ["a", "b"], 2, strings::starts_with),
    builtin!("endsWith", ["a", "b"], 2, strings::ends_with),
    builtin!("stringChars", ["str"], 1, strings::string_chars),
    builtin!("split", ["str", "c"], 2, strings::split),
    builtin!("splitLimit", ["str", "c", "maxsplits"], 3, strings::split_limit),
    builtin!("strReplace", ["str", "from", "to"], 3, strings::str_replace),
    builtin!("asciiUpper", ["str"], 1, strings::ascii_upper),
    builtin!("asciiLower", ["str"], 1, strings::ascii_lower),
    builtin!("parseInt", ["str"], 1, strings::parse_int),
    builtin!("parseOctal", ["str"], 1, strings::parse_octal),
    builtin!("parseHex", ["str"], 1, strings::parse_hex),
    builtin!("parseJson", ["str"], 1, strings::parse_json),
    builtin!("encodeUTF8", ["str"], 1, strings::encode_utf8),
    builtin!("decodeUTF8", ["arr"], 1, strings::decode_utf8),
    builtin!("format", ["str", "vals"], 2, strings::format),
    builtin!("escapeStringJson", ["str"], 1, strings::escape_string_json),
    builtin!("manifestJsonEx", ["value", "indent", "newline", "key_val_sep"], 2, strings::manifest_json_ex),
    builtin!("md5", ["str"], 1, encoding::md5),
    builtin!("base64", ["input"], 1, encoding::base64),
    builtin!("base64Decode", ["str"], 1, encoding::base64_decode),
    builtin!("base64DecodeBytes", ["str"], 1, encoding::base64_decode_bytes),
    // arrays
    builtin!("makeArray", ["sz", "func"], 2, arrays::make_array),
    builtin!("filter", ["func", "arr"], 2, arrays::filter),
    builtin!("map", ["func", "arr"], 2, arrays::map),
    builtin!("flatMap", ["func", "arr"], 2, arrays::flat_map),
    builtin!("foldl", ["func", "arr", "init"], 3, arrays::foldl),
    builtin!("foldr", ["func", "arr", "init"], 3, arrays::foldr),
    builtin!("join", ["sep", "arr"], 2, arrays::join),
    builtin!("range", ["from", "to"], 2, arrays::range),
    builtin!("reverse", ["arr"], 1, arrays::reverse),
    builtin!("slice", ["indexable", "index", "end", "step"], 4, arrays::slice),
    builtin!("count", ["arr", "x"], 2, arrays::count),
    builtin!("member", ["arr", "x"], 2, arrays::member),
    builtin!("find", ["value", "arr"], 2, arrays::find),
    builtin!("sort", ["arr", "keyF"], 1, arrays::sort),
    builtin!("uniq", ["arr", "keyF"], 1, arrays::uniq),
    builtin!("set", ["arr", "keyF"], 1, arrays::set),
    builtin!("setMember", ["x", "arr", "keyF"], 2, arrays::set_member),
    builtin!("setUnion", ["a", "b", "keyF"], 2, arrays::set_union),
    builtin!("setInter", ["a", "b", "keyF"], 2, arrays::set_inter),
    builtin!("setDiff", ["a", "b", "keyF"], 2, arrays::set_diff),
    // objects
    builtin!("objectFieldsEx", ["obj", "hidden"], 2, objects::object_fields_ex),
    builtin!("objectHasEx", ["obj", "fname", "hidden"], 3, objects::object_has_ex),
];

pub(crate) fn name(index: u32) -> &'static str {
    BUILTINS.get(index as usize).map_or("builtin", |b| b.name)
}

/// Run built-in `index` with the given arguments.
pub(crate) fn call(interp: &mut Interpreter, index: u32, args: Vec<CallArg>) -> EvalResult<Value> {
    let builtin = BUILTINS
        .get(index as usize)
        .ok_or_else(|| internal_error(format!("no built-in #{index}")))?;
    let slots = bind_args(builtin.params, args)?;
    let mut values = Vec::with_capacity(slots.len());
    for (i, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(thunk) => values.push(interp.force(&thunk)?),
            None if i < builtin.required => {
                return Err(call_error(format!("missing argument: {}", builtin.params[i])))
            }
            None => values.push(Value::Null),
        }
    }
    (builtin.imp)(
        interp,
        &Args {
            name: builtin.name,
            values,
        },
    )
}

/// Forced arguments of a built-in call, with typed accessors.
pub(crate) struct Args {
    name: &'static str,
    values: Vec<Value>,
}

impl Args {
    pub(crate) fn value(&self, i: usize) -> &Value {
        &self.values[i]
    }

    pub(crate) fn is_null(&self, i: usize) -> bool {
        matches!(self.values.get(i), Some(Value::Null) | None)
    }

    fn expected(&self, i: usize, expected: &str) -> crate::error::EvalError {
        let got: Vec<&str> = self.values.iter().map(Value::type_name).collect();
        builtin_error(format!(
            "Builtin function {} expected {expected} as argument {} but got ({})",
            self.name,
            i + 1,
            got.join(", ")
        ))
    }

    pub(crate) fn num(&self, i: usize) -> EvalResult<f64> {
        match self.value(i) {
            Value::Number(n) => Ok(*n),
            _ => Err(self.expected(i, "number")),
        }
    }

    /// An integral number within `i64` range.
    pub(crate) fn int(&self, i: usize) -> EvalResult<i64> {
        // 2^63, the first value past `i64::MAX`.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        let n = self.num(i)?;
        if n.fract() != 0.0 {
            return Err(self.error(format!("expected an integer, got {n}")));
        }
        if !(-LIMIT..LIMIT).contains(&n) {
            return Err(self.error(format!("integer {n} is out of range")));
        }
        Ok(n as i64)
    }

    pub(crate) fn str(&self, i: usize) -> EvalResult<Rc<str>> {
        match self.value(i) {
            Value::Str(s) => Ok(s.clone()),
            _ => Err(self.expected(i, "string")),
        }
    }

    pub(crate) fn arr(&self, i: usize) -> EvalResult<Rc<[Thunk]>> {
        match self.value(i) {
            Value::Array(items) => Ok(items.clone()),
            _ => Err(self.expected(i, "array")),
        }
    }

    pub(crate) fn obj(&self, i: usize) -> EvalResult<ObjectId> {
        match self.value(i) {
            Value::Object(obj) => Ok(*obj),
            _ => Err(self.expected(i, "object")),
        }
    }

    pub(crate) fn func(&self, i: usize) -> EvalResult<Rc<FuncValue>> {
        match self.value(i) {
            Value::Function(func) => Ok(func.clone()),
            _ => Err(self.expected(i, "function")),
        }
    }

    pub(crate) fn boolean(&self, i: usize) -> EvalResult<bool> {
        match self.value(i) {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.expected(i, "boolean")),
        }
    }

    /// Optional function argument; `null` means absent.
    pub(crate) fn opt_func(&self, i: usize) -> EvalResult<Option<Rc<FuncValue>>> {
        if self.is_null(i) {
            Ok(None)
        } else {
            self.func(i).map(Some)
        }
    }

    /// Error message prefixed with the built-in's name.
    pub(crate) fn error(&self, message: impl std::fmt::Display) -> crate::error::EvalError {
        builtin_error(format!("std.{}: {message}", self.name))
    }
}

/// Elements of an array or the characters of a string.
pub(crate) fn elements(args: &Args, i: usize) -> EvalResult<Rc<[Thunk]>> {
    match args.value(i) {
        Value::Array(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s
            .chars()
            .map(|c| Thunk::done(Value::string(c.to_string())))
            .collect()),
        _ => Err(args.expected(i, "array or string")),
    }
}
