//! String built-ins.

use super::Args;
use crate::error::EvalResult;
use crate::interpreter::Interpreter;
use crate::manifest::{escape_json, JsonStyle};
use crate::value::Value;
use memchr::memmem;

pub(super) fn codepoint(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Number(f64::from(c as u32))),
        _ => Err(args.error(format!(
            "expected a single character, got {} characters",
            s.chars().count()
        ))),
    }
}

pub(super) fn chr(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let n = args.int(0)?;
    u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .map(|c| Value::string(c.to_string()))
        .ok_or_else(|| args.error(format!("invalid unicode codepoint, got {n}")))
}

pub(super) fn substr(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let from = args.int(1)?;
    let len = args.int(2)?;
    if from < 0 {
        return Err(args.error(format!("from must be non-negative, got {from}")));
    }
    if len < 0 {
        return Err(args.error(format!("len must be non-negative, got {len}")));
    }
    let out: String = s.chars().skip(from as usize).take(len as usize).collect();
    Ok(Value::string(out))
}

pub(super) fn starts_with(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(args.str(0)?.starts_with(&*args.str(1)?)))
}

pub(super) fn ends_with(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Bool(args.str(0)?.ends_with(&*args.str(1)?)))
}

pub(super) fn string_chars(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    Ok(Value::array_of(s.chars().map(|c| Value::string(c.to_string()))))
}

/// Split `s` on every occurrence of `sep`, at most `limit` times.
fn split_on(s: &str, sep: &str, limit: Option<usize>) -> Vec<Value> {
    let mut parts = Vec::new();
    let mut start = 0;
    for pos in memmem::find_iter(s.as_bytes(), sep.as_bytes()) {
        if limit.is_some_and(|l| parts.len() >= l) {
            break;
        }
        if pos < start {
            continue;
        }
        parts.push(Value::string(&s[start..pos]));
        start = pos + sep.len();
    }
    parts.push(Value::string(&s[start..]));
    parts
}

pub(super) fn split(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let sep = args.str(1)?;
    if sep.is_empty() {
        return Err(args.error("separator cannot be empty"));
    }
    Ok(Value::array_of(split_on(&s, &sep, None)))
}

pub(super) fn split_limit(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let sep = args.str(1)?;
    let max = args.int(2)?;
    if sep.is_empty() {
        return Err(args.error("separator cannot be empty"));
    }
    let limit = usize::try_from(max).ok();
    if limit.is_none() && max != -1 {
        return Err(args.error(format!("maxsplits must be -1 or non-negative, got {max}")));
    }
    Ok(Value::array_of(split_on(&s, &sep, limit)))
}

pub(super) fn str_replace(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let from = args.str(1)?;
    let to = args.str(2)?;
    if from.is_empty() {
        return Err(args.error("'from' string must not be empty"));
    }
    Ok(Value::string(s.replace(&*from, &to)))
}

pub(super) fn ascii_upper(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::string(args.str(0)?.to_ascii_uppercase()))
}

pub(super) fn ascii_lower(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::string(args.str(0)?.to_ascii_lowercase()))
}

fn parse_radix(args: &Args, digits: &str, radix: u32, what: &str) -> EvalResult<f64> {
    if digits.is_empty() {
        return Err(args.error(format!("{what} cannot be empty")));
    }
    let mut n = 0.0f64;
    for c in digits.chars() {
        let d = c
            .to_digit(radix)
            .ok_or_else(|| args.error(format!("{digits:?} is not a {what}")))?;
        n = n * f64::from(radix) + f64::from(d);
    }
    Ok(n)
}

pub(super) fn parse_int(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, &*s),
    };
    let n = parse_radix(args, digits, 10, "base 10 integer")?;
    Ok(Value::Number(if negative { -n } else { n }))
}

pub(super) fn parse_octal(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    Ok(Value::Number(parse_radix(args, &s, 8, "base 8 integer")?))
}

pub(super) fn parse_hex(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    Ok(Value::Number(parse_radix(args, &s, 16, "base 16 integer")?))
}

pub(super) fn parse_json(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    let json: serde_json::Value =
        serde_json::from_str(&s).map_err(|e| args.error(format!("failed to parse JSON: {e}")))?;
    Ok(interp.from_json(&json))
}

pub(super) fn encode_utf8(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = args.str(0)?;
    Ok(Value::array_of(s.bytes().map(|b| Value::Number(f64::from(b)))))
}

/// Byte values of an array of numbers in `0..=255`.
pub(super) fn bytes(interp: &mut Interpreter, args: &Args, i: usize) -> EvalResult<Vec<u8>> {
    let items = args.arr(i)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items.iter() {
        match interp.force(item)? {
            Value::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(&n) => out.push(n as u8),
            other => {
                return Err(args.error(format!(
                    "expected an array of bytes, found {}",
                    match other {
                        Value::Number(n) => n.to_string(),
                        other => other.type_name().to_string(),
                    }
                )))
            }
        }
    }
    Ok(out)
}

pub(super) fn decode_utf8(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let bytes = bytes(interp, args, 0)?;
    Ok(Value::string(String::from_utf8_lossy(&bytes).into_owned()))
}

pub(super) fn format(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let fmt = args.str(0)?;
    Ok(Value::string(interp.format(&fmt, args.value(1).clone())?))
}

pub(super) fn escape_string_json(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let s = interp.to_string_value(args.value(0).clone())?;
    Ok(Value::string(escape_json(&s)))
}

pub(super) fn manifest_json_ex(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let indent = args.str(1)?;
    let newline = if args.is_null(2) { "\n".into() } else { args.str(2)? };
    let key_sep = if args.is_null(3) { ": ".into() } else { args.str(3)? };
    let style = JsonStyle {
        indent: &indent,
        newline: &newline,
        key_sep: &key_sep,
        item_sep: ",",
    };
    Ok(Value::string(interp.manifest_with(args.value(0).clone(), &style)?))
}
