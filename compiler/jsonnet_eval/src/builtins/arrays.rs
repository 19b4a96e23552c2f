//! Array and set built-ins.
//!
//! Sets are sorted, duplicate-free arrays; every set operation takes an
//! optional `keyF` applied to elements before comparing them.

use super::{elements, Args};
use crate::error::{EvalError, EvalResult};
use crate::interpreter::{CallArg, Interpreter};
use crate::thunk::Thunk;
use crate::value::{FuncValue, Value};
use std::cmp::Ordering;
use std::rc::Rc;

/// Largest array `makeArray` and `range` will build.
const MAX_ARRAY_LEN: i64 = (1 << 31) - 1;

/// Room for `len` elements, failing instead of aborting on huge sizes.
fn with_len<T>(args: &Args, len: i64) -> EvalResult<Vec<T>> {
    if len > MAX_ARRAY_LEN {
        return Err(args.error(format!("array of {len} elements is too large")));
    }
    let mut items = Vec::new();
    items
        .try_reserve_exact(usize::try_from(len).unwrap_or(0))
        .map_err(|err| args.error(err))?;
    Ok(items)
}

pub(super) fn make_array(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let size = args.int(0)?;
    let func = args.func(1)?;
    if size < 0 {
        return Err(args.error(format!("size must be non-negative, got {size}")));
    }
    let mut items = with_len(args, size)?;
    items.extend(
        (0..size).map(|i| Thunk::call(func.clone(), vec![Thunk::done(Value::Number(i as f64))])),
    );
    Ok(Value::array(items))
}

pub(super) fn map(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let func = args.func(0)?;
    let items = elements(args, 1)?;
    Ok(Value::array(
        items
            .iter()
            .map(|item| Thunk::call(func.clone(), vec![item.clone()]))
            .collect(),
    ))
}

pub(super) fn filter(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let func = args.func(0)?;
    let items = args.arr(1)?;
    let mut kept = Vec::new();
    for item in items.iter() {
        let value = interp.force(item)?;
        match interp.apply(&func, vec![value])? {
            Value::Bool(true) => kept.push(item.clone()),
            Value::Bool(false) => {}
            other => {
                return Err(args.error(format!(
                    "filter function must return boolean, got {}",
                    other.type_name()
                )))
            }
        }
    }
    Ok(Value::array(kept))
}

pub(super) fn flat_map(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let func = args.func(0)?;
    let call = |interp: &mut Interpreter, item: &Thunk| -> EvalResult<Value> {
        interp.call(&func, vec![CallArg::positional(item.clone())])
    };
    match args.value(1) {
        Value::Str(s) => {
            let mut out = String::new();
            for c in s.chars() {
                match call(interp, &Thunk::done(Value::string(c.to_string())))? {
                    Value::Str(part) => out.push_str(&part),
                    Value::Null => {}
                    other => {
                        return Err(args.error(format!(
                            "flatMap on a string must return strings, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::string(out))
        }
        _ => {
            let items = args.arr(1)?;
            let mut out = Vec::new();
            for item in items.iter() {
                match call(interp, item)? {
                    Value::Array(part) => out.extend(part.iter().cloned()),
                    other => {
                        return Err(args.error(format!(
                            "flatMap function must return an array, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::array(out))
        }
    }
}

pub(super) fn foldl(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let func = args.func(0)?;
    let items = elements(args, 1)?;
    let mut acc = args.value(2).clone();
    for item in items.iter() {
        let value = interp.force(item)?;
        acc = interp.apply(&func, vec![acc, value])?;
    }
    Ok(acc)
}

pub(super) fn foldr(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let func = args.func(0)?;
    let items = elements(args, 1)?;
    let mut acc = args.value(2).clone();
    for item in items.iter().rev() {
        let value = interp.force(item)?;
        acc = interp.apply(&func, vec![value, acc])?;
    }
    Ok(acc)
}

pub(super) fn join(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(1)?;
    match args.value(0) {
        Value::Str(sep) => {
            let mut out = String::new();
            let mut first = true;
            for item in items.iter() {
                match interp.force(item)? {
                    Value::Null => continue,
                    Value::Str(s) => {
                        if !first {
                            out.push_str(sep);
                        }
                        first = false;
                        out.push_str(&s);
                    }
                    other => {
                        return Err(args.error(format!(
                            "expected string elements, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::string(out))
        }
        Value::Array(sep) => {
            let mut out: Vec<Thunk> = Vec::new();
            let mut first = true;
            for item in items.iter() {
                match interp.force(item)? {
                    Value::Null => continue,
                    Value::Array(part) => {
                        if !first {
                            out.extend(sep.iter().cloned());
                        }
                        first = false;
                        out.extend(part.iter().cloned());
                    }
                    other => {
                        return Err(args.error(format!(
                            "expected array elements, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::array(out))
        }
        other => Err(args.error(format!(
            "separator must be a string or an array, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn range(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let from = args.int(0)?;
    let to = args.int(1)?;
    let len = i128::from(to) - i128::from(from) + 1;
    let mut items = with_len(args, i64::try_from(len).unwrap_or(i64::MAX))?;
    items.extend((from..=to).map(|i| Thunk::done(Value::Number(i as f64))));
    Ok(Value::array(items))
}

pub(super) fn reverse(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(0)?;
    Ok(Value::array(items.iter().rev().cloned().collect()))
}

/// Resolve a possibly negative slice bound against `len`.
fn bound(args: &Args, i: usize, len: usize, default: usize) -> EvalResult<usize> {
    if args.is_null(i) {
        return Ok(default);
    }
    let n = args.int(i)?;
    Ok(if n < 0 {
        len.saturating_sub(n.unsigned_abs() as usize)
    } else {
        (n as usize).min(len)
    })
}

pub(super) fn slice(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let step = if args.is_null(3) { 1 } else { args.int(3)? };
    if step <= 0 {
        return Err(args.error(format!("step must be greater than 0, got {step}")));
    }
    let step = step as usize;
    match args.value(0) {
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let start = bound(args, 1, chars.len(), 0)?;
            let end = bound(args, 2, chars.len(), chars.len())?;
            let out: String = chars
                .get(start..end.max(start))
                .unwrap_or_default()
                .iter()
                .step_by(step)
                .collect();
            Ok(Value::string(out))
        }
        Value::Array(items) => {
            let start = bound(args, 1, items.len(), 0)?;
            let end = bound(args, 2, items.len(), items.len())?;
            Ok(Value::array(
                items
                    .get(start..end.max(start))
                    .unwrap_or_default()
                    .iter()
                    .step_by(step)
                    .cloned()
                    .collect(),
            ))
        }
        other => Err(args.error(format!(
            "only strings and arrays can be sliced, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn count(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(0)?;
    let mut n = 0;
    for item in items.iter() {
        let value = interp.force(item)?;
        if interp.equals(&value, args.value(1))? {
            n += 1;
        }
    }
    Ok(Value::Number(f64::from(n)))
}

pub(super) fn member(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    match args.value(0) {
        Value::Str(s) => {
            let needle = args.str(1)?;
            Ok(Value::Bool(s.contains(&*needle)))
        }
        _ => {
            let items = args.arr(0)?;
            for item in items.iter() {
                let value = interp.force(item)?;
                if interp.equals(&value, args.value(1))? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
    }
}

pub(super) fn find(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(1)?;
    let mut found = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let value = interp.force(item)?;
        if interp.equals(&value, args.value(0))? {
            found.push(Value::Number(i as f64));
        }
    }
    Ok(Value::array_of(found))
}

/// Elements paired with their sort keys.
fn with_keys(
    interp: &mut Interpreter,
    items: &[Thunk],
    key_f: Option<&Rc<FuncValue>>,
) -> EvalResult<Vec<(Thunk, Value)>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let value = interp.force(item)?;
        let key = match key_f {
            Some(f) => interp.apply(f, vec![value])?,
            None => value,
        };
        out.push((item.clone(), key));
    }
    Ok(out)
}

fn key_of(interp: &mut Interpreter, value: Value, key_f: Option<&Rc<FuncValue>>) -> EvalResult<Value> {
    match key_f {
        Some(f) => interp.apply(f, vec![value]),
        None => Ok(value),
    }
}

/// Stable sort by key; the first comparison error wins.
fn sort_keyed(interp: &mut Interpreter, keyed: &mut [(Thunk, Value)]) -> EvalResult<()> {
    let mut failure: Option<EvalError> = None;
    keyed.sort_by(|(_, a), (_, b)| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        interp.compare(a, b, "<").unwrap_or_else(|e| {
            failure = Some(e);
            Ordering::Equal
        })
    });
    failure.map_or(Ok(()), Err)
}

fn dedup_keyed(interp: &mut Interpreter, keyed: Vec<(Thunk, Value)>) -> EvalResult<Vec<Thunk>> {
    let mut out: Vec<(Thunk, Value)> = Vec::with_capacity(keyed.len());
    for (item, key) in keyed {
        if let Some((_, last)) = out.last() {
            if interp.equals(last, &key)? {
                continue;
            }
        }
        out.push((item, key));
    }
    Ok(out.into_iter().map(|(item, _)| item).collect())
}

pub(super) fn sort(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = elements(args, 0)?;
    let key_f = args.opt_func(1)?;
    let mut keyed = with_keys(interp, &items, key_f.as_ref())?;
    sort_keyed(interp, &mut keyed)?;
    Ok(Value::array(keyed.into_iter().map(|(item, _)| item).collect()))
}

pub(super) fn uniq(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(0)?;
    let key_f = args.opt_func(1)?;
    let keyed = with_keys(interp, &items, key_f.as_ref())?;
    Ok(Value::array(dedup_keyed(interp, keyed)?))
}

pub(super) fn set(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = elements(args, 0)?;
    let key_f = args.opt_func(1)?;
    let mut keyed = with_keys(interp, &items, key_f.as_ref())?;
    sort_keyed(interp, &mut keyed)?;
    Ok(Value::array(dedup_keyed(interp, keyed)?))
}

pub(super) fn set_member(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let items = args.arr(1)?;
    let key_f = args.opt_func(2)?;
    let needle = key_of(interp, args.value(0).clone(), key_f.as_ref())?;
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let value = interp.force(&items[mid])?;
        let key = key_of(interp, value, key_f.as_ref())?;
        match interp.compare(&key, &needle, "<")? {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(Value::Bool(true)),
        }
    }
    Ok(Value::Bool(false))
}

/// Which elements a merge of two sorted sets keeps.
#[derive(Copy, Clone, PartialEq, Eq)]
enum SetOp {
    Union,
    Inter,
    Diff,
}

fn merge(interp: &mut Interpreter, args: &Args, op: SetOp) -> EvalResult<Value> {
    let a = args.arr(0)?;
    let b = args.arr(1)?;
    let key_f = args.opt_func(2)?;
    let a = with_keys(interp, &a, key_f.as_ref())?;
    let b = with_keys(interp, &b, key_f.as_ref())?;
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        match interp.compare(&a[i].1, &b[j].1, "<")? {
            Ordering::Less => {
                if op != SetOp::Inter {
                    out.push(a[i].0.clone());
                }
                i += 1;
            }
            Ordering::Greater => {
                if op == SetOp::Union {
                    out.push(b[j].0.clone());
                }
                j += 1;
            }
            Ordering::Equal => {
                if op != SetOp::Diff {
                    out.push(a[i].0.clone());
                }
                i += 1;
                j += 1;
            }
        }
    }
    if op != SetOp::Inter {
        out.extend(a[i..].iter().map(|(item, _)| item.clone()));
    }
    if op == SetOp::Union {
        out.extend(b[j..].iter().map(|(item, _)| item.clone()));
    }
    Ok(Value::array(out))
}

pub(super) fn set_union(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    merge(interp, args, SetOp::Union)
}

pub(super) fn set_inter(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    merge(interp, args, SetOp::Inter)
}

pub(super) fn set_diff(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    merge(interp, args, SetOp::Diff)
}
