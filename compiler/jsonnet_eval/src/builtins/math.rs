//! Numeric built-ins.

use super::Args;
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::interpreter::{check_number, Interpreter};
use crate::value::Value;

/// The `%` operator: remainder on numbers, formatting on strings.
pub(super) fn modulo_op(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    interp.modulo(args.value(0).clone(), args.value(1).clone())
}

pub(super) fn modulo(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let (x, y) = (args.num(0)?, args.num(1)?);
    if y == 0.0 {
        return Err(EvalError::new(EvalErrorKind::DivisionByZero));
    }
    check_number(x % y)
}

fn unary(args: &Args, f: fn(f64) -> f64) -> EvalResult<Value> {
    check_number(f(args.num(0)?))
}

pub(super) fn floor(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::floor)
}

pub(super) fn ceil(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::ceil)
}

pub(super) fn sqrt(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::sqrt)
}

pub(super) fn exp(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::exp)
}

pub(super) fn log(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::ln)
}

pub(super) fn abs(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::abs)
}

pub(super) fn sin(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::sin)
}

pub(super) fn cos(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::cos)
}

pub(super) fn tan(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::tan)
}

pub(super) fn asin(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::asin)
}

pub(super) fn acos(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::acos)
}

pub(super) fn atan(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    unary(args, f64::atan)
}

pub(super) fn sign(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let n = args.num(0)?;
    Ok(Value::Number(if n > 0.0 {
        1.0
    } else if n < 0.0 {
        -1.0
    } else {
        0.0
    }))
}

pub(super) fn pow(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    check_number(args.num(0)?.powf(args.num(1)?))
}

pub(super) fn max(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Number(args.num(0)?.max(args.num(1)?)))
}

pub(super) fn min(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Number(args.num(0)?.min(args.num(1)?)))
}

/// Split `x` into a mantissa in `[0.5, 1)` and a power of two.
pub(crate) fn frexp(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let mut exp = x.abs().log2().floor() as i32 + 1;
    let mut mantissa = x / 2f64.powi(exp);
    // log2 can be off by one near powers of two.
    if mantissa.abs() >= 1.0 {
        mantissa /= 2.0;
        exp += 1;
    } else if mantissa.abs() < 0.5 {
        mantissa *= 2.0;
        exp -= 1;
    }
    (mantissa, exp)
}

pub(super) fn exponent(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Number(f64::from(frexp(args.num(0)?).1)))
}

pub(super) fn mantissa(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::Number(frexp(args.num(0)?).0))
}
