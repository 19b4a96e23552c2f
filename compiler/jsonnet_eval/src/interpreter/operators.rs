//! Binary and unary operators, equality and ordering.

use super::Interpreter;
use crate::error::{binary_type_mismatch, type_error, EvalError, EvalErrorKind, EvalResult};
use crate::heap::EnvId;
use crate::value::{Ctx, Value};
use jsonnet_ir::{BinaryOp, CoreId, UnaryOp};
use std::cmp::Ordering;

/// Reject NaN and infinities produced by arithmetic.
pub(crate) fn check_number(n: f64) -> EvalResult<Value> {
    if n.is_nan() {
        Err(EvalError::new(EvalErrorKind::NotANumber))
    } else if n.is_infinite() {
        Err(EvalError::new(EvalErrorKind::Overflow))
    } else {
        Ok(Value::Number(n))
    }
}

impl Interpreter {
    pub(super) fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: CoreId,
        right: CoreId,
        env: EnvId,
        ctx: Ctx,
    ) -> EvalResult<Value> {
        match op {
            BinaryOp::And | BinaryOp::Or => {
                let short = op == BinaryOp::Or;
                match self.eval(left, env, ctx)? {
                    Value::Bool(b) if b == short => Ok(Value::Bool(short)),
                    Value::Bool(_) => match self.eval(right, env, ctx)? {
                        Value::Bool(b) => Ok(Value::Bool(b)),
                        other => Err(binary_type_mismatch(op.as_symbol(), "boolean", other.type_name())),
                    },
                    other => Err(binary_type_mismatch(op.as_symbol(), other.type_name(), "boolean")),
                }
            }
            _ => {
                let l = self.eval(left, env, ctx)?;
                let r = self.eval(right, env, ctx)?;
                self.binary(op, l, r)
            }
        }
    }

    /// Apply a strict binary operator to evaluated operands.
    pub(crate) fn binary(&mut self, op: BinaryOp, l: Value, r: Value) -> EvalResult<Value> {
        match op {
            BinaryOp::Add => self.add(l, r),
            BinaryOp::Eq => Ok(Value::Bool(self.equals(&l, &r)?)),
            BinaryOp::Ne => Ok(Value::Bool(!self.equals(&l, &r)?)),
            BinaryOp::Mod => self.modulo(l, r),
            BinaryOp::In => match (&l, &r) {
                (Value::Str(name), Value::Object(obj)) => {
                    Ok(Value::Bool(self.object_has(*obj, name, true)))
                }
                _ => Err(binary_type_mismatch("in", l.type_name(), r.type_name())),
            },
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ord = self.compare(&l, &r, op.as_symbol())?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ord == Ordering::Less,
                    BinaryOp::Le => ord != Ordering::Greater,
                    BinaryOp::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                }))
            }
            BinaryOp::And | BinaryOp::Or => match (&l, &r) {
                (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                    *a && *b
                } else {
                    *a || *b
                })),
                _ => Err(binary_type_mismatch(op.as_symbol(), l.type_name(), r.type_name())),
            },
            _ => {
                let (Value::Number(a), Value::Number(b)) = (&l, &r) else {
                    return Err(binary_type_mismatch(op.as_symbol(), l.type_name(), r.type_name()));
                };
                arithmetic(op, *a, *b)
            }
        }
    }

    /// `+` on any pair of operands.
    pub(crate) fn add(&mut self, l: Value, r: Value) -> EvalResult<Value> {
        match (l, r) {
            (Value::Number(a), Value::Number(b)) => check_number(a + b),
            (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{a}{b}"))),
            (Value::Str(a), other) => {
                let b = self.to_string_value(other)?;
                Ok(Value::string(format!("{a}{b}")))
            }
            (other, Value::Str(b)) => {
                let a = self.to_string_value(other)?;
                Ok(Value::string(format!("{a}{b}")))
            }
            (Value::Array(a), Value::Array(b)) => {
                Ok(Value::Array(a.iter().chain(b.iter()).cloned().collect()))
            }
            (Value::Object(a), Value::Object(b)) => Ok(Value::Object(self.extend_object(a, b))),
            (l, r) => Err(binary_type_mismatch("+", l.type_name(), r.type_name())),
        }
    }

    /// `%`: floating-point remainder on numbers, formatting on strings.
    pub(crate) fn modulo(&mut self, l: Value, r: Value) -> EvalResult<Value> {
        match (l, r) {
            (Value::Number(a), Value::Number(b)) => {
                if b == 0.0 {
                    return Err(EvalError::new(EvalErrorKind::DivisionByZero));
                }
                check_number(a % b)
            }
            (Value::Str(format), args) => {
                let formatted = self.format(&format, args)?;
                Ok(Value::string(formatted))
            }
            (l, r) => Err(binary_type_mismatch("%", l.type_name(), r.type_name())),
        }
    }

    pub(crate) fn unary(&mut self, op: UnaryOp, value: Value) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::BitNot, Value::Number(n)) => Ok(Value::Number(!(n as i64) as f64)),
            (op, value) => Err(type_error(format!(
                "unary operator {op} does not operate on type {}",
                value.type_name()
            ))),
        }
    }

    /// Structural equality. Functions cannot be compared.
    pub(crate) fn equals(&mut self, l: &Value, r: &Value) -> EvalResult<bool> {
        match (l, r) {
            (Value::Null, Value::Null) => Ok(true),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Number(a), Value::Number(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::Array(a), Value::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    let x = self.force(x)?;
                    let y = self.force(y)?;
                    if !self.equals(&x, &y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Object(a), Value::Object(b)) => {
                let fields = self.object_fields(*a, false);
                if fields != self.object_fields(*b, false) {
                    return Ok(false);
                }
                for name in &fields {
                    let x = self.index(Value::Object(*a), Value::Str(name.clone()))?;
                    let y = self.index(Value::Object(*b), Value::Str(name.clone()))?;
                    if !self.equals(&x, &y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Function(_), Value::Function(_)) => {
                Err(type_error("cannot test equality of functions"))
            }
            _ => Ok(false),
        }
    }

    /// Ordering for `<` and friends and for sorting.
    pub(crate) fn compare(&mut self, l: &Value, r: &Value, op: &str) -> EvalResult<Ordering> {
        match (l, r) {
            // NaN never reaches here; `check_number` rejects it.
            (Value::Number(a), Value::Number(b)) => {
                Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal))
            }
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let x = self.force(x)?;
                    let y = self.force(y)?;
                    let ord = self.compare(&x, &y, op)?;
                    if ord != Ordering::Equal {
                        return Ok(ord);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            _ => Err(binary_type_mismatch(op, l.type_name(), r.type_name())),
        }
    }
}

fn arithmetic(op: BinaryOp, a: f64, b: f64) -> EvalResult<Value> {
    match op {
        BinaryOp::Sub => check_number(a - b),
        BinaryOp::Mul => check_number(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(EvalError::new(EvalErrorKind::DivisionByZero));
            }
            check_number(a / b)
        }
        BinaryOp::Shl | BinaryOp::Shr => {
            if b < 0.0 {
                return Err(type_error("shift by negative exponent."));
            }
            let shift = (b as i64 % 64) as u32;
            let a = a as i64;
            Ok(Value::Number(if op == BinaryOp::Shl {
                a.wrapping_shl(shift)
            } else {
                a >> shift
            } as f64))
        }
        BinaryOp::BitAnd => Ok(Value::Number(((a as i64) & (b as i64)) as f64)),
        BinaryOp::BitXor => Ok(Value::Number(((a as i64) ^ (b as i64)) as f64)),
        BinaryOp::BitOr => Ok(Value::Number(((a as i64) | (b as i64)) as f64)),
        _ => Err(binary_type_mismatch(op.as_symbol(), "number", "number")),
    }
}
