//! printf-style formatting: number rendering for manifestation and the
//! `%` operator / `std.format`.

use crate::error::{type_error, EvalResult};
use crate::interpreter::Interpreter;
use crate::thunk::Thunk;
use crate::value::Value;
use std::rc::Rc;

/// Render a number the way manifestation does: integers without a
/// fraction, everything else with 17 significant digits.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format_g(n, 17, false)
    }
}

/// C `%.{prec}e`.
pub(crate) fn format_e(n: f64, prec: usize, alt: bool) -> String {
    let s = format!("{n:.prec$e}");
    let (mantissa, exp) = s.split_once('e').unwrap_or((&s, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let dot = if alt && prec == 0 { "." } else { "" };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{dot}e{sign}{:02}", exp.abs())
}

/// C `%.{prec}f`.
pub(crate) fn format_f(n: f64, prec: usize, alt: bool) -> String {
    let mut s = format!("{n:.prec$}");
    if alt && prec == 0 {
        s.push('.');
    }
    s
}

/// C `%.{prec}g`.
pub(crate) fn format_g(n: f64, prec: usize, alt: bool) -> String {
    let p = prec.max(1);
    let exp = if n == 0.0 {
        0
    } else {
        let sci = format!("{n:.*e}", p - 1);
        sci.split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };
    if exp < -4 || exp >= p as i32 {
        let s = format_e(n, p - 1, alt);
        if alt {
            return s;
        }
        match s.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", strip_zeros(mantissa)),
            None => s,
        }
    } else {
        let s = format_f(n, (p as i32 - 1 - exp).max(0) as usize, alt);
        if alt {
            s
        } else {
            strip_zeros(&s).to_string()
        }
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Width {
    Fixed(usize),
    /// `*`: taken from the next value.
    Star,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Spec {
    key: Option<String>,
    alt: bool,
    zero: bool,
    left: bool,
    blank: bool,
    plus: bool,
    width: Width,
    precision: Option<Width>,
    conv: char,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Code(Spec),
}

fn parse_format(fmt: &str) -> EvalResult<Vec<Piece>> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut i = 0;
    let truncated = || type_error("truncated format code.");
    while i < chars.len() {
        if chars[i] != '%' {
            literal.push(chars[i]);
            i += 1;
            continue;
        }
        i += 1;
        let mut key = None;
        if chars.get(i) == Some(&'(') {
            let start = i + 1;
            let end = chars[start..]
                .iter()
                .position(|c| *c == ')')
                .ok_or_else(truncated)?;
            key = Some(chars[start..start + end].iter().collect());
            i = start + end + 1;
        }
        let mut spec = Spec {
            key,
            alt: false,
            zero: false,
            left: false,
            blank: false,
            plus: false,
            width: Width::Fixed(0),
            precision: None,
            conv: '%',
        };
        while let Some(c) = chars.get(i) {
            match c {
                '#' => spec.alt = true,
                '0' => spec.zero = true,
                '-' => spec.left = true,
                ' ' => spec.blank = true,
                '+' => spec.plus = true,
                _ => break,
            }
            i += 1;
        }
        spec.width = parse_width(&chars, &mut i);
        if chars.get(i) == Some(&'.') {
            i += 1;
            spec.precision = Some(parse_width(&chars, &mut i));
        }
        while matches!(chars.get(i), Some('h' | 'l' | 'L')) {
            i += 1;
        }
        let conv = *chars.get(i).ok_or_else(truncated)?;
        i += 1;
        if !"diuoxXeEfFgGcs%".contains(conv) {
            return Err(type_error(format!("unrecognised conversion type: {conv}")));
        }
        if conv == '%' && spec.key.is_none() {
            literal.push('%');
            continue;
        }
        spec.conv = conv;
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(Piece::Code(spec));
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

fn parse_width(chars: &[char], i: &mut usize) -> Width {
    if chars.get(*i) == Some(&'*') {
        *i += 1;
        return Width::Star;
    }
    let mut n = 0usize;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        n = n.saturating_mul(10).saturating_add(d as usize);
        *i += 1;
    }
    Width::Fixed(n)
}

/// Sign, zero padding and body of a numeric conversion.
fn pad_number(negative: bool, prefix: &str, body: &str, width: usize, spec: &Spec) -> String {
    let sign = if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.blank {
        " "
    } else {
        ""
    };
    let used = sign.len() + prefix.len() + body.chars().count();
    let zeros = if spec.zero && !spec.left {
        width.saturating_sub(used)
    } else {
        0
    };
    format!("{sign}{prefix}{}{body}", "0".repeat(zeros))
}

fn pad(s: &str, width: usize, left: bool) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let fill = " ".repeat(width - len);
    if left {
        format!("{s}{fill}")
    } else {
        format!("{fill}{s}")
    }
}

impl Interpreter {
    /// `fmt % args`: `args` is an array of values, an object for `%(key)`
    /// codes, or a single value.
    pub(crate) fn format(&mut self, fmt: &str, args: Value) -> EvalResult<String> {
        let pieces = parse_format(fmt)?;
        let (values, mapping): (Rc<[Thunk]>, _) = match args {
            Value::Array(items) => (items, None),
            Value::Object(obj) => (Rc::from(Vec::new()), Some(obj)),
            other => (Rc::from(vec![Thunk::done(other)]), None),
        };
        let mut next = 0;
        let mut out = String::new();
        for piece in pieces {
            let spec = match piece {
                Piece::Literal(s) => {
                    out.push_str(&s);
                    continue;
                }
                Piece::Code(spec) => spec,
            };
            let mut take = |interp: &mut Interpreter| -> EvalResult<Value> {
                let thunk = values.get(next).cloned().ok_or_else(|| {
                    type_error(format!("not enough values to format, got {}", values.len()))
                })?;
                next += 1;
                interp.force(&thunk)
            };
            let mut star = |interp: &mut Interpreter, w: Width| -> EvalResult<usize> {
                match w {
                    Width::Fixed(n) => Ok(n),
                    Width::Star => match take(interp)? {
                        Value::Number(n) => Ok(n.max(0.0) as usize),
                        other => Err(type_error(format!(
                            "a * width or precision must be a number, got {}",
                            other.type_name()
                        ))),
                    },
                }
            };
            let width = star(self, spec.width)?;
            let precision = match spec.precision {
                Some(p) => Some(star(self, p)?),
                None => None,
            };
            let value = match (&spec.key, mapping) {
                (Some(key), Some(obj)) => self.index(Value::Object(obj), Value::string(key.as_str()))?,
                (Some(_), None) => {
                    return Err(type_error("mapping keys require an object to format"));
                }
                (None, _) => take(self)?,
            };
            let rendered = self.format_code(&spec, value, width, precision)?;
            out.push_str(&pad(&rendered, width, spec.left));
        }
        if mapping.is_none() && next < values.len() {
            return Err(type_error(format!(
                "too many values to format: {}, expected {next}",
                values.len()
            )));
        }
        Ok(out)
    }

    fn format_code(
        &mut self,
        spec: &Spec,
        value: Value,
        width: usize,
        precision: Option<usize>,
    ) -> EvalResult<String> {
        match spec.conv {
            's' => return Ok(self.to_string_value(value)?.to_string()),
            '%' => return Ok("%".to_string()),
            'c' => {
                return match value {
                    Value::Number(n) => char::from_u32(n as u32)
                        .map(String::from)
                        .ok_or_else(|| type_error(format!("invalid codepoint {n}"))),
                    Value::Str(s) if s.chars().count() == 1 => Ok(s.to_string()),
                    other => Err(type_error(format!(
                        "%c expected number or single-character string, got {}",
                        other.type_name()
                    ))),
                }
            }
            _ => {}
        }
        let Value::Number(n) = value else {
            return Err(type_error(format!(
                "format required number for %{}, got {}",
                spec.conv,
                value.type_name()
            )));
        };
        let negative = n < 0.0;
        let abs = n.abs();
        let prec = precision.unwrap_or(6);
        let (prefix, body) = match spec.conv {
            'd' | 'i' | 'u' => {
                let digits = format!("{:.0}", abs.trunc());
                let min = precision.unwrap_or(0);
                ("", format!("{}{digits}", "0".repeat(min.saturating_sub(digits.len()))))
            }
            'o' => ("", format!("{}{:o}", if spec.alt { "0" } else { "" }, abs as u64)),
            'x' => (if spec.alt { "0x" } else { "" }, format!("{:x}", abs as u64)),
            'X' => (if spec.alt { "0X" } else { "" }, format!("{:X}", abs as u64)),
            'e' => ("", format_e(abs, prec, spec.alt)),
            'E' => ("", format_e(abs, prec, spec.alt).to_uppercase()),
            'f' | 'F' => ("", format_f(abs, prec, spec.alt)),
            'g' => ("", format_g(abs, prec, spec.alt)),
            _ => ("", format_g(abs, prec, spec.alt).to_uppercase()),
        };
        Ok(pad_number(negative && abs != 0.0, prefix, &body, width, spec))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1), "0.10000000000000001");
        assert_eq!(format_number(1e-7), "9.9999999999999995e-08");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn test_printf_conversions() {
        assert_eq!(format_e(12345.678, 2, false), "1.23e+04");
        assert_eq!(format_e(0.0, 0, true), "0.e+00");
        assert_eq!(format_f(3.14159, 2, false), "3.14");
        assert_eq!(format_g(100000.0, 6, false), "100000");
        assert_eq!(format_g(1_000_000.0, 6, false), "1e+06");
        assert_eq!(format_g(0.0001, 6, false), "0.0001");
        assert_eq!(format_g(0.00001, 6, false), "1e-05");
        assert_eq!(format_g(1.5, 6, true), "1.50000");
    }

    #[test]
    fn test_parse_format() {
        let pieces = parse_format("a%%b%-5.2f%(k)s").unwrap();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0], Piece::Literal("a%b".to_string()));
        let Piece::Code(spec) = &pieces[1] else {
            panic!("expected a code");
        };
        assert!(spec.left);
        assert_eq!(spec.width, Width::Fixed(5));
        assert_eq!(spec.precision, Some(Width::Fixed(2)));
        assert_eq!(spec.conv, 'f');
        let Piece::Code(spec) = &pieces[2] else {
            panic!("expected a code");
        };
        assert_eq!(spec.key.as_deref(), Some("k"));
        assert!(parse_format("%").is_err());
        assert!(parse_format("%z").is_err());
    }

    #[test]
    fn test_padding() {
        let spec = Spec {
            key: None,
            alt: false,
            zero: true,
            left: false,
            blank: false,
            plus: false,
            width: Width::Fixed(6),
            precision: None,
            conv: 'd',
        };
        assert_eq!(pad_number(true, "", "42", 6, &spec), "-00042");
        assert_eq!(pad("ab", 4, true), "ab  ");
        assert_eq!(pad("ab", 4, false), "  ab");
        assert_eq!(pad("abcdef", 4, false), "abcdef");
    }
}
