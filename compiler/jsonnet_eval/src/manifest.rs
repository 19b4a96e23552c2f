//! Turning values into JSON text and host values.

use crate::error::{manifest_error, EvalResult};
use crate::format::format_number;
use crate::interpreter::Interpreter;
use crate::thunk::Thunk;
use crate::value::Value;
use jsonnet_stack::ensure_sufficient_stack;
use std::fmt::Write as _;
use std::rc::Rc;

/// Layout of manifested JSON.
#[derive(Copy, Clone, Debug)]
pub(crate) struct JsonStyle<'a> {
    pub indent: &'a str,
    pub newline: &'a str,
    pub key_sep: &'a str,
    pub item_sep: &'a str,
}

impl JsonStyle<'static> {
    /// Three-space indentation, one element per line.
    pub(crate) const MULTI_LINE: JsonStyle<'static> = JsonStyle {
        indent: "   ",
        newline: "\n",
        key_sep: ": ",
        item_sep: ",",
    };

    /// `{"a": 1, "b": [1, 2]}`, used by `std.toString` and string `+`.
    pub(crate) const SINGLE_LINE: JsonStyle<'static> = JsonStyle {
        indent: "",
        newline: "",
        key_sep: ": ",
        item_sep: ", ",
    };
}

/// JSON string literal for `s`, quotes included.
pub(crate) fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' || ('\u{7f}'..='\u{9f}').contains(&c) => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Interpreter {
    /// JSON text for `value`, multi-line or single-line. No trailing
    /// newline.
    pub fn manifest_json(&mut self, value: Value, multiline: bool) -> EvalResult<String> {
        let style = if multiline {
            JsonStyle::MULTI_LINE
        } else {
            JsonStyle::SINGLE_LINE
        };
        self.manifest_with(value, &style)
    }

    pub(crate) fn manifest_with(&mut self, value: Value, style: &JsonStyle<'_>) -> EvalResult<String> {
        let mut out = String::new();
        self.write_json(&mut out, value, style, 0)?;
        Ok(out)
    }

    fn write_json(
        &mut self,
        out: &mut String,
        value: Value,
        style: &JsonStyle<'_>,
        depth: usize,
    ) -> EvalResult<()> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&format_number(n)),
            Value::Str(s) => out.push_str(&escape_json(&s)),
            Value::Function(_) => {
                return Err(manifest_error("couldn't manifest function in JSON output."))
            }
            Value::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return Ok(());
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(style.item_sep);
                    }
                    new_line(out, style, depth + 1);
                    let value = self.force(item)?;
                    ensure_sufficient_stack(|| self.write_json(out, value, style, depth + 1))?;
                }
                new_line(out, style, depth);
                out.push(']');
            }
            Value::Object(obj) => {
                self.check_asserts(obj)?;
                let fields = self.object_fields(obj, false);
                if fields.is_empty() {
                    out.push_str("{}");
                    return Ok(());
                }
                out.push('{');
                for (i, name) in fields.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(style.item_sep);
                    }
                    new_line(out, style, depth + 1);
                    out.push_str(&escape_json(&name));
                    out.push_str(style.key_sep);
                    let value = self.index(Value::Object(obj), Value::Str(name))?;
                    ensure_sufficient_stack(|| self.write_json(out, value, style, depth + 1))?;
                }
                new_line(out, style, depth);
                out.push('}');
            }
        }
        Ok(())
    }

    /// Strings as they are, everything else as single-line JSON.
    pub(crate) fn to_string_value(&mut self, value: Value) -> EvalResult<Rc<str>> {
        match value {
            Value::Str(s) => Ok(s),
            other => Ok(Rc::from(self.manifest_json(other, false)?)),
        }
    }

    /// Raw string output: the value must be a string.
    pub fn manifest_string(&mut self, value: Value) -> EvalResult<String> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(manifest_error(format!(
                "expected string result, got: {}",
                other.type_name()
            ))),
        }
    }

    /// One document per visible field of a top-level object.
    pub fn manifest_multi(&mut self, value: Value, string_output: bool) -> EvalResult<Vec<(String, String)>> {
        let Value::Object(obj) = value else {
            return Err(manifest_error(format!(
                "multi mode: top-level object was a {}, should be an object whose keys are filenames and values hold the JSON for that file.",
                value.type_name()
            )));
        };
        self.check_asserts(obj)?;
        let mut docs = Vec::new();
        for name in self.object_fields(obj, false) {
            let value = self.index(Value::Object(obj), Value::Str(name.clone()))?;
            let text = if string_output {
                self.manifest_string(value)?
            } else {
                self.manifest_json(value, true)?
            };
            docs.push((name.to_string(), text));
        }
        Ok(docs)
    }

    /// One document per element of a top-level array.
    pub fn manifest_stream(&mut self, value: Value, string_output: bool) -> EvalResult<Vec<String>> {
        let Value::Array(items) = value else {
            return Err(manifest_error(format!(
                "stream mode: top-level object was a {}, should be an array whose elements hold the JSON for each document in the stream.",
                value.type_name()
            )));
        };
        let mut docs = Vec::with_capacity(items.len());
        for item in items.iter() {
            let value = self.force(item)?;
            docs.push(if string_output {
                self.manifest_string(value)?
            } else {
                self.manifest_json(value, true)?
            });
        }
        Ok(docs)
    }

    /// Host JSON for a value. Integral numbers become JSON integers.
    pub fn to_json(&mut self, value: Value) -> EvalResult<serde_json::Value> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.2e18 {
                    serde_json::Value::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n)
                        .map_or(serde_json::Value::Null, serde_json::Value::Number)
                }
            }
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Function(_) => {
                return Err(manifest_error("couldn't manifest function in JSON output."))
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items.iter() {
                    let value = self.force(item)?;
                    out.push(ensure_sufficient_stack(|| self.to_json(value))?);
                }
                serde_json::Value::Array(out)
            }
            Value::Object(obj) => {
                self.check_asserts(obj)?;
                let mut map = serde_json::Map::new();
                for name in self.object_fields(obj, false) {
                    let value = self.index(Value::Object(obj), Value::Str(name.clone()))?;
                    map.insert(name.to_string(), ensure_sufficient_stack(|| self.to_json(value))?);
                }
                serde_json::Value::Object(map)
            }
        })
    }

    /// Value for host JSON.
    pub fn from_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::string(s.as_str()),
            serde_json::Value::Array(items) => {
                let values: Vec<Value> = items.iter().map(|item| self.from_json(item)).collect();
                Value::array_of(values)
            }
            serde_json::Value::Object(map) => {
                let fields: Vec<(Rc<str>, Thunk)> = map
                    .iter()
                    .map(|(k, v)| (Rc::from(k.as_str()), Thunk::done(self.from_json(v))))
                    .collect();
                Value::Object(self.make_object(fields))
            }
        }
    }
}

fn new_line(out: &mut String, style: &JsonStyle<'_>, depth: usize) {
    out.push_str(style.newline);
    for _ in 0..depth {
        out.push_str(style.indent);
    }
}
