#![allow(clippy::unwrap_used, clippy::expect_used)]

use jsonnet::{ErrorKind, ExtVar, Vm, VmConfig};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn snippet(source: &str) -> String {
    Vm::new().unwrap().evaluate_snippet("main.jsonnet", source).unwrap()
}

#[test]
fn test_snippet_is_multi_line_json() {
    assert_eq!(
        snippet(r#"{a: 1, b: [1, 2, 3], c: "x" + "y"}"#),
        "{\n   \"a\": 1,\n   \"b\": [\n      1,\n      2,\n      3\n   ],\n   \"c\": \"xy\"\n}\n"
    );
}

#[test]
fn test_empty_and_hidden_objects() {
    assert_eq!(snippet("{}"), "{}\n");
    assert_eq!(snippet("{a:: 1, b:: 2}"), "{}\n");
    assert_eq!(snippet("[]"), "[]\n");
}

#[test]
fn test_composition() {
    let value = Vm::new()
        .unwrap()
        .evaluate_value("main.jsonnet", "{a: 1, b: self.a + 1} + {a: 2}")
        .unwrap();
    assert_eq!(value, serde_json::json!({"a": 2, "b": 3}));
}

#[test]
fn test_laziness() {
    assert_eq!(snippet("local unused = 1 / 0; {a: 1, b:: 1 / 0}"), "{\n   \"a\": 1\n}\n");
}

#[test]
fn test_string_output() {
    let mut vm = Vm::builder().string_output(true).build().unwrap();
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", "'line one\\nline two'").unwrap(),
        "line one\nline two\n"
    );
    let err = vm.evaluate_snippet("main.jsonnet", "{}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_multi() {
    let docs = Vm::new()
        .unwrap()
        .evaluate_multi("main.jsonnet", "{'b.json': {x: 1}, 'a.json': [], hidden:: 0}")
        .unwrap();
    let names: Vec<&str> = docs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a.json", "b.json"]);
    assert_eq!(docs["a.json"], "[]\n");
    assert_eq!(docs["b.json"], "{\n   \"x\": 1\n}\n");
}

#[test]
fn test_multi_requires_object() {
    let err = Vm::new()
        .unwrap()
        .evaluate_multi("main.jsonnet", "[1]")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert!(err.message().starts_with("multi mode:"));
}

#[test]
fn test_stream() {
    let docs = Vm::new()
        .unwrap()
        .evaluate_stream("main.jsonnet", "[1, 'two', {}]")
        .unwrap();
    assert_eq!(docs, vec!["1\n", "\"two\"\n", "{}\n"]);
}

#[test]
fn test_error_report() {
    let err = Vm::new()
        .unwrap()
        .evaluate_snippet("main.jsonnet", r#"local f(x) = x + 1; f(error "boom")"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.message(), "boom");
    assert_eq!(err.trace()[0], "main.jsonnet:1:23-35");
    assert!(err.trace().iter().any(|line| line.ends_with("\tfunction <f>")));
    let text = err.to_string();
    assert!(text.starts_with("RUNTIME ERROR: boom\n\tmain.jsonnet:1:23-35\n"));
}

#[test]
fn test_error_classes() {
    let mut vm = Vm::new().unwrap();
    let kind = |vm: &mut Vm, src: &str| vm.evaluate_snippet("main.jsonnet", src).unwrap_err().kind();
    assert_eq!(kind(&mut vm, "'open"), ErrorKind::Lexical);
    assert_eq!(kind(&mut vm, "{a: }"), ErrorKind::Syntax);
    assert_eq!(kind(&mut vm, "x"), ErrorKind::Static);
    assert_eq!(kind(&mut vm, "self"), ErrorKind::Static);
    assert_eq!(kind(&mut vm, "1 / 0"), ErrorKind::Runtime);
    assert_eq!(kind(&mut vm, "import 'x.jsonnet'"), ErrorKind::Host);
    assert_eq!(kind(&mut vm, "std.char(-1)"), ErrorKind::Host);
    // The VM stays usable after failures.
    assert_eq!(vm.evaluate_snippet("main.jsonnet", "1").unwrap(), "1\n");
}

#[test]
fn test_trace_is_truncated() {
    let mut vm = Vm::builder().max_stack(100).max_trace(6).build().unwrap();
    let err = vm
        .evaluate_snippet("main.jsonnet", "local f(n) = f(n + 1) + 1; f(0)")
        .unwrap_err();
    assert_eq!(err.message(), "max stack frames exceeded.");
    assert_eq!(err.trace().len(), 7);
    assert_eq!(err.trace()[3], "...");
}

#[test]
fn test_config_from_json() {
    let config = VmConfig::from_json(r#"{"string_output": true}"#).unwrap();
    let mut vm = Vm::builder().config(config).build().unwrap();
    assert!(vm.config().string_output);
    assert_eq!(vm.evaluate_snippet("main.jsonnet", "'raw'").unwrap(), "raw\n");
}

#[test]
fn test_max_stack() {
    let src = "local sum(n) = if n == 0 then 0 else n + sum(n - 1); sum(300)";
    let mut vm = Vm::builder().max_stack(100).build().unwrap();
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", src).unwrap_err().code().as_str(),
        "E3007"
    );
    vm.set_max_stack(1000);
    assert_eq!(vm.evaluate_snippet("main.jsonnet", src).unwrap(), "45150\n");
}

#[test]
fn test_ext_vars() {
    let mut vm = Vm::builder()
        .ext_var("name", "prod")
        .ext_code("replicas", "1 + 2")
        .ext_json("labels", serde_json::json!({"team": "core"}))
        .build()
        .unwrap();
    let value = vm
        .evaluate_value(
            "main.jsonnet",
            "{name: std.extVar('name'), replicas: std.extVar('replicas'), labels: std.extVar('labels')}",
        )
        .unwrap();
    assert_eq!(
        value,
        serde_json::json!({"name": "prod", "replicas": 3, "labels": {"team": "core"}})
    );
    vm.set_ext_var("name", ExtVar::Str("dev".to_string()));
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", "std.extVar('name')").unwrap(),
        "\"dev\"\n"
    );
    let err = vm
        .evaluate_snippet("main.jsonnet", "std.extVar('nope')")
        .unwrap_err();
    assert_eq!(err.message(), "Undefined external variable: nope");
}

#[test]
fn test_top_level_arguments() {
    let mut vm = Vm::builder()
        .tla_var("who", "world")
        .tla_code("times", "2")
        .build()
        .unwrap();
    let value = vm
        .evaluate_value(
            "main.jsonnet",
            "function(who, times, sep='!') std.repeat('hello ' + who + sep, times)",
        )
        .unwrap();
    assert_eq!(value, serde_json::json!("hello world!hello world!"));
}

#[test]
fn test_unknown_top_level_argument() {
    let mut vm = Vm::builder().tla_var("nope", "x").build().unwrap();
    let err = vm
        .evaluate_snippet("main.jsonnet", "function(a='a') a")
        .unwrap_err();
    assert_eq!(err.message(), "function has no parameter nope");
}

#[test]
fn test_field_computed_once() {
    let calls = Rc::new(Cell::new(0u32));
    let seen = calls.clone();
    let mut vm = Vm::builder()
        .native("count", &[], move |_| {
            seen.set(seen.get() + 1);
            Ok(serde_json::Value::from(seen.get()))
        })
        .build()
        .unwrap();
    let out = vm
        .evaluate_value(
            "main.jsonnet",
            "local o = {n: std.native('count')()}; [o.n, o.n, (o + {}).n]",
        )
        .unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(out, serde_json::json!([1, 1, 2]));
}

#[test]
fn test_native_arguments_and_failures() {
    let mut vm = Vm::builder()
        .native("add", &["a", "b"], |args| {
            let sum = args
                .iter()
                .map(|v| v.as_f64().ok_or_else(|| format!("not a number: {v}")))
                .sum::<Result<f64, String>>()?;
            Ok(serde_json::Value::from(sum))
        })
        .build()
        .unwrap();
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", "std.native('add')(1, b=2)")
            .unwrap(),
        "3\n"
    );
    let err = vm
        .evaluate_snippet("main.jsonnet", "std.native('add')(1, 'x')")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Host);
    assert_eq!(err.message(), "native function add failed: not a number: \"x\"");
}

#[test]
fn test_cycle_is_an_error() {
    let err = Vm::new()
        .unwrap()
        .evaluate_snippet("main.jsonnet", "local x = [x[0]]; x")
        .unwrap_err();
    assert_eq!(err.code().as_str(), "E3006");
}

#[test]
fn test_independent_vms_on_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut vm = Vm::new().unwrap();
                vm.evaluate_snippet("main.jsonnet", &format!("{{n: {i} * 2}}"))
                    .unwrap()
            })
        })
        .collect();
    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs[3], "{\n   \"n\": 6\n}\n");
}

#[test]
fn test_init_tracing_is_idempotent() {
    jsonnet::init_tracing();
    jsonnet::init_tracing();
    assert_eq!(snippet("std.trace('traced', 1)"), "1\n");
}
