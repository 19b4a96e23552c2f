#![allow(clippy::unwrap_used, clippy::expect_used)]

use jsonnet::{ErrorKind, ImportedFile, Importer, MemoryImporter, Vm};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

/// Wraps an importer and records every request.
struct Recording {
    inner: MemoryImporter,
    log: Rc<RefCell<Vec<(String, String)>>>,
}

impl Importer for Recording {
    fn import(&self, from: &str, path: &str) -> Result<ImportedFile, String> {
        self.log
            .borrow_mut()
            .push((from.to_string(), path.to_string()));
        self.inner.import(from, path)
    }
}

fn vm_with(importer: MemoryImporter) -> Vm {
    Vm::builder().importer(importer).build().unwrap()
}

#[test]
fn test_import_object() {
    let mut vm = vm_with(
        MemoryImporter::new()
            .with_file("lib/util.libsonnet", "{double(x):: x * 2, name: 'util'}"),
    );
    let value = vm
        .evaluate_value(
            "main.jsonnet",
            "local u = import 'lib/util.libsonnet'; {n: u.double(21)} + u",
        )
        .unwrap();
    assert_eq!(value, serde_json::json!({"n": 42, "name": "util"}));
}

#[test]
fn test_nested_imports_resolve_relative_to_importer() {
    let mut vm = vm_with(
        MemoryImporter::new()
            .with_file("lib/a.libsonnet", "import 'b.libsonnet'")
            .with_file("lib/b.libsonnet", "{from: std.thisFile}"),
    );
    let value = vm
        .evaluate_value("main.jsonnet", "import 'lib/a.libsonnet'")
        .unwrap();
    assert_eq!(value, serde_json::json!({"from": "lib/b.libsonnet"}));
}

#[test]
fn test_importstr_and_importbin() {
    let mut vm = vm_with(
        MemoryImporter::new()
            .with_file("motd.txt", "hi\n")
            .with_file("blob.bin", vec![0u8, 159, 255]),
    );
    let value = vm
        .evaluate_value(
            "main.jsonnet",
            "{text: importstr 'motd.txt', bytes: importbin 'blob.bin'}",
        )
        .unwrap();
    assert_eq!(
        value,
        serde_json::json!({"text": "hi\n", "bytes": [0, 159, 255]})
    );
}

#[test]
fn test_same_target_is_loaded_once() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let importer = Recording {
        inner: MemoryImporter::new().with_file("shared.libsonnet", "{v: std.length([1, 2])}"),
        log: log.clone(),
    };
    let mut vm = Vm::builder().importer(importer).build().unwrap();
    let src = "[(import 'shared.libsonnet').v, (import 'shared.libsonnet').v, (import './shared.libsonnet').v]";
    assert_eq!(
        vm.evaluate_value("main.jsonnet", src).unwrap(),
        serde_json::json!([2, 2, 2])
    );
    // One request per distinct import string.
    assert_eq!(log.borrow().len(), 2);
    vm.evaluate_value("main.jsonnet", src).unwrap();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_import_cycle() {
    let mut vm = vm_with(
        MemoryImporter::new()
            .with_file("a.libsonnet", "import 'b.libsonnet'")
            .with_file("b.libsonnet", "import 'a.libsonnet'"),
    );
    let err = vm
        .evaluate_snippet("main.jsonnet", "import 'a.libsonnet'")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(
        err.message(),
        "import cycle: a.libsonnet -> b.libsonnet -> a.libsonnet"
    );
    assert!(err
        .trace()
        .iter()
        .any(|line| line.ends_with("\timport \"b.libsonnet\"")));
}

#[test]
fn test_missing_import() {
    let mut vm = vm_with(MemoryImporter::new());
    let err = vm
        .evaluate_snippet("main.jsonnet", "import 'gone.libsonnet'")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Host);
    assert_eq!(
        err.message(),
        "couldn't open import \"gone.libsonnet\": no such file"
    );
}

#[test]
fn test_errors_in_imported_file_point_into_it() {
    let mut vm = vm_with(MemoryImporter::new().with_file("bad.libsonnet", "{\n  a: 1 / 0,\n}"));
    let err = vm
        .evaluate_snippet("main.jsonnet", "(import 'bad.libsonnet').a")
        .unwrap_err();
    assert_eq!(err.message(), "division by zero.");
    assert!(err.trace()[0].starts_with("bad.libsonnet:2:"));
}

#[test]
fn test_syntax_error_in_import() {
    let mut vm = vm_with(MemoryImporter::new().with_file("bad.libsonnet", "{a: }"));
    let err = vm
        .evaluate_snippet("main.jsonnet", "import 'bad.libsonnet'")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_set_importer_drops_resolutions() {
    let mut vm = vm_with(MemoryImporter::new().with_file("v.libsonnet", "1"));
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", "importstr 'v.libsonnet'").unwrap(),
        "\"1\"\n"
    );
    vm.set_importer(MemoryImporter::new().with_file("v.libsonnet", "2"));
    assert_eq!(
        vm.evaluate_snippet("main.jsonnet", "importstr 'v.libsonnet'").unwrap(),
        "\"2\"\n"
    );
}
