#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{EvalError, EvalErrorKind, Interpreter, NoImporter};
use pretty_assertions::assert_eq;

fn render(interp: &mut Interpreter, src: &str) -> Result<String, EvalError> {
    interp.render("test.jsonnet", src, &[], |i, v| i.manifest_json(v, false))
}

/// Evaluate each `(source, expected JSON)` pair with one interpreter.
fn check(cases: &[(&str, &str)]) {
    let mut interp = Interpreter::new(500, Box::new(NoImporter)).unwrap();
    for (src, expected) in cases {
        match render(&mut interp, src) {
            Ok(out) => assert_eq!(&out, expected, "{src}"),
            Err(err) => panic!("{src}: {err}"),
        }
    }
}

/// Raw string result of `src`.
fn eval_string(src: &str) -> String {
    let mut interp = Interpreter::new(500, Box::new(NoImporter)).unwrap();
    interp
        .render("test.jsonnet", src, &[], |i, v| i.manifest_string(v))
        .unwrap_or_else(|err| panic!("{src}: {err}"))
}

fn eval_err(src: &str) -> EvalError {
    let mut interp = Interpreter::new(500, Box::new(NoImporter)).unwrap();
    match render(&mut interp, src) {
        Ok(out) => panic!("{src}: expected an error, got {out}"),
        Err(err) => err,
    }
}

#[test]
fn test_types() {
    check(&[
        ("std.type([])", r#""array""#),
        ("std.type(null)", r#""null""#),
        ("std.type(std.type)", r#""function""#),
        ("[std.isArray([]), std.isBoolean(1), std.isFunction(std.map)]", "[true, false, true]"),
        ("[std.isNumber(1), std.isObject({}), std.isString('')]", "[true, true, true]"),
    ]);
}

#[test]
fn test_length() {
    check(&[
        (r#"std.length("héllo")"#, "5"),
        ("std.length({a: 1, b:: 2})", "1"),
        ("std.length([1, 2, 3])", "3"),
        ("std.length(function(a, b) a)", "2"),
        ("std.length(std.substr)", "3"),
    ]);
    assert!(matches!(
        eval_err("std.length(1)").kind,
        EvalErrorKind::Builtin(_)
    ));
}

#[test]
fn test_argument_type_errors() {
    assert_eq!(
        eval_err(r#"std.floor("x")"#).kind,
        EvalErrorKind::Builtin(
            "Builtin function floor expected number as argument 1 but got (string)".to_string()
        )
    );
    assert_eq!(eval_err("std.floor()").code().as_str(), "E3005");
}

#[test]
fn test_equality_and_strings() {
    check(&[
        ("std.primitiveEquals(1, 1)", "true"),
        ("std.equals({a: [1]}, {a: [1]})", "true"),
        (r#"std.toString([1, "a"])"#, r#""[1, \"a\"]""#),
        ("std.toString('a')", r#""a""#),
        ("std.trace('tracing', 5)", "5"),
        ("std.native('missing')", "null"),
    ]);
}

#[test]
fn test_math() {
    check(&[
        ("std.floor(1.5)", "1"),
        ("std.ceil(1.5)", "2"),
        ("std.sqrt(16)", "4"),
        ("std.pow(2, 10)", "1024"),
        ("std.abs(-3)", "3"),
        ("std.sign(-2)", "-1"),
        ("[std.max(1, 2), std.min(1, 2)]", "[2, 1]"),
        ("std.exponent(8)", "4"),
        ("std.mantissa(8)", "0.5"),
        ("[std.exponent(0), std.mantissa(0)]", "[0, 0]"),
        ("std.exp(0)", "1"),
        ("std.log(1)", "0"),
        ("std.mod(7, 2)", "1"),
        ("std.modulo(-7, 2)", "-1"),
        ("std.mod('%d', 3)", r#""3""#),
    ]);
    assert_eq!(eval_err("std.sqrt(-1)").kind, EvalErrorKind::NotANumber);
    assert_eq!(eval_err("std.log(0)").kind, EvalErrorKind::Overflow);
}

#[test]
fn test_string_functions() {
    check(&[
        (r#"std.codepoint("A")"#, "65"),
        ("std.char(66)", r#""B""#),
        (r#"std.substr("hello", 1, 3)"#, r#""ell""#),
        (r#"std.substr("hi", 1, 10)"#, r#""i""#),
        (r#"[std.startsWith("hello", "he"), std.endsWith("hello", "he")]"#, "[true, false]"),
        (r#"std.stringChars("ab")"#, r#"["a", "b"]"#),
        (r#"std.split("a,b,,c", ",")"#, r#"["a", "b", "", "c"]"#),
        (r#"std.splitLimit("a,b,c", ",", 1)"#, r#"["a", "b,c"]"#),
        (r#"std.splitLimit("a,b,c", ",", -1)"#, r#"["a", "b", "c"]"#),
        (r#"std.strReplace("aaa", "a", "bb")"#, r#""bbbbbb""#),
        (r#"[std.asciiUpper("abC1"), std.asciiLower("ABc1")]"#, r#"["ABC1", "abc1"]"#),
        (r#"std.parseInt("-42")"#, "-42"),
        (r#"std.parseHex("ff")"#, "255"),
        (r#"std.parseOctal("755")"#, "493"),
        (r#"std.parseJson('{"a": [1, 2.5, null]}')"#, r#"{"a": [1, 2.5, null]}"#),
        (r#"std.encodeUTF8("é")"#, "[195, 169]"),
        ("std.decodeUTF8([104, 105])", r#""hi""#),
    ]);
    assert!(matches!(
        eval_err(r#"std.parseInt("12x")"#).kind,
        EvalErrorKind::Builtin(_)
    ));
    assert!(matches!(
        eval_err(r#"std.split("abc", "")"#).kind,
        EvalErrorKind::Builtin(_)
    ));
}

#[test]
fn test_encoding() {
    check(&[
        (r#"std.md5("abc")"#, r#""900150983cd24fb0d6963f7d28e17f72""#),
        (r#"std.md5("")"#, r#""d41d8cd98f00b204e9800998ecf8427e""#),
        (r#"std.base64("hello")"#, r#""aGVsbG8=""#),
        ("std.base64([0, 255])", r#""AP8=""#),
        (r#"std.base64Decode("aGVsbG8=")"#, r#""hello""#),
        (r#"std.base64DecodeBytes("AP8=")"#, "[0, 255]"),
        (r#"std.base64("a")"#, r#""YQ==""#),
        (r#"std.base64Decode("YQ==")"#, r#""a""#),
    ]);
    for bad in [r#"std.base64Decode("abc")"#, r#"std.base64DecodeBytes("a=bc")"#] {
        let err = eval_err(bad);
        assert!(matches!(err.kind, EvalErrorKind::Builtin(_)), "{bad}");
        assert!(err.to_string().contains("invalid base64 input"), "{bad}");
    }
}

#[test]
fn test_format() {
    check(&[
        (
            r#"std.format("%5.2f|%-4d|%03d|%x|%s", [3.14159, 7, 5, 255, [1]])"#,
            r#"" 3.14|7   |005|ff|[1]""#,
        ),
        (r#""%(a)s-%(b)d" % {a: "x", b: 2}"#, r#""x-2""#),
        (r#""%5s|%-5s|" % ["ab", "cd"]"#, r#""   ab|cd   |""#),
        (r#""%e" % 12345.678"#, r#""1.234568e+04""#),
        (r#""%g %g" % [0.0001, 1e20]"#, r#""0.0001 1e+20""#),
        (r#""%o %X %%" % [8, 255]"#, r#""10 FF %""#),
        (r#""%*d" % [4, 7]"#, r#""   7""#),
    ]);
    assert!(matches!(
        eval_err(r#""%d %d" % [1]"#).kind,
        EvalErrorKind::Builtin(_) | EvalErrorKind::Type(_)
    ));
}

#[test]
fn test_json_manifesters() {
    check(&[
        (r#"std.escapeStringJson("a\"b")"#, r#""\"a\\\"b\"""#),
        ("std.manifestJsonMinified({a: [1, 2]})", r#""{\"a\":[1,2]}""#),
    ]);
    assert_eq!(
        eval_string("std.manifestJsonEx({a: [1]}, '  ')"),
        "{\n  \"a\": [\n    1\n  ]\n}"
    );
    assert_eq!(eval_string("std.manifestJson({a: 1})"), "{\n    \"a\": 1\n}");
}

#[test]
fn test_other_manifesters() {
    assert_eq!(
        eval_string("std.manifestPython({a: true, b: [1, null]})"),
        r#"{"a": True, "b": [1, None]}"#
    );
    assert_eq!(
        eval_string("std.manifestPythonVars({x: 'y'})"),
        "x = \"y\"\n"
    );
    assert_eq!(
        eval_string("std.manifestIni({main: {a: 1}, sections: {s: {b: ['x', 'y']}}})"),
        "a = 1\n[s]\nb = x\nb = y\n"
    );
    assert_eq!(
        eval_string("std.manifestYamlDoc({a: [1, 2], b: {c: 'x'}})"),
        "\"a\":\n- 1\n- 2\n\"b\":\n  \"c\": \"x\""
    );
    assert_eq!(
        eval_string("std.manifestYamlDoc({a: 'line\\n'}, quote_keys=false)"),
        "a: |\n  line"
    );
    assert_eq!(
        eval_string("std.manifestYamlStream([1, 'a'])"),
        "---\n1\n---\n\"a\"\n...\n"
    );
    assert_eq!(eval_string("std.escapeStringBash(\"it's\")"), "'it'\"'\"'s'");
    assert_eq!(eval_string("std.escapeStringDollars('$x')"), "$$x");
}

#[test]
fn test_higher_order() {
    check(&[
        ("std.makeArray(3, function(i) i * i)", "[0, 1, 4]"),
        ("std.filter(function(x) x % 2 == 0, [1, 2, 3, 4])", "[2, 4]"),
        ("std.map(function(x) x + 1, [1, 2])", "[2, 3]"),
        ("std.map(function(c) c + c, 'ab')", r#"["aa", "bb"]"#),
        ("std.flatMap(function(x) [x, x], [1, 2])", "[1, 1, 2, 2]"),
        ("std.flatMap(function(c) c + '.', 'ab')", r#""a.b.""#),
        ("std.foldl(function(a, b) a + b, [1, 2, 3], 0)", "6"),
        (r#"std.foldr(function(a, b) a + b, ["a", "b"], "")"#, r#""ab""#),
        ("std.foldl(function(acc, x) [x] + acc, [1, 2, 3], [])", "[3, 2, 1]"),
        ("std.map(function(x) x, [error 'lazy'])[0:0]", "[]"),
    ]);
    assert!(matches!(
        eval_err("std.filter(function(x) 1, [1])").kind,
        EvalErrorKind::Builtin(_)
    ));
}

#[test]
fn test_array_functions() {
    check(&[
        (r#"std.join(", ", ["a", null, "b"])"#, r#""a, b""#),
        ("std.join([0], [[1], [2]])", "[1, 0, 2]"),
        ("std.range(1, 3)", "[1, 2, 3]"),
        ("std.range(3, 1)", "[]"),
        ("std.reverse([1, 2, 3])", "[3, 2, 1]"),
        ("std.slice([1, 2, 3, 4], 1, null, 2)", "[2, 4]"),
        ("std.count([1, 2, 1], 1)", "2"),
        ("[std.member([1, 2], 2), std.member('abc', 'b')]", "[true, true]"),
        ("std.find(2, [1, 2, 2])", "[1, 2]"),
        ("std.makeArray(3, function(i) i * i)", "[0, 1, 4]"),
        ("std.range(-1, 1)", "[-1, 0, 1]"),
    ]);
}

#[test]
fn test_huge_arrays_are_errors() {
    for src in [
        "std.length(std.makeArray(1e19, function(i) i))",
        "std.length(std.makeArray(1e15, function(i) i))",
        "std.length(std.range(0, 1e15))",
        "std.length(std.range(-9e18, 9e18))",
    ] {
        assert!(
            matches!(eval_err(src).kind, EvalErrorKind::Builtin(_)),
            "{src}"
        );
    }
    assert!(eval_err("std.makeArray(1e19, function(i) i)")
        .to_string()
        .contains("out of range"));
    assert!(eval_err("std.range(0, 1e15)")
        .to_string()
        .contains("too large"));
}

#[test]
fn test_sort_and_sets() {
    check(&[
        ("std.sort([3, 1, 2])", "[1, 2, 3]"),
        (r#"std.sort(["b", "a", "c"])"#, r#"["a", "b", "c"]"#),
        ("std.sort([{k: 2}, {k: 1}], function(x) x.k)", r#"[{"k": 1}, {"k": 2}]"#),
        ("std.sort([[2], [1, 5], [1]])", "[[1], [1, 5], [2]]"),
        ("std.uniq([1, 1, 2, 1])", "[1, 2, 1]"),
        ("std.set([3, 1, 3, 2])", "[1, 2, 3]"),
        ("std.setMember(2, [1, 2, 3])", "true"),
        ("std.setMember(4, [1, 2, 3])", "false"),
        ("std.setUnion([1, 3], [2, 3])", "[1, 2, 3]"),
        ("std.setInter([1, 2, 3], [2, 3, 4])", "[2, 3]"),
        ("std.setDiff([1, 2, 3], [2])", "[1, 3]"),
        (
            "std.setUnion([{n: 1}], [{n: 1}, {n: 2}], function(o) o.n)",
            r#"[{"n": 1}, {"n": 2}]"#,
        ),
    ]);
    assert!(matches!(
        eval_err("std.sort([1, 'a'])").kind,
        EvalErrorKind::Type(_)
    ));
}

#[test]
fn test_object_functions() {
    check(&[
        ("std.objectFields({b: 1, a: 2, c:: 3})", r#"["a", "b"]"#),
        ("std.objectFieldsAll({b: 1, a: 2, c:: 3})", r#"["a", "b", "c"]"#),
        ("[std.objectHas({a:: 1}, 'a'), std.objectHasAll({a:: 1}, 'a')]", "[false, true]"),
        ("std.objectValues({a: 1, b: 2})", "[1, 2]"),
        ("std.objectValuesAll({a:: 1})", "[1]"),
        ("std.objectKeysValues({a: 1})", r#"[{"key": "a", "value": 1}]"#),
        ("[std.get({a: 1}, 'a'), std.get({a: 1}, 'b', 3)]", "[1, 3]"),
        ("std.mapWithKey(function(k, v) k + v, {a: '1'})", r#"{"a": "a1"}"#),
    ]);
}

#[test]
fn test_library_functions() {
    check(&[
        ("std.mapWithIndex(function(i, x) i + x, [10, 20])", "[10, 21]"),
        ("std.filterMap(function(x) x > 1, function(x) x * 10, [1, 2, 3])", "[20, 30]"),
        (r#"std.repeat("ab", 3)"#, r#""ababab""#),
        ("std.repeat([1], 2)", "[1, 1]"),
        (r#"std.lines(["a", "b"])"#, r#""a\nb\n""#),
        (r#"std.deepJoin(["a", ["b", ["c"]]])"#, r#""abc""#),
        ("std.flattenArrays([[1], [2, 3]])", "[1, 2, 3]"),
        ("[std.sum([1, 2, 3]), std.avg([1, 2, 3])]", "[6, 2]"),
        ("[std.all([true, false]), std.any([false, true])]", "[false, true]"),
        ("std.contains([1, 2], 2)", "true"),
        (r#"std.lstripChars("xxaxx", "x")"#, r#""axx""#),
        (r#"std.rstripChars("xxaxx", "x")"#, r#""xxa""#),
        (r#"std.stripChars("xxaxx", "x")"#, r#""a""#),
        (r#"[std.isEmpty(""), std.isEmpty("a")]"#, "[true, false]"),
        (r#"std.resolvePath("a/b/c.jsonnet", "d.jsonnet")"#, r#""a/b/d.jsonnet""#),
        ("std.clamp(5, 1, 3)", "3"),
        (
            "std.mergePatch({a: 1, b: {c: 2}}, {a: null, b: {d: 3}})",
            r#"{"b": {"c": 2, "d": 3}}"#,
        ),
        ("std.prune({a: null, b: [], c: {d: null}, e: 1})", r#"{"e": 1}"#),
        ("std.assertEqual(1, 1)", "true"),
    ]);
    assert_eq!(
        eval_err("std.assertEqual(1, 2)").kind,
        EvalErrorKind::User("Assertion failed. 1 != 2".to_string())
    );
}

#[test]
fn test_std_can_be_extended_locally() {
    check(&[
        ("local std2 = std + {length(x):: 42}; [std2.length([]), std.length([])]", "[42, 0]"),
        ("local std = {}; std", "{}"),
    ]);
}
