#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::desugar;
use jsonnet_ir::{BinaryOp, CoreArena, CoreId, CoreKind, FileId, Name, StringInterner, UnaryOp};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Lowered {
    arena: CoreArena,
    root: CoreId,
    interner: StringInterner,
}

impl Lowered {
    fn kind(&self, id: CoreId) -> &CoreKind {
        &self.arena.get(id).kind
    }

    fn root_kind(&self) -> &CoreKind {
        self.kind(self.root)
    }

    fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// Name of the `$std` function `id` calls, with its arguments.
    fn std_call(&self, id: CoreId) -> (String, Vec<CoreId>) {
        let CoreKind::Apply { target, args, .. } = self.kind(id) else {
            panic!("expected call, got {:?}", self.kind(id));
        };
        let CoreKind::Index { target: std, index } = self.kind(*target) else {
            panic!("expected $std index");
        };
        assert_eq!(self.kind(*std), &CoreKind::Var(Name::DOLLAR_STD));
        let CoreKind::Str(func) = self.kind(*index) else {
            panic!("expected function name");
        };
        (func.to_string(), args.iter().map(|a| a.value).collect())
    }
}

fn lower(source: &str) -> Lowered {
    lower_into(source, CoreArena::new())
}

fn lower_into(source: &str, mut arena: CoreArena) -> Lowered {
    let interner = StringInterner::new();
    let tokens = jsonnet_lexer::lex(source, &interner).unwrap();
    let ast = jsonnet_parse::parse(&tokens, FileId(0), &interner).unwrap();
    let root = desugar(ast, &mut arena, &interner);
    Lowered {
        arena,
        root,
        interner,
    }
}

#[test]
fn test_field_access_becomes_index() {
    let l = lower("a.b");
    let CoreKind::Index { target, index } = l.root_kind() else {
        panic!("expected index");
    };
    assert_eq!(l.kind(*target), &CoreKind::Var(l.name("a")));
    assert_eq!(l.kind(*index), &CoreKind::Str("b".into()));
}

#[test]
fn test_equality_operators_call_std() {
    let l = lower("a == b");
    let (func, args) = l.std_call(l.root);
    assert_eq!(func, "equals");
    assert_eq!(args.len(), 2);

    let l = lower("a != b");
    let CoreKind::Unary {
        op: UnaryOp::Not,
        operand,
    } = l.root_kind()
    else {
        panic!("expected negation");
    };
    assert_eq!(l.std_call(*operand).0, "equals");

    let l = lower("'%d' % 1");
    assert_eq!(l.std_call(l.root).0, "mod");
}

#[test]
fn test_in_swaps_operands() {
    let l = lower("'k' in o");
    let (func, args) = l.std_call(l.root);
    assert_eq!(func, "objectHasEx");
    assert_eq!(l.kind(args[0]), &CoreKind::Var(l.name("o")));
    assert_eq!(l.kind(args[1]), &CoreKind::Str("k".into()));
    assert_eq!(l.kind(args[2]), &CoreKind::True);
}

#[test]
fn test_other_binary_operators_stay() {
    let l = lower("1 + 2");
    assert!(matches!(
        l.root_kind(),
        CoreKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
    let l = lower("a && b");
    assert!(matches!(
        l.root_kind(),
        CoreKind::Binary {
            op: BinaryOp::And,
            ..
        }
    ));
}

#[test]
fn test_slice_fills_missing_parts_with_null() {
    let l = lower("a[1:]");
    let (func, args) = l.std_call(l.root);
    assert_eq!(func, "slice");
    assert_eq!(args.len(), 4);
    assert_eq!(l.kind(args[1]), &CoreKind::Number(1.0));
    assert_eq!(l.kind(args[2]), &CoreKind::Null);
    assert_eq!(l.kind(args[3]), &CoreKind::Null);
}

#[test]
fn test_if_without_else() {
    let l = lower("if c then 1");
    let CoreKind::If { else_branch, .. } = l.root_kind() else {
        panic!("expected if");
    };
    assert_eq!(l.kind(*else_branch), &CoreKind::Null);
}

#[test]
fn test_assert_expression() {
    let l = lower("assert c; 1");
    let CoreKind::If {
        then_branch,
        else_branch,
        ..
    } = l.root_kind()
    else {
        panic!("expected if");
    };
    assert_eq!(l.kind(*then_branch), &CoreKind::Number(1.0));
    let CoreKind::Error(msg) = l.kind(*else_branch) else {
        panic!("expected error");
    };
    assert_eq!(l.kind(*msg), &CoreKind::Str("Assertion failed".into()));
}

#[test]
fn test_apply_brace_is_addition() {
    let l = lower("base { a: 1 }");
    let CoreKind::Binary {
        op: BinaryOp::Add,
        right,
        ..
    } = l.root_kind()
    else {
        panic!("expected addition");
    };
    assert!(matches!(l.kind(*right), CoreKind::Object { .. }));
}

#[test]
fn test_local_function_sugar() {
    let l = lower("local f(x, y=2) = x; f");
    let CoreKind::Local { binds, .. } = l.root_kind() else {
        panic!("expected local");
    };
    let CoreKind::Function { params, .. } = l.kind(binds[0].1) else {
        panic!("expected function");
    };
    assert_eq!(params.len(), 2);
    assert!(params[0].default.is_none());
    assert!(params[1].default.is_some());
}

#[test]
fn test_array_comprehension_nests_flat_maps() {
    let l = lower("[x + y for x in a if x > 0 for y in b]");
    let (func, args) = l.std_call(l.root);
    assert_eq!(func, "flatMap");
    assert_eq!(l.kind(args[1]), &CoreKind::Var(l.name("a")));
    let CoreKind::Function { params, body } = l.kind(args[0]) else {
        panic!("expected function");
    };
    assert_eq!(params[0].name, l.name("x"));
    let CoreKind::If {
        then_branch,
        else_branch,
        ..
    } = l.kind(*body)
    else {
        panic!("expected filter");
    };
    assert_eq!(l.kind(*else_branch), &CoreKind::Array(Vec::new()));
    let (func, args) = l.std_call(*then_branch);
    assert_eq!(func, "flatMap");
    let CoreKind::Function { body, .. } = l.kind(args[0]) else {
        panic!("expected function");
    };
    let CoreKind::Array(items) = l.kind(*body) else {
        panic!("expected singleton array");
    };
    assert_eq!(items.len(), 1);
}

#[test]
fn test_dollar_bound_by_outermost_object_only() {
    let l = lower("{ a: { b: $.c }, c: 1 }");
    let CoreKind::Object { fields, .. } = l.root_kind() else {
        panic!("expected object");
    };
    let CoreKind::Local { binds, body } = l.kind(fields[0].body) else {
        panic!("outer field should bind $");
    };
    assert_eq!(binds.len(), 1);
    assert_eq!(binds[0].0, Name::DOLLAR);
    assert_eq!(l.kind(binds[0].1), &CoreKind::SelfRef);

    let CoreKind::Object { fields: inner, .. } = l.kind(*body) else {
        panic!("expected inner object");
    };
    assert!(matches!(l.kind(inner[0].body), CoreKind::Index { .. }));
}

#[test]
fn test_object_locals_shared_between_fields() {
    let l = lower("{ local x = 1, a: x, b: x, assert x == 1 }");
    let CoreKind::Object { asserts, fields } = l.root_kind() else {
        panic!("expected object");
    };
    assert_eq!(asserts.len(), 1);
    let bind_of = |id: CoreId| match l.kind(id) {
        CoreKind::Local { binds, .. } => binds.clone(),
        other => panic!("expected local, got {other:?}"),
    };
    let a = bind_of(fields[0].body);
    let b = bind_of(fields[1].body);
    let check = bind_of(asserts[0]);
    assert_eq!(a.len(), 2);
    assert_eq!(a, b);
    assert_eq!(a, check);
}

#[test]
fn test_field_flags() {
    let l = lower("{ a+: 1, b:: 2, m(x): x, 'q': 3, [k]: 4 }");
    let CoreKind::Object { fields, .. } = l.root_kind() else {
        panic!("expected object");
    };
    assert!(fields[0].plus_super);
    assert_eq!(fields[1].visibility, jsonnet_ir::Visibility::Hidden);
    let CoreKind::Local { body, .. } = l.kind(fields[2].body) else {
        panic!("expected local");
    };
    assert!(matches!(l.kind(*body), CoreKind::Function { .. }));
    assert_eq!(l.kind(fields[3].name), &CoreKind::Str("q".into()));
    assert_eq!(l.kind(fields[4].name), &CoreKind::Var(l.name("k")));
}

#[test]
fn test_object_comprehension() {
    let l = lower("{ [k]: v for k in ks for v in vs }");
    let CoreKind::ObjectComp {
        field,
        value,
        var,
        array,
        ..
    } = l.root_kind()
    else {
        panic!("expected object comprehension");
    };
    assert_eq!(*var, Name::TUPLE);
    assert_eq!(l.std_call(*array).0, "flatMap");

    let CoreKind::Local { binds, body } = l.kind(*field) else {
        panic!("key should unpack the tuple");
    };
    assert_eq!(binds.len(), 2);
    assert_eq!(binds[0].0, l.name("k"));
    assert_eq!(l.kind(*body), &CoreKind::Var(l.name("k")));
    let CoreKind::Index { target, index } = l.kind(binds[1].1) else {
        panic!("expected tuple index");
    };
    assert_eq!(l.kind(*target), &CoreKind::Var(Name::TUPLE));
    assert_eq!(l.kind(*index), &CoreKind::Number(1.0));

    let CoreKind::Local { binds: outer, body } = l.kind(*value) else {
        panic!("value should unpack the tuple");
    };
    assert_eq!(outer, binds);
    let CoreKind::Local { binds: dollar, .. } = l.kind(*body) else {
        panic!("value should bind $");
    };
    assert_eq!(dollar[0].0, Name::DOLLAR);
}

#[test]
fn test_comprehension_shadowed_variable() {
    let l = lower("{ [x]: x for x in a for x in b }");
    let CoreKind::ObjectComp { field, .. } = l.root_kind() else {
        panic!("expected object comprehension");
    };
    let CoreKind::Local { binds, .. } = l.kind(*field) else {
        panic!("expected local");
    };
    assert_eq!(binds.len(), 1);
}

#[test]
fn test_imports() {
    assert_eq!(lower("import 'a.jsonnet'").root_kind(), &CoreKind::Import("a.jsonnet".into()));
    assert_eq!(lower("importstr 'a.txt'").root_kind(), &CoreKind::ImportStr("a.txt".into()));
    assert_eq!(lower("importbin 'a.bin'").root_kind(), &CoreKind::ImportBin("a.bin".into()));
}

#[test]
fn test_super_forms() {
    let l = lower("{ a: super.b, c: 'd' in super }");
    let CoreKind::Object { fields, .. } = l.root_kind() else {
        panic!("expected object");
    };
    let CoreKind::Local { body, .. } = l.kind(fields[0].body) else {
        panic!("expected local");
    };
    let CoreKind::SuperIndex(index) = l.kind(*body) else {
        panic!("expected super index");
    };
    assert_eq!(l.kind(*index), &CoreKind::Str("b".into()));
    let CoreKind::Local { body, .. } = l.kind(fields[1].body) else {
        panic!("expected local");
    };
    assert!(matches!(l.kind(*body), CoreKind::InSuper(_)));
}

#[test]
fn test_deterministic_across_arenas() {
    let source = "{ local l = 1, [k]: v + l for k in ['a'] for v in [1] } + { b: [x for x in [1, 2] if x > 1] }";
    let first = lower(source);
    let mut padded = CoreArena::new();
    padded.alloc(CoreKind::Null, jsonnet_ir::Loc::SYNTHETIC);
    let second = lower_into(source, padded);
    assert!(first
        .arena
        .structurally_equal(first.root, &second.arena, second.root));
}

const SNIPPETS: &[&str] = &[
    "1",
    "'s'",
    "{ a: 1, b:: self.a }",
    "[x for x in [1, 2]]",
    "{ [k]: 1 for k in ['p'] }",
    "(local f(x) = x; f(2))",
    "(if true then 1)",
    "[1, 2][0:1]",
    "('a' in { a: 1 })",
    "(assert true; 3)",
];

proptest! {
    #[test]
    fn prop_desugar_is_deterministic(picks in prop::collection::vec(0..SNIPPETS.len(), 1..6)) {
        let source = picks.iter().map(|i| SNIPPETS[*i]).collect::<Vec<_>>().join(" + ");
        let a = lower(&source);
        let b = lower(&source);
        prop_assert!(a.arena.structurally_equal(a.root, &b.arena, b.root));
    }
}
