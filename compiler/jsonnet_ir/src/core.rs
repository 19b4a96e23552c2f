//! Core calculus.
//!
//! The desugarer lowers every surface construct into this small set of node
//! kinds. Nodes live in a [`CoreArena`] and refer to their children by
//! [`CoreId`], so a subtree may be referenced from several parents. Nodes
//! are never mutated once allocated; per-node facts computed later (such as
//! variable resolution) live in side tables indexed by `CoreId`.

use crate::{BinaryOp, Loc, Name, UnaryOp, Visibility};
use std::rc::Rc;

/// Index of a node in a [`CoreArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct CoreId(u32);

impl CoreId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        CoreId(raw)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoreExpr {
    pub kind: CoreKind,
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoreParam {
    pub name: Name,
    pub default: Option<CoreId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoreArg {
    pub name: Option<Name>,
    pub value: CoreId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoreField {
    /// Evaluated outside the object; must produce a string or null.
    pub name: CoreId,
    pub visibility: Visibility,
    /// `+:` composes with the inherited value of the same field.
    pub plus_super: bool,
    pub body: CoreId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CoreKind {
    Null,
    True,
    False,
    Number(f64),
    Str(Rc<str>),
    Var(Name),
    SelfRef,
    /// `super[index]`
    SuperIndex(CoreId),
    /// `field in super`
    InSuper(CoreId),
    Function {
        params: Vec<CoreParam>,
        body: CoreId,
    },
    Apply {
        target: CoreId,
        args: Vec<CoreArg>,
        tailstrict: bool,
    },
    Object {
        asserts: Vec<CoreId>,
        fields: Vec<CoreField>,
    },
    /// One field per element of `array`, with `var` bound to the element
    /// while evaluating `field` and `value`.
    ObjectComp {
        field: CoreId,
        plus_super: bool,
        value: CoreId,
        var: Name,
        array: CoreId,
    },
    Array(Vec<CoreId>),
    Binary {
        op: BinaryOp,
        left: CoreId,
        right: CoreId,
    },
    Unary {
        op: UnaryOp,
        operand: CoreId,
    },
    If {
        cond: CoreId,
        then_branch: CoreId,
        else_branch: CoreId,
    },
    /// Mutually recursive bindings.
    Local {
        binds: Vec<(Name, CoreId)>,
        body: CoreId,
    },
    Error(CoreId),
    Index {
        target: CoreId,
        index: CoreId,
    },
    Import(Rc<str>),
    ImportStr(Rc<str>),
    ImportBin(Rc<str>),
    /// Native function `index` of the built-in table.
    Builtin {
        index: u32,
        name: Name,
    },
}

/// Append-only storage for core nodes.
#[derive(Default, Debug)]
pub struct CoreArena {
    nodes: Vec<Rc<CoreExpr>>,
}

impl CoreArena {
    pub fn new() -> Self {
        CoreArena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: CoreKind, loc: Loc) -> CoreId {
        let id = CoreId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Rc::new(CoreExpr { kind, loc }));
        id
    }

    /// Borrow a node.
    ///
    /// # Panics
    /// Panics if `id` was allocated by a different arena.
    #[inline]
    pub fn get(&self, id: CoreId) -> &CoreExpr {
        &self.nodes[id.index()]
    }

    /// Shared handle to a node, usable while the arena is being extended.
    #[inline]
    pub fn shared(&self, id: CoreId) -> Rc<CoreExpr> {
        Rc::clone(&self.nodes[id.index()])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compare two subtrees by shape and payload, ignoring locations and
    /// node ids. `other` may be a different arena.
    pub fn structurally_equal(&self, a: CoreId, other: &CoreArena, b: CoreId) -> bool {
        let eq = |x: CoreId, y: CoreId| self.structurally_equal(x, other, y);
        let eq_opt = |x: Option<CoreId>, y: Option<CoreId>| match (x, y) {
            (Some(x), Some(y)) => eq(x, y),
            (None, None) => true,
            _ => false,
        };
        let eq_all = |xs: &[CoreId], ys: &[CoreId]| {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| eq(*x, *y))
        };
        match (&self.get(a).kind, &other.get(b).kind) {
            (CoreKind::Null, CoreKind::Null)
            | (CoreKind::True, CoreKind::True)
            | (CoreKind::False, CoreKind::False)
            | (CoreKind::SelfRef, CoreKind::SelfRef) => true,
            (CoreKind::Number(x), CoreKind::Number(y)) => x.to_bits() == y.to_bits(),
            (CoreKind::Str(x), CoreKind::Str(y))
            | (CoreKind::Import(x), CoreKind::Import(y))
            | (CoreKind::ImportStr(x), CoreKind::ImportStr(y))
            | (CoreKind::ImportBin(x), CoreKind::ImportBin(y)) => x == y,
            (CoreKind::Var(x), CoreKind::Var(y)) => x == y,
            (CoreKind::SuperIndex(x), CoreKind::SuperIndex(y))
            | (CoreKind::InSuper(x), CoreKind::InSuper(y))
            | (CoreKind::Error(x), CoreKind::Error(y)) => eq(*x, *y),
            (
                CoreKind::Function { params: p1, body: b1 },
                CoreKind::Function { params: p2, body: b2 },
            ) => {
                p1.len() == p2.len()
                    && p1
                        .iter()
                        .zip(p2)
                        .all(|(x, y)| x.name == y.name && eq_opt(x.default, y.default))
                    && eq(*b1, *b2)
            }
            (
                CoreKind::Apply {
                    target: t1,
                    args: a1,
                    tailstrict: s1,
                },
                CoreKind::Apply {
                    target: t2,
                    args: a2,
                    tailstrict: s2,
                },
            ) => {
                s1 == s2
                    && eq(*t1, *t2)
                    && a1.len() == a2.len()
                    && a1
                        .iter()
                        .zip(a2)
                        .all(|(x, y)| x.name == y.name && eq(x.value, y.value))
            }
            (
                CoreKind::Object {
                    asserts: s1,
                    fields: f1,
                },
                CoreKind::Object {
                    asserts: s2,
                    fields: f2,
                },
            ) => {
                eq_all(s1, s2)
                    && f1.len() == f2.len()
                    && f1.iter().zip(f2).all(|(x, y)| {
                        x.visibility == y.visibility
                            && x.plus_super == y.plus_super
                            && eq(x.name, y.name)
                            && eq(x.body, y.body)
                    })
            }
            (
                CoreKind::ObjectComp {
                    field: k1,
                    plus_super: p1,
                    value: v1,
                    var: n1,
                    array: a1,
                },
                CoreKind::ObjectComp {
                    field: k2,
                    plus_super: p2,
                    value: v2,
                    var: n2,
                    array: a2,
                },
            ) => p1 == p2 && n1 == n2 && eq(*k1, *k2) && eq(*v1, *v2) && eq(*a1, *a2),
            (CoreKind::Array(x), CoreKind::Array(y)) => eq_all(x, y),
            (
                CoreKind::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                },
                CoreKind::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && eq(*l1, *l2) && eq(*r1, *r2),
            (
                CoreKind::Unary {
                    op: o1,
                    operand: x,
                },
                CoreKind::Unary {
                    op: o2,
                    operand: y,
                },
            ) => o1 == o2 && eq(*x, *y),
            (
                CoreKind::If {
                    cond: c1,
                    then_branch: t1,
                    else_branch: e1,
                },
                CoreKind::If {
                    cond: c2,
                    then_branch: t2,
                    else_branch: e2,
                },
            ) => eq(*c1, *c2) && eq(*t1, *t2) && eq(*e1, *e2),
            (
                CoreKind::Local {
                    binds: b1,
                    body: x,
                },
                CoreKind::Local {
                    binds: b2,
                    body: y,
                },
            ) => {
                b1.len() == b2.len()
                    && b1
                        .iter()
                        .zip(b2)
                        .all(|((n1, v1), (n2, v2))| n1 == n2 && eq(*v1, *v2))
                    && eq(*x, *y)
            }
            (
                CoreKind::Index {
                    target: t1,
                    index: i1,
                },
                CoreKind::Index {
                    target: t2,
                    index: i2,
                },
            ) => eq(*t1, *t2) && eq(*i1, *i2),
            (
                CoreKind::Builtin { index: i1, name: n1 },
                CoreKind::Builtin { index: i2, name: n2 },
            ) => i1 == i2 && n1 == n2,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(arena: &mut CoreArena, v: f64) -> CoreId {
        arena.alloc(CoreKind::Number(v), Loc::SYNTHETIC)
    }

    #[test]
    fn test_alloc_and_get() {
        let mut arena = CoreArena::new();
        let one = num(&mut arena, 1.0);
        let two = num(&mut arena, 2.0);
        let sum = arena.alloc(
            CoreKind::Binary {
                op: BinaryOp::Add,
                left: one,
                right: two,
            },
            Loc::SYNTHETIC,
        );
        assert_eq!(arena.len(), 3);
        assert!(matches!(
            arena.get(sum).kind,
            CoreKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
        assert_eq!(arena.shared(one).kind, CoreKind::Number(1.0));
    }

    #[test]
    fn test_structural_equality_across_arenas() {
        let build = |arena: &mut CoreArena, rhs: f64| {
            let a = num(arena, 1.0);
            let b = num(arena, rhs);
            let arr = arena.alloc(CoreKind::Array(vec![a, b]), Loc::SYNTHETIC);
            arena.alloc(
                CoreKind::Local {
                    binds: vec![(Name::from_raw(9), arr)],
                    body: a,
                },
                Loc::SYNTHETIC,
            )
        };
        let mut left = CoreArena::new();
        let mut right = CoreArena::new();
        let _padding = num(&mut right, 0.0);
        let l = build(&mut left, 2.0);
        let r = build(&mut right, 2.0);
        assert!(left.structurally_equal(l, &right, r));

        let r2 = build(&mut right, 3.0);
        assert!(!left.structurally_equal(l, &right, r2));
    }
}
