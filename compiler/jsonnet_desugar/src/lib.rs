//! Surface AST → core calculus lowering.
//!
//! # Pipeline Position
//!
//! ```text
//! Source → Lex → Parse → **Desugar** → Analyze → Evaluate
//! ```
//!
//! # What Gets Rewritten
//!
//! - `a.b`, `a[b]` → `Index`; `super.f` → `SuperIndex`
//! - slices, `==`, `!=`, `%` and `in` → calls into `$std`
//! - `e { ... }` → `e + { ... }`
//! - `local f(x) = ...` and method fields → function literals
//! - `if` without `else` → `else null`
//! - `assert c : m; e` → `if c then e else error m`
//! - array comprehensions → nested `$std.flatMap`
//! - object comprehensions → `ObjectComp` over an array of binding tuples
//! - object locals and `$` → one shared `Local` around each field body
//!
//! Lowering is total: every tree the parser accepts has a lowering, so
//! [`desugar`] cannot fail. It is also deterministic; lowering the same
//! tree twice yields structurally equal core trees.

mod comprehension;
mod expr;
mod object;

#[cfg(test)]
mod tests;

use jsonnet_ir::ast::Expr;
use jsonnet_ir::{CoreArena, CoreArg, CoreId, CoreKind, Loc, Name, StringInterner};
use std::rc::Rc;

/// Lower `expr` into `arena`, returning the root of the core tree.
#[tracing::instrument(level = "debug", skip_all)]
pub fn desugar(expr: Expr, arena: &mut CoreArena, interner: &StringInterner) -> CoreId {
    let mut lowerer = Desugarer {
        arena,
        interner,
        object_depth: 0,
    };
    let root = lowerer.lower(expr);
    tracing::trace!(nodes = lowerer.arena.len(), "desugared");
    root
}

pub(crate) struct Desugarer<'a> {
    arena: &'a mut CoreArena,
    interner: &'a StringInterner,
    /// Number of object bodies enclosing the node being lowered. `$` is
    /// bound only by the outermost one.
    object_depth: u32,
}

impl Desugarer<'_> {
    fn alloc(&mut self, kind: CoreKind, loc: Loc) -> CoreId {
        self.arena.alloc(kind, loc)
    }

    fn str_lit(&mut self, s: &str, loc: Loc) -> CoreId {
        self.alloc(CoreKind::Str(Rc::from(s)), loc)
    }

    fn var(&mut self, name: Name, loc: Loc) -> CoreId {
        self.alloc(CoreKind::Var(name), loc)
    }

    /// `$std.<func>(args...)`
    fn std_call(&mut self, func: &str, args: Vec<CoreId>, loc: Loc) -> CoreId {
        let std = self.var(Name::DOLLAR_STD, loc);
        let field = self.str_lit(func, loc);
        let target = self.alloc(CoreKind::Index { target: std, index: field }, loc);
        let args = args
            .into_iter()
            .map(|value| CoreArg { name: None, value })
            .collect();
        self.alloc(
            CoreKind::Apply {
                target,
                args,
                tailstrict: false,
            },
            loc,
        )
    }
}
