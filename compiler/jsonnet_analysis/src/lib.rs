//! Static analysis of the core calculus.
//!
//! A single walk over a core tree that:
//!
//! - resolves every `Var` to a runtime frame and slot ([`Resolutions`]),
//!   failing with `Unknown variable` when nothing binds it
//! - rejects `self`, `super` and `$` outside an object body
//! - rejects names bound twice by one `local` or parameter list
//! - rejects empty import paths
//!
//! The frames modelled here must match the ones the evaluator pushes:
//!
//! | construct        | frame                                  |
//! |------------------|----------------------------------------|
//! | program          | the globals passed to [`analyze`]      |
//! | `Local`          | every bind name; binds and body inside |
//! | `Function`       | every parameter; defaults and body     |
//! | `ObjectComp`     | the element variable; key and value    |
//!
//! Object bodies reuse the frame the object was created in. Field names
//! and the comprehension array are evaluated outside the object, so `self`
//! there refers to the enclosing object, if any.

mod error;
mod resolution;


pub use error::{StaticError, StaticErrorKind};
pub use resolution::{Resolutions, VarRef};

use jsonnet_ir::{CoreArena, CoreId, CoreKind, Loc, Name, StringInterner};
use jsonnet_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

/// Analyse the tree rooted at `root`, whose free variables must be among
/// `globals` (the program's outermost frame, in slot order).
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(
    root: CoreId,
    arena: &CoreArena,
    interner: &StringInterner,
    globals: &[Name],
    resolutions: &mut Resolutions,
) -> Result<(), StaticError> {
    resolutions.reserve_for(arena.len());
    let mut analyzer = Analyzer {
        arena,
        interner,
        resolutions,
        scopes: vec![globals.to_vec()],
        in_object: false,
        visited: FxHashSet::default(),
    };
    analyzer.visit(root)?;
    tracing::trace!(resolved = analyzer.resolutions.resolved(), "analysed");
    Ok(())
}

struct Analyzer<'a> {
    arena: &'a CoreArena,
    interner: &'a StringInterner,
    resolutions: &'a mut Resolutions,
    scopes: Vec<Vec<Name>>,
    in_object: bool,
    /// Subtrees already checked. The desugarer only shares a node between
    /// parents that see the same frames, so one visit suffices.
    visited: FxHashSet<CoreId>,
}

impl Analyzer<'_> {
    fn visit(&mut self, id: CoreId) -> Result<(), StaticError> {
        if !self.visited.insert(id) {
            return Ok(());
        }
        ensure_sufficient_stack(|| self.visit_inner(id))
    }

    fn visit_all(&mut self, ids: impl IntoIterator<Item = CoreId>) -> Result<(), StaticError> {
        ids.into_iter().try_for_each(|id| self.visit(id))
    }

    fn visit_inner(&mut self, id: CoreId) -> Result<(), StaticError> {
        let arena = self.arena;
        let node = arena.get(id);
        let loc = node.loc;
        match &node.kind {
            CoreKind::Null
            | CoreKind::True
            | CoreKind::False
            | CoreKind::Number(_)
            | CoreKind::Str(_)
            | CoreKind::Builtin { .. } => Ok(()),
            CoreKind::Var(name) => self.resolve(id, *name, loc),
            CoreKind::SelfRef => self.require_object(StaticErrorKind::SelfOutsideObject, loc),
            CoreKind::SuperIndex(index) => {
                self.require_object(StaticErrorKind::SuperOutsideObject, loc)?;
                self.visit(*index)
            }
            CoreKind::InSuper(field) => {
                self.require_object(StaticErrorKind::SuperOutsideObject, loc)?;
                self.visit(*field)
            }
            CoreKind::Function { params, body } => {
                let names: Vec<Name> = params.iter().map(|p| p.name).collect();
                self.with_frame(names, loc, |this| {
                    this.visit_all(params.iter().filter_map(|p| p.default))?;
                    this.visit(*body)
                })
            }
            CoreKind::Apply { target, args, .. } => {
                self.visit(*target)?;
                self.visit_all(args.iter().map(|a| a.value))
            }
            CoreKind::Object { asserts, fields } => {
                self.visit_all(fields.iter().map(|f| f.name))?;
                self.inside_object(|this| {
                    this.visit_all(asserts.iter().copied())?;
                    this.visit_all(fields.iter().map(|f| f.body))
                })
            }
            CoreKind::ObjectComp {
                field,
                value,
                var,
                array,
                ..
            } => {
                self.visit(*array)?;
                self.with_frame(vec![*var], loc, |this| {
                    this.visit(*field)?;
                    this.inside_object(|this| this.visit(*value))
                })
            }
            CoreKind::Array(items) => self.visit_all(items.iter().copied()),
            CoreKind::Binary { left, right, .. } => {
                self.visit(*left)?;
                self.visit(*right)
            }
            CoreKind::Unary { operand, .. } => self.visit(*operand),
            CoreKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit(*cond)?;
                self.visit(*then_branch)?;
                self.visit(*else_branch)
            }
            CoreKind::Local { binds, body } => {
                let names: Vec<Name> = binds.iter().map(|(name, _)| *name).collect();
                self.with_frame(names, loc, |this| {
                    this.visit_all(binds.iter().map(|(_, value)| *value))?;
                    this.visit(*body)
                })
            }
            CoreKind::Error(msg) => self.visit(*msg),
            CoreKind::Index { target, index } => {
                self.visit(*target)?;
                self.visit(*index)
            }
            CoreKind::Import(path) | CoreKind::ImportStr(path) | CoreKind::ImportBin(path) => {
                if path.is_empty() {
                    return Err(StaticError {
                        kind: StaticErrorKind::EmptyImport,
                        loc,
                    });
                }
                Ok(())
            }
        }
    }

    fn resolve(&mut self, id: CoreId, name: Name, loc: Loc) -> Result<(), StaticError> {
        for (up, frame) in self.scopes.iter().rev().enumerate() {
            if let Some(slot) = frame.iter().position(|n| *n == name) {
                self.resolutions.set(
                    id,
                    VarRef {
                        up: up as u32,
                        slot: slot as u32,
                    },
                );
                return Ok(());
            }
        }
        let kind = if name == Name::DOLLAR {
            StaticErrorKind::DollarOutsideObject
        } else {
            StaticErrorKind::UnknownVariable(self.interner.lookup(name).to_string())
        };
        Err(StaticError { kind, loc })
    }

    fn require_object(&self, kind: StaticErrorKind, loc: Loc) -> Result<(), StaticError> {
        if self.in_object {
            Ok(())
        } else {
            Err(StaticError { kind, loc })
        }
    }

    fn with_frame(
        &mut self,
        names: Vec<Name>,
        loc: Loc,
        f: impl FnOnce(&mut Self) -> Result<(), StaticError>,
    ) -> Result<(), StaticError> {
        let mut seen = FxHashSet::default();
        if let Some(dup) = names.iter().find(|n| !seen.insert(**n)) {
            return Err(StaticError {
                kind: StaticErrorKind::DuplicateBinding(self.interner.lookup(*dup).to_string()),
                loc,
            });
        }
        self.scopes.push(names);
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn inside_object(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), StaticError>,
    ) -> Result<(), StaticError> {
        let outer = std::mem::replace(&mut self.in_object, true);
        let result = f(self);
        self.in_object = outer;
        result
    }
}
