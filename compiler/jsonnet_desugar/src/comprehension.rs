//! Array comprehensions and the binding-tuple array behind object
//! comprehensions.

use crate::Desugarer;
use jsonnet_ir::ast::CompSpec;
use jsonnet_ir::{CoreId, CoreKind, CoreParam, Loc, Name};

enum LoweredSpec {
    For { var: Name, array: CoreId },
    If(CoreId),
}

impl Desugarer<'_> {
    /// `[e for x in a if c ...]`, given `[e]` as `element`:
    ///
    /// ```text
    /// $std.flatMap(function(x) if c then ... else [], a)
    /// ```
    pub(crate) fn lower_comp_specs(
        &mut self,
        specs: Vec<CompSpec>,
        element: CoreId,
        loc: Loc,
    ) -> CoreId {
        let lowered: Vec<LoweredSpec> = specs
            .into_iter()
            .map(|spec| match spec {
                CompSpec::For { var, array } => LoweredSpec::For {
                    var,
                    array: self.lower(array),
                },
                CompSpec::If(cond) => LoweredSpec::If(self.lower(cond)),
            })
            .collect();

        lowered.into_iter().rev().fold(element, |inner, spec| match spec {
            LoweredSpec::For { var, array } => {
                let func = self.alloc(
                    CoreKind::Function {
                        params: vec![CoreParam {
                            name: var,
                            default: None,
                        }],
                        body: inner,
                    },
                    loc,
                );
                self.std_call("flatMap", vec![func, array], loc)
            }
            LoweredSpec::If(cond) => {
                let empty = self.alloc(CoreKind::Array(Vec::new()), loc);
                self.alloc(
                    CoreKind::If {
                        cond,
                        then_branch: inner,
                        else_branch: empty,
                    },
                    loc,
                )
            }
        })
    }

    /// Variables bound by the `for` clauses, in binding-tuple order. A later
    /// clause shadows an earlier one of the same name.
    pub(crate) fn comp_vars(specs: &[CompSpec]) -> Vec<Name> {
        let all: Vec<Name> = specs
            .iter()
            .filter_map(|spec| match spec {
                CompSpec::For { var, .. } => Some(*var),
                CompSpec::If(_) => None,
            })
            .collect();
        all.iter()
            .enumerate()
            .filter(|(i, name)| !all[i + 1..].contains(name))
            .map(|(_, name)| *name)
            .collect()
    }
}
