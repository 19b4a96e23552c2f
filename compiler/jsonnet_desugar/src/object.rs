//! Object literals and object comprehensions.
//!
//! Field names are lowered outside the object: they cannot see the
//! object's locals and `self` in a name refers to the enclosing object.
//! Locals, plus `$` on the outermost object, are lowered once and shared by
//! a `Local` wrapped around every field body and assert.

use crate::Desugarer;
use jsonnet_ir::ast::{Assert, Bind, CompSpec, Expr, Field, FieldName, Member};
use jsonnet_ir::{CoreField, CoreId, CoreKind, Loc, Name};

impl Desugarer<'_> {
    pub(crate) fn lower_object(&mut self, members: Vec<Member>, loc: Loc) -> CoreId {
        let mut locals: Vec<Bind> = Vec::new();
        let mut asserts: Vec<Assert> = Vec::new();
        let mut fields: Vec<Field> = Vec::new();
        for member in members {
            match member {
                Member::Local(bind) => locals.push(bind),
                Member::Assert(assert) => asserts.push(assert),
                Member::Field(field) => fields.push(field),
            }
        }

        let names: Vec<CoreId> = fields
            .iter_mut()
            .map(|field| {
                let name = std::mem::replace(&mut field.name, FieldName::Str(String::new()));
                self.lower_field_name(name, field.loc)
            })
            .collect();

        let binds = self.enter_object(locals, loc);
        let asserts = asserts
            .into_iter()
            .map(|assert| {
                let success = self.alloc(CoreKind::Null, assert.loc);
                let check = self.lower_assert(assert.cond, assert.message, success, assert.loc);
                self.with_locals(&binds, check, assert.loc)
            })
            .collect();
        let fields = fields
            .into_iter()
            .zip(names)
            .map(|(field, name)| {
                let body = match field.params {
                    Some(params) => {
                        let kind = self.lower_function(params, field.body);
                        self.alloc(kind, field.loc)
                    }
                    None => self.lower(field.body),
                };
                CoreField {
                    name,
                    visibility: field.visibility,
                    plus_super: field.plus,
                    body: self.with_locals(&binds, body, field.loc),
                }
            })
            .collect();
        self.object_depth -= 1;

        self.alloc(CoreKind::Object { asserts, fields }, loc)
    }

    /// `{ local l, [k]: v for x in a for y in b }` becomes
    ///
    /// ```text
    /// ObjectComp $tuple in [[x, y] for x in a for y in b]:
    ///     [local x = $tuple[0], y = $tuple[1]; k]:
    ///         local x = $tuple[0], y = $tuple[1]; local l; v
    /// ```
    pub(crate) fn lower_object_comp(
        &mut self,
        locals: Vec<Bind>,
        key: Expr,
        plus: bool,
        value: Expr,
        specs: Vec<CompSpec>,
        loc: Loc,
    ) -> CoreId {
        let vars = Self::comp_vars(&specs);
        let tuple_items = vars.iter().map(|v| self.var(*v, loc)).collect();
        let tuple = self.alloc(CoreKind::Array(tuple_items), loc);
        let element = self.alloc(CoreKind::Array(vec![tuple]), loc);
        let array = self.lower_comp_specs(specs, element, loc);

        let unpack: Vec<(Name, CoreId)> = vars
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let target = self.var(Name::TUPLE, loc);
                let index = self.alloc(CoreKind::Number(i as f64), loc);
                (name, self.alloc(CoreKind::Index { target, index }, loc))
            })
            .collect();

        let key = self.lower(key);
        let field = self.with_locals(&unpack, key, loc);

        let binds = self.enter_object(locals, loc);
        let value = self.lower(value);
        let value = self.with_locals(&binds, value, loc);
        self.object_depth -= 1;
        let value = self.with_locals(&unpack, value, loc);

        self.alloc(
            CoreKind::ObjectComp {
                field,
                plus_super: plus,
                value,
                var: Name::TUPLE,
                array,
            },
            loc,
        )
    }

    fn lower_field_name(&mut self, name: FieldName, loc: Loc) -> CoreId {
        match name {
            FieldName::Ident(name) => {
                let text = self.interner.lookup(name);
                self.str_lit(text, loc)
            }
            FieldName::Str(s) => self.str_lit(&s, loc),
            FieldName::Computed(expr) => self.lower(*expr),
        }
    }

    /// Lower the object's locals and bump the object depth. The caller
    /// restores the depth once the bodies are lowered.
    fn enter_object(&mut self, locals: Vec<Bind>, loc: Loc) -> Vec<(Name, CoreId)> {
        let outermost = self.object_depth == 0;
        self.object_depth += 1;
        let mut binds = self.lower_binds(locals);
        if outermost {
            let this = self.alloc(CoreKind::SelfRef, loc);
            binds.push((Name::DOLLAR, this));
        }
        binds
    }

    fn with_locals(&mut self, binds: &[(Name, CoreId)], body: CoreId, loc: Loc) -> CoreId {
        if binds.is_empty() {
            return body;
        }
        self.alloc(
            CoreKind::Local {
                binds: binds.to_vec(),
                body,
            },
            loc,
        )
    }
}
