//! Object construction, field access, `super` and asserts.

use super::Interpreter;
use crate::error::{field_not_found, internal_error, type_error, EvalError, EvalErrorKind};
use crate::error::EvalResult;
use crate::heap::{EnvId, ObjectId};
use crate::object::{AssertState, FieldBody, Leaf, LeafField, ObjectValue};
use crate::thunk::Thunk;
use crate::value::{Ctx, Value};
use jsonnet_ir::{CoreField, CoreId, Visibility};
use std::rc::Rc;

impl Interpreter {
    pub(super) fn eval_object(
        &mut self,
        fields: &[CoreField],
        asserts: &[CoreId],
        env: EnvId,
        ctx: Ctx,
    ) -> EvalResult<Value> {
        let mut leaf = Leaf::default();
        for field in fields {
            let Some(name) = self.field_name(field.name, env, ctx)? else {
                continue;
            };
            insert_field(
                &mut leaf,
                name,
                LeafField {
                    visibility: field.visibility,
                    plus_super: field.plus_super,
                    body: FieldBody::Expr {
                        expr: field.body,
                        env,
                    },
                },
            )?;
        }
        leaf.asserts = asserts.iter().map(|a| (*a, env)).collect();
        let id = self.heap.alloc_object(ObjectValue::new(vec![Rc::new(leaf)]));
        Ok(Value::Object(id))
    }

    pub(super) fn eval_object_comp(
        &mut self,
        field: CoreId,
        plus_super: bool,
        value: CoreId,
        array: CoreId,
        env: EnvId,
        ctx: Ctx,
    ) -> EvalResult<Value> {
        let items = match self.eval(array, env, ctx)? {
            Value::Array(items) => items,
            other => {
                return Err(type_error(format!(
                    "object comprehension needs an array, got {}",
                    other.type_name()
                )))
            }
        };
        let mut leaf = Leaf::default();
        for item in items.iter() {
            let element = self.heap.alloc_frame(Some(env), [item.clone()]);
            let Some(name) = self.field_name(field, element, ctx)? else {
                continue;
            };
            insert_field(
                &mut leaf,
                name,
                LeafField {
                    visibility: Visibility::Inherit,
                    plus_super,
                    body: FieldBody::Expr {
                        expr: value,
                        env: element,
                    },
                },
            )?;
        }
        let id = self.heap.alloc_object(ObjectValue::new(vec![Rc::new(leaf)]));
        Ok(Value::Object(id))
    }

    /// A field name expression: a string, or null to omit the field.
    fn field_name(&mut self, expr: CoreId, env: EnvId, ctx: Ctx) -> EvalResult<Option<Rc<str>>> {
        match self.eval(expr, env, ctx)? {
            Value::Str(name) => Ok(Some(name)),
            Value::Null => Ok(None),
            other => Err(type_error(format!(
                "field name must be string, got {}",
                other.type_name()
            ))
            .at(self.arena.get(expr).loc)),
        }
    }

    /// Host-built object whose fields are fixed values.
    pub(crate) fn make_object(
        &mut self,
        fields: impl IntoIterator<Item = (Rc<str>, Thunk)>,
    ) -> ObjectId {
        let mut leaf = Leaf::default();
        for (name, thunk) in fields {
            leaf.fields.insert(
                name,
                LeafField {
                    visibility: Visibility::Inherit,
                    plus_super: false,
                    body: FieldBody::Value(thunk),
                },
            );
        }
        self.heap.alloc_object(ObjectValue::new(vec![Rc::new(leaf)]))
    }

    /// `base + derived`.
    pub(crate) fn extend_object(&mut self, base: ObjectId, derived: ObjectId) -> ObjectId {
        let extended = ObjectValue::extend(self.heap.object(base), self.heap.object(derived));
        self.heap.alloc_object(extended)
    }

    pub(super) fn eval_super_index(&mut self, index: CoreId, env: EnvId, ctx: Ctx) -> EvalResult<Value> {
        let name = match self.eval(index, env, ctx)? {
            Value::Str(name) => name,
            other => {
                return Err(type_error(format!(
                    "super index must be string, got {}",
                    other.type_name()
                )))
            }
        };
        let obj = ctx
            .self_obj
            .ok_or_else(|| internal_error("super outside of an object"))?;
        let from = ctx.leaf + 1;
        let found = {
            let object = self.heap.object(obj);
            if !object.has_leaves_from(from) {
                return Err(EvalError::new(EvalErrorKind::NoSuper));
            }
            object.find(&name, from).map(|(leaf, _)| leaf)
        };
        let leaf = found.ok_or_else(|| field_not_found(&name))?;
        let thunk = self.field_thunk(obj, leaf, &name);
        self.force(&thunk)
    }

    pub(super) fn eval_in_super(&mut self, name: CoreId, env: EnvId, ctx: Ctx) -> EvalResult<Value> {
        let name = match self.eval(name, env, ctx)? {
            Value::Str(name) => name,
            other => {
                return Err(type_error(format!(
                    "in super needs a string, got {}",
                    other.type_name()
                )))
            }
        };
        let obj = ctx
            .self_obj
            .ok_or_else(|| internal_error("super outside of an object"))?;
        Ok(Value::Bool(
            self.heap.object(obj).find(&name, ctx.leaf + 1).is_some(),
        ))
    }

    /// Thunk for field `name` as defined in `leaf`, seen through `obj`.
    fn field_thunk(&mut self, obj: ObjectId, leaf: u32, name: &Rc<str>) -> Thunk {
        let object = self.heap.object(obj);
        if let Some(field) = object.leaves.get(leaf as usize).and_then(|l| l.fields.get(name)) {
            if let (FieldBody::Value(thunk), false) = (&field.body, field.plus_super) {
                return thunk.clone();
            }
        }
        let key = (name.clone(), leaf);
        if let Some(thunk) = object.cache.get(&key) {
            return thunk.clone();
        }
        let thunk = Thunk::field(obj, leaf, name.clone());
        self.heap.object_mut(obj).cache.insert(key, thunk.clone());
        thunk
    }

    /// Field `name` of `obj`, hidden or not, without running asserts.
    pub(crate) fn object_field(&mut self, obj: ObjectId, name: &Rc<str>) -> Option<Thunk> {
        let (leaf, _) = self.heap.object(obj).find(name, 0)?;
        Some(self.field_thunk(obj, leaf, name))
    }

    /// Compute a field body with `self` bound to `obj`.
    pub(super) fn eval_field(&mut self, obj: ObjectId, leaf: u32, name: &Rc<str>) -> EvalResult<Value> {
        let (body, plus_super) = {
            let field = self
                .heap
                .object(obj)
                .leaves
                .get(leaf as usize)
                .and_then(|l| l.fields.get(name))
                .ok_or_else(|| field_not_found(name))?;
            (field.body.clone(), field.plus_super)
        };
        let loc = match &body {
            FieldBody::Expr { expr, .. } => Some(self.arena.get(*expr).loc),
            FieldBody::Value(_) => None,
        };
        self.enter()?;
        let result = self.eval_field_body(obj, leaf, name, body, plus_super);
        self.leave();
        result.map_err(|e| e.with_frame(loc, format!("object <{name}>")))
    }

    fn eval_field_body(
        &mut self,
        obj: ObjectId,
        leaf: u32,
        name: &Rc<str>,
        body: FieldBody,
        plus_super: bool,
    ) -> EvalResult<Value> {
        let value = match body {
            FieldBody::Expr { expr, env } => self.eval(
                expr,
                env,
                Ctx {
                    self_obj: Some(obj),
                    leaf,
                },
            )?,
            FieldBody::Value(thunk) => self.force(&thunk)?,
        };
        if !plus_super {
            return Ok(value);
        }
        let inherited = self.heap.object(obj).find(name, leaf + 1).map(|(l, _)| l);
        match inherited {
            Some(base_leaf) => {
                let thunk = self.field_thunk(obj, base_leaf, name);
                let base = self.force(&thunk)?;
                self.add(base, value)
            }
            None => Ok(value),
        }
    }

    /// Run the object's asserts once per `self` object.
    pub(crate) fn check_asserts(&mut self, obj: ObjectId) -> EvalResult<()> {
        if self.heap.object(obj).asserts != AssertState::Unchecked {
            return Ok(());
        }
        self.heap.object_mut(obj).asserts = AssertState::Checking;
        let leaves = self.heap.object(obj).leaves.clone();
        for (i, leaf) in leaves.iter().enumerate() {
            for (expr, env) in &leaf.asserts {
                let ctx = Ctx {
                    self_obj: Some(obj),
                    leaf: i as u32,
                };
                if let Err(err) = self.eval(*expr, *env, ctx) {
                    self.heap.object_mut(obj).asserts = AssertState::Unchecked;
                    return Err(err);
                }
            }
        }
        self.heap.object_mut(obj).asserts = AssertState::Checked;
        Ok(())
    }

    /// Field names of `obj` in codepoint order.
    pub(crate) fn object_fields(&self, obj: ObjectId, include_hidden: bool) -> Vec<Rc<str>> {
        let object = self.heap.object(obj);
        if include_hidden {
            object.field_names().into_iter().map(|(name, _)| name).collect()
        } else {
            object.visible_fields()
        }
    }

    pub(crate) fn object_has(&self, obj: ObjectId, name: &str, include_hidden: bool) -> bool {
        self.heap.object(obj).has_field(name, include_hidden)
    }
}

fn insert_field(leaf: &mut Leaf, name: Rc<str>, field: LeafField) -> EvalResult<()> {
    if leaf.fields.contains_key(&name) {
        return Err(type_error(format!("duplicate field name: {name:?}")));
    }
    leaf.fields.insert(name, field);
    Ok(())
}
