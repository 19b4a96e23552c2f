//! Object representation.
//!
//! An object is a list of leaves, most-derived first. `a + b` produces the
//! leaves of `b` followed by those of `a`, so a lookup scans forward and
//! `super` inside leaf `i` continues the scan at `i + 1`. Field bodies are
//! evaluated against the object they are accessed through (`self`), which
//! is what lets a base field see overrides from a derived object.

use crate::heap::EnvId;
use crate::thunk::Thunk;
use jsonnet_ir::{CoreId, Visibility};
use rustc_hash::FxHashMap;
use std::rc::Rc;

#[derive(Clone)]
pub(crate) enum FieldBody {
    /// Core expression evaluated in `env` with `self` bound per access.
    Expr { expr: CoreId, env: EnvId },
    /// A fixed value that does not depend on `self`.
    Value(Thunk),
}

pub(crate) struct LeafField {
    pub visibility: Visibility,
    pub plus_super: bool,
    pub body: FieldBody,
}

/// The fields and asserts contributed by one object literal,
/// comprehension or host-built object.
#[derive(Default)]
pub(crate) struct Leaf {
    pub fields: FxHashMap<Rc<str>, LeafField>,
    pub asserts: Vec<(CoreId, EnvId)>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AssertState {
    Unchecked,
    Checking,
    Checked,
}

pub(crate) struct ObjectValue {
    pub leaves: Rc<[Rc<Leaf>]>,
    /// Field thunks for this `self`, keyed by field name and defining leaf.
    pub cache: FxHashMap<(Rc<str>, u32), Thunk>,
    pub asserts: AssertState,
}

impl ObjectValue {
    pub(crate) fn new(leaves: Vec<Rc<Leaf>>) -> Self {
        let has_asserts = leaves.iter().any(|leaf| !leaf.asserts.is_empty());
        ObjectValue {
            leaves: Rc::from(leaves),
            cache: FxHashMap::default(),
            asserts: if has_asserts {
                AssertState::Unchecked
            } else {
                AssertState::Checked
            },
        }
    }

    /// `base + derived`.
    pub(crate) fn extend(base: &ObjectValue, derived: &ObjectValue) -> Self {
        let leaves = derived
            .leaves
            .iter()
            .chain(base.leaves.iter())
            .cloned()
            .collect();
        ObjectValue::new(leaves)
    }

    /// First leaf at or after `from` defining `name`.
    pub(crate) fn find(&self, name: &str, from: u32) -> Option<(u32, &LeafField)> {
        self.leaves
            .iter()
            .enumerate()
            .skip(from as usize)
            .find_map(|(i, leaf)| leaf.fields.get(name).map(|f| (i as u32, f)))
    }

    pub(crate) fn has_leaves_from(&self, from: u32) -> bool {
        (from as usize) < self.leaves.len()
    }

    /// Effective visibility: the most-derived explicit `::` or `:::` wins.
    fn is_visible(&self, name: &str) -> bool {
        for leaf in self.leaves.iter() {
            if let Some(field) = leaf.fields.get(name) {
                match field.visibility {
                    Visibility::Hidden => return false,
                    Visibility::Forced => return true,
                    Visibility::Inherit => {}
                }
            }
        }
        true
    }

    /// Field names in codepoint order, with their effective visibility.
    pub(crate) fn field_names(&self) -> Vec<(Rc<str>, bool)> {
        let mut names: Vec<Rc<str>> = Vec::new();
        for leaf in self.leaves.iter() {
            names.extend(leaf.fields.keys().cloned());
        }
        names.sort_unstable();
        names.dedup();
        names
            .into_iter()
            .map(|name| {
                let visible = self.is_visible(&name);
                (name, visible)
            })
            .collect()
    }

    pub(crate) fn visible_fields(&self) -> Vec<Rc<str>> {
        self.field_names()
            .into_iter()
            .filter_map(|(name, visible)| visible.then_some(name))
            .collect()
    }

    pub(crate) fn has_field(&self, name: &str, include_hidden: bool) -> bool {
        self.find(name, 0).is_some() && (include_hidden || self.is_visible(name))
    }

    /// Forget per-render state.
    pub(crate) fn reset(&mut self) {
        self.cache.clear();
        if self.leaves.iter().any(|l| !l.asserts.is_empty()) {
            self.asserts = AssertState::Unchecked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(fields: &[(&str, Visibility)]) -> Rc<Leaf> {
        let mut leaf = Leaf::default();
        for (name, visibility) in fields {
            leaf.fields.insert(
                Rc::from(*name),
                LeafField {
                    visibility: *visibility,
                    plus_super: false,
                    body: FieldBody::Value(Thunk::done(crate::Value::Null)),
                },
            );
        }
        Rc::new(leaf)
    }

    #[test]
    fn test_extension_order_and_visibility() {
        let base = ObjectValue::new(vec![leaf(&[
            ("a", Visibility::Hidden),
            ("b", Visibility::Inherit),
        ])]);
        let derived = ObjectValue::new(vec![leaf(&[
            ("a", Visibility::Inherit),
            ("b", Visibility::Hidden),
            ("c", Visibility::Inherit),
        ])]);
        let both = ObjectValue::extend(&base, &derived);
        assert_eq!(both.leaves.len(), 2);
        assert_eq!(both.find("b", 0).map(|(i, _)| i), Some(0));
        assert_eq!(both.find("b", 1).map(|(i, _)| i), Some(1));
        assert_eq!(both.find("c", 1).map(|(i, _)| i), None);
        let names: Vec<(String, bool)> = both
            .field_names()
            .into_iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), false),
                ("b".to_string(), false),
                ("c".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_forced_visibility_overrides_hidden_base() {
        let base = ObjectValue::new(vec![leaf(&[("a", Visibility::Hidden)])]);
        let derived = ObjectValue::new(vec![leaf(&[("a", Visibility::Forced)])]);
        let both = ObjectValue::extend(&base, &derived);
        assert!(both.has_field("a", false));
        assert!(!base.has_field("a", false));
        assert!(base.has_field("a", true));
    }
}
