//! String interner for identifiers.
//!
//! Identifiers are interned once by the lexer and compared as integers
//! afterwards. Interned text is leaked so lookups can hand out `&'static str`
//! without holding the lock; only identifiers (bounded by program text) are
//! interned, never runtime strings.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Default)]
struct Table {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Thread-safe identifier interner.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// Create an interner with the predefined names at their fixed indices.
    pub fn new() -> Self {
        let mut table = Table::default();
        for (i, s) in Name::PREDEFINED.iter().enumerate() {
            table.map.insert(s, i as u32);
            table.strings.push(s);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `s`, returning the existing name if it was seen before.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&idx) = self.table.read().map.get(s) {
            return Name::from_raw(idx);
        }
        let mut table = self.table.write();
        if let Some(&idx) = table.map.get(s) {
            return Name::from_raw(idx);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        table.strings.push(leaked);
        table.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Text of an interned name. Unknown names resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Name of `s` if it has been interned, without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&i| Name::from_raw(i))
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Interner shared between a VM and the pipeline stages it drives.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_predefined_names() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::STD), "std");
        assert_eq!(interner.lookup(Name::DOLLAR_STD), "$std");
        assert_eq!(interner.intern("$"), Name::DOLLAR);
        assert_eq!(interner.intern(""), Name::EMPTY);
    }

    #[test]
    fn test_intern_is_stable() {
        let interner = StringInterner::new();
        let a = interner.intern("alpha");
        let b = interner.intern("beta");
        assert_ne!(a, b);
        assert_eq!(interner.intern("alpha"), a);
        assert_eq!(interner.lookup(b), "beta");
        assert_eq!(interner.get("gamma"), None);
        assert_eq!(interner.len(), Name::PREDEFINED.len() + 2);
    }

    #[test]
    fn test_shared_across_threads() {
        let shared = SharedInterner::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let s = shared.clone();
                std::thread::spawn(move || s.intern(&format!("t{}", i % 2)))
            })
            .collect();
        let names: Vec<Name> = handles.into_iter().filter_map(|h| h.join().ok()).collect();
        assert_eq!(names.len(), 4);
        assert_eq!(names[0], names[2]);
        assert_eq!(names[1], names[3]);
    }
}
