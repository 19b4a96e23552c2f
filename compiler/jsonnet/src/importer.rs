//! In-memory import resolution.

use jsonnet_eval::{ImportedFile, Importer};
use rustc_hash::FxHashMap;

/// Resolves imports against a fixed set of files.
///
/// A relative import is looked up next to the importing file first, then
/// from the root of the set. Paths are normalized (`.` and `..` segments
/// removed) and the normalized path is the file's canonical id.
#[derive(Clone, Debug, Default)]
pub struct MemoryImporter {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemoryImporter {
    pub fn new() -> Self {
        MemoryImporter::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path), content.into());
    }

    fn lookup(&self, path: String) -> Option<ImportedFile> {
        self.files.get(&path).map(|content| ImportedFile {
            canonical: path,
            content: content.clone(),
        })
    }
}

impl Importer for MemoryImporter {
    fn import(&self, from: &str, path: &str) -> Result<ImportedFile, String> {
        if path.starts_with('/') {
            return self
                .lookup(normalize(path))
                .ok_or_else(|| "no such file".to_string());
        }
        let dir = from.rfind('/').map_or("", |i| &from[..=i]);
        self.lookup(normalize(&format!("{dir}{path}")))
            .or_else(|| self.lookup(normalize(path)))
            .ok_or_else(|| "no such file".to_string())
    }
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), None | Some(&"..")) {
                    if !absolute {
                        parts.push("..");
                    }
                } else {
                    parts.pop();
                }
            }
            part => parts.push(part),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a/./b/../c.jsonnet"), "a/c.jsonnet");
        assert_eq!(normalize("../x"), "../x");
        assert_eq!(normalize("/a/../../x"), "/x");
        assert_eq!(normalize("a//b"), "a/b");
    }

    #[test]
    fn test_relative_to_importing_file() {
        let importer = MemoryImporter::new()
            .with_file("lib/a.libsonnet", "1")
            .with_file("lib/b.libsonnet", "2")
            .with_file("b.libsonnet", "3");
        let file = importer.import("lib/a.libsonnet", "b.libsonnet").unwrap();
        assert_eq!(file.canonical, "lib/b.libsonnet");
        assert_eq!(file.content, b"2");
        let file = importer.import("main.jsonnet", "./lib/../b.libsonnet").unwrap();
        assert_eq!(file.canonical, "b.libsonnet");
    }

    #[test]
    fn test_falls_back_to_root() {
        let importer = MemoryImporter::new().with_file("shared.libsonnet", "{}");
        let file = importer.import("deep/dir/main.jsonnet", "shared.libsonnet").unwrap();
        assert_eq!(file.canonical, "shared.libsonnet");
        assert!(importer.import("main.jsonnet", "missing.libsonnet").is_err());
    }
}
