//! Loaded sources and location rendering.

use jsonnet_ir::{FileId, Loc};
use std::rc::Rc;

/// Pre-computed line starts for O(log L) line/column lookups.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of the first byte of each line.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.offsets.get((line - 1) as usize).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(start..end)
            .map_or(0, |s| s.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

#[derive(Debug)]
struct SourceFile {
    name: Rc<str>,
    text: Rc<str>,
    lines: LineOffsetTable,
}

/// Every file a VM has loaded: the standard library, snippets, imports and
/// code-valued external variables.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap { files: Vec::new() }
    }

    pub fn add(&mut self, name: &str, text: &str) -> FileId {
        let id = FileId(u32::try_from(self.files.len()).unwrap_or(u32::MAX - 1));
        self.files.push(SourceFile {
            name: Rc::from(name),
            text: Rc::from(text),
            lines: LineOffsetTable::build(text),
        });
        id
    }

    pub fn name(&self, file: FileId) -> Option<&Rc<str>> {
        self.files.get(file.0 as usize).map(|f| &f.name)
    }

    pub fn text(&self, file: FileId) -> Option<&Rc<str>> {
        self.files.get(file.0 as usize).map(|f| &f.text)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 1-based line and column of the start of `loc`.
    pub fn line_col(&self, loc: Loc) -> Option<(u32, u32)> {
        let file = self.files.get(loc.file.0 as usize)?;
        Some(file.lines.offset_to_line_col(&file.text, loc.span.start))
    }

    /// Render `loc` as `name:line:col-col`, or `name:(l1:c1)-(l2:c2)` when
    /// the span crosses lines. Synthetic locations render as `None`.
    pub fn describe(&self, loc: Loc) -> Option<String> {
        let file = self.files.get(loc.file.0 as usize)?;
        let (l1, c1) = file.lines.offset_to_line_col(&file.text, loc.span.start);
        if loc.span.is_empty() {
            return Some(format!("{}:{l1}:{c1}", file.name));
        }
        let (l2, c2) = file.lines.offset_to_line_col(&file.text, loc.span.end);
        if l1 == l2 {
            Some(format!("{}:{l1}:{c1}-{c2}", file.name))
        } else {
            Some(format!("{}:({l1}:{c1})-({l2}:{c2})", file.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonnet_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_col() {
        let src = "ab\ncdé\nf";
        let table = LineOffsetTable::build(src);
        assert_eq!(table.line_count(), 3);
        assert_eq!(table.offset_to_line_col(src, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(src, 3), (2, 1));
        // é is two bytes; the column after it counts characters
        assert_eq!(table.offset_to_line_col(src, 7), (2, 4));
        assert_eq!(table.offset_to_line_col(src, 8), (3, 1));
    }

    #[test]
    fn test_describe() {
        let mut map = SourceMap::new();
        let file = map.add("main.jsonnet", "local x = 1;\nx +\n  y");
        assert_eq!(
            map.describe(Loc::new(file, Span::new(6, 7))).as_deref(),
            Some("main.jsonnet:1:7-8")
        );
        assert_eq!(
            map.describe(Loc::new(file, Span::new(13, 20))).as_deref(),
            Some("main.jsonnet:(2:1)-(3:4)")
        );
        assert_eq!(
            map.describe(Loc::new(file, Span::point(13))).as_deref(),
            Some("main.jsonnet:2:1")
        );
        assert_eq!(map.describe(Loc::SYNTHETIC), None);
        assert_eq!(map.name(file).map(|n| &**n), Some("main.jsonnet"));
    }
}
