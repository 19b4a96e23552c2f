//! Source locations.

use std::fmt;
use std::ops::Range;

/// Byte range within one source file; `end` is exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span used for synthesized nodes that have no source text.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Zero-width span at `offset`.
    #[inline]
    pub const fn point(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Convert a byte range, saturating offsets that do not fit in `u32`.
    pub fn from_range(range: Range<usize>) -> Self {
        let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        Span {
            start: clamp(range.start),
            end: clamp(range.end),
        }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Index of a file registered with the source map.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    /// File id for synthesized code.
    pub const SYNTHETIC: FileId = FileId(u32::MAX);
}

/// A span qualified with the file it belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Loc {
    pub file: FileId,
    pub span: Span,
}

impl Loc {
    pub const SYNTHETIC: Loc = Loc {
        file: FileId::SYNTHETIC,
        span: Span::DUMMY,
    };

    #[inline]
    pub const fn new(file: FileId, span: Span) -> Self {
        Loc { file, span }
    }

    /// Location covering `self` through `other`, which must be in the same file.
    #[inline]
    #[must_use]
    pub fn to(self, other: Loc) -> Loc {
        Loc {
            file: self.file,
            span: self.span.merge(other.span),
        }
    }

    pub fn is_synthetic(self) -> bool {
        self.file == FileId::SYNTHETIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_is_order_independent() {
        let a = Span::new(4, 9);
        let b = Span::new(1, 5);
        assert_eq!(a.merge(b), Span::new(1, 9));
        assert_eq!(b.merge(a), Span::new(1, 9));
    }

    #[test]
    fn test_from_range_saturates() {
        let s = Span::from_range(3..(u32::MAX as usize + 10));
        assert_eq!(s.start, 3);
        assert_eq!(s.end, u32::MAX);
        assert_eq!(Span::point(7).len(), 0);
        assert!(Span::point(7).is_empty());
    }

    #[test]
    fn test_loc_to() {
        let file = FileId(2);
        let joined = Loc::new(file, Span::new(0, 3)).to(Loc::new(file, Span::new(10, 12)));
        assert_eq!(joined, Loc::new(file, Span::new(0, 12)));
        assert!(!joined.is_synthetic());
        assert!(Loc::SYNTHETIC.is_synthetic());
    }
}
