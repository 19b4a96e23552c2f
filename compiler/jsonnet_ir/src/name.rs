//! Interned identifiers.

use std::fmt;

/// Index of a string held by a [`StringInterner`](crate::StringInterner).
///
/// Comparing two names is an integer comparison; the text is only needed for
/// diagnostics and for turning identifiers into field-name strings.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, interned at index 0.
    pub const EMPTY: Name = Name(0);
    /// `std`, the user-visible standard library binding.
    pub const STD: Name = Name(1);
    /// `$std`, the library binding the desugarer refers to.
    pub const DOLLAR_STD: Name = Name(2);
    /// `$`, bound to the outermost object.
    pub const DOLLAR: Name = Name(3);
    /// Tuple binding introduced for object comprehensions.
    pub const TUPLE: Name = Name(4);

    pub(crate) const PREDEFINED: [&'static str; 5] = ["", "std", "$std", "$", "$tuple"];

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
