//! Source ranges.
//!
//! Reports are deduplicated on `(code, span)`, so a span is a plain pair of
//! offsets that copies, hashes and orders cheaply.

use std::fmt;

/// Half-open byte range `start..end` into one source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Range of elements with no source text: builtins, implicit
    /// constructors, generated members.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// True for [`Span::DUMMY`] and any other zero-width range.
    #[inline]
    pub const fn is_synthetic(self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both, used when a report points at a whole
    /// call or declaration.
    #[inline]
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
