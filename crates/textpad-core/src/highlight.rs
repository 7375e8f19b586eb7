//! Match highlighting overlay.
//!
//! [`HighlightMask`] maps every character offset of the document to a [`MatchStyle`]. It is
//! stored sparsely: a logical length (always the document length when rendered) plus a sorted
//! list of disjoint matched ranges. Offsets outside every range are [`MatchStyle::Plain`].

use crate::search::{MatchList, SearchMatch};
use std::ops::Range;

/// Visual style of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStyle {
    /// Rendered normally.
    #[default]
    Plain,
    /// Part of a find-all match.
    Matched,
}

/// Per-character match markers for the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMask {
    len: usize,
    ranges: Vec<Range<usize>>,
}

impl HighlightMask {
    /// Create an all-plain mask of `len` characters.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ranges: Vec::new(),
        }
    }

    /// Replace the mask with an all-plain mask of `len` characters.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.ranges.clear();
    }

    /// Reset every marker to plain, keeping the length.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Follow a document length change. Stale markers are dropped.
    pub fn sync_len(&mut self, len: usize) {
        if self.len != len || !self.ranges.is_empty() {
            self.reset(len);
        }
    }

    /// Logical length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the mask covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if no character is marked.
    pub fn is_plain(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Mark `start..end` as matched.
    ///
    /// Ranges past the mask length are a caller bug; they are clamped in release builds.
    pub fn mark_range(&mut self, start: usize, end: usize) {
        debug_assert!(
            start <= end && end <= self.len,
            "highlight range {start}..{end} outside mask of length {}",
            self.len
        );
        let end = end.min(self.len);
        let start = start.min(end);
        if start == end {
            return;
        }

        // First range that ends at or after `start` (touching ranges merge).
        let first = self.ranges.partition_point(|r| r.end < start);
        let mut merged = start..end;
        let mut last = first;
        while last < self.ranges.len() && self.ranges[last].start <= merged.end {
            merged.start = merged.start.min(self.ranges[last].start);
            merged.end = merged.end.max(self.ranges[last].end);
            last += 1;
        }
        self.ranges.splice(first..last, std::iter::once(merged));
    }

    /// Mark every range of `matches`.
    pub fn mark_matches(&mut self, matches: &MatchList) {
        for m in matches {
            self.mark_range(m.start, m.end);
        }
    }

    /// Style of the character at `offset`.
    pub fn style_at(&self, offset: usize) -> MatchStyle {
        let idx = self.ranges.partition_point(|r| r.end <= offset);
        match self.ranges.get(idx) {
            Some(r) if r.start <= offset => MatchStyle::Matched,
            _ => MatchStyle::Plain,
        }
    }

    /// Sorted, disjoint matched ranges.
    pub fn matched_ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of matched characters.
    pub fn matched_len(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).sum()
    }

    /// Returns `true` if any character of `range` is matched.
    pub fn intersects(&self, range: SearchMatch) -> bool {
        let idx = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges.get(idx).is_some_and(|r| r.start < range.end)
    }

    /// One style per character, `len()` items.
    pub fn styles(&self) -> impl Iterator<Item = MatchStyle> + '_ {
        (0..self.len).map(|offset| self.style_at(offset))
    }
}
