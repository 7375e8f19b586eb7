//! Literal text search.
//!
//! All public inputs and outputs are **character offsets** (not byte offsets). Matching is an
//! exact, case-sensitive comparison of Unicode scalar values; there is no regex or locale
//! folding.
//!
//! - [`forward_search`]: first occurrence at or after an offset, wrapping to the start once.
//! - [`backward_search`]: nearest occurrence before the current match, wrapping to the end once.
//! - [`find_all`]: every non-overlapping occurrence, left to right.

/// A match returned by the search APIs, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Create a match covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Direction of a single-match search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Toward the end of the document.
    Forward,
    /// Toward the start of the document.
    Backward,
}

/// Result of [`find_all`]: every match in ascending document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchList {
    /// Non-overlapping match ranges, sorted by start offset.
    pub ranges: Vec<SearchMatch>,
}

impl MatchList {
    /// Number of matches.
    pub fn count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over the matches.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchMatch> {
        self.ranges.iter()
    }
}

impl<'a> IntoIterator for &'a MatchList {
    type Item = &'a SearchMatch;
    type IntoIter = std::slice::Iter<'a, SearchMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

/// One forward pass: the first occurrence starting at or after `from_char`.
fn scan_forward(
    text: &str,
    index: &CharIndex,
    pattern: &str,
    pattern_chars: usize,
    from_char: usize,
) -> Option<SearchMatch> {
    let start_byte = index.char_to_byte(from_char);
    let found = text[start_byte..].find(pattern)?;
    let start = index.byte_to_char(start_byte + found);
    Some(SearchMatch::new(start, start + pattern_chars))
}

/// One backward pass: the occurrence with the greatest start `<= from_char`.
///
/// Every occurrence has the same length, so "start <= from" is "end <= from + len"; `rfind`
/// over that prefix also sees occurrences overlapping each other.
fn scan_backward(
    text: &str,
    index: &CharIndex,
    pattern: &str,
    pattern_chars: usize,
    from_char: usize,
) -> Option<SearchMatch> {
    let limit_char = from_char
        .saturating_add(pattern_chars)
        .min(index.char_count());
    let limit_byte = index.char_to_byte(limit_char);
    let found = text[..limit_byte].rfind(pattern)?;
    let start = index.byte_to_char(found);
    Some(SearchMatch::new(start, start + pattern_chars))
}

/// Find the first occurrence of `pattern` at or after `start_char`.
///
/// If nothing is found and `start_char > 0`, the scan is retried once from offset 0 over the
/// whole document, so every occurrence is reachable from any caret position.
///
/// Returns `None` for an empty pattern (no scan is performed).
pub fn forward_search(text: &str, start_char: usize, pattern: &str) -> Option<SearchMatch> {
    if pattern.is_empty() {
        return None;
    }

    let index = CharIndex::new(text);
    let pattern_chars = pattern.chars().count();
    let start_char = start_char.min(index.char_count());

    let found = scan_forward(text, &index, pattern, pattern_chars, start_char);
    if found.is_some() || start_char == 0 {
        return found;
    }

    tracing::trace!(pattern, start_char, "forward search wrapped to start");
    scan_forward(text, &index, pattern, pattern_chars, 0)
}

/// Find the nearest occurrence of `pattern` before the match ending at `start_char`.
///
/// The scan starts at `start_char - len(pattern) - 1`, so a match that was just selected
/// (with the caret at its end) is not found again. When that start would be negative the
/// first pass finds nothing. On a miss the scan is retried once from the end of the document.
///
/// Returns `None` for an empty pattern (no scan is performed).
pub fn backward_search(text: &str, start_char: usize, pattern: &str) -> Option<SearchMatch> {
    if pattern.is_empty() {
        return None;
    }

    let index = CharIndex::new(text);
    let pattern_chars = pattern.chars().count();
    let start_char = start_char.min(index.char_count());

    let found = start_char
        .checked_sub(pattern_chars + 1)
        .and_then(|from| scan_backward(text, &index, pattern, pattern_chars, from));
    if found.is_some() {
        return found;
    }

    tracing::trace!(pattern, start_char, "backward search wrapped to end");
    scan_backward(text, &index, pattern, pattern_chars, index.char_count())
}

/// Find all non-overlapping occurrences of `pattern`, left to right.
///
/// After each match the next scan starts right after the matched region.
/// Returns an empty list if `pattern` is empty.
pub fn find_all(text: &str, pattern: &str) -> MatchList {
    if pattern.is_empty() {
        return MatchList::default();
    }

    let index = CharIndex::new(text);
    let pattern_chars = pattern.chars().count();

    let ranges = text
        .match_indices(pattern)
        .map(|(byte, _)| {
            let start = index.byte_to_char(byte);
            SearchMatch::new(start, start + pattern_chars)
        })
        .collect();

    MatchList { ranges }
}

/// Run a single-match search in `direction`.
pub fn search(
    text: &str,
    start_char: usize,
    pattern: &str,
    direction: SearchDirection,
) -> Option<SearchMatch> {
    match direction {
        SearchDirection::Forward => forward_search(text, start_char, pattern),
        SearchDirection::Backward => backward_search(text, start_char, pattern),
    }
}
