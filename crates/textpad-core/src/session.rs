//! Search session state shared by the find commands and the replace dialog.

/// Default bound on stored patterns, in characters.
pub const DEFAULT_MAX_PATTERN_LEN: usize = 511;

/// Last search pattern and last replacement text.
///
/// Owned by the command executor and passed explicitly to whoever needs it, so "find next"
/// from the menu and "find next" from the replace dialog continue the same search.
#[derive(Debug, Clone)]
pub struct SearchSession {
    last_pattern: String,
    last_replacement: String,
    max_len: usize,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PATTERN_LEN)
    }
}

impl SearchSession {
    /// Create an empty session storing at most `max_len` characters per field.
    pub fn new(max_len: usize) -> Self {
        Self {
            last_pattern: String::new(),
            last_replacement: String::new(),
            max_len,
        }
    }

    /// Store `pattern` (truncated to the bound) and return the stored value.
    pub fn set_pattern(&mut self, pattern: &str) -> &str {
        self.last_pattern = truncate_chars(pattern, self.max_len);
        &self.last_pattern
    }

    /// The last non-empty pattern, if any.
    pub fn last_pattern(&self) -> Option<&str> {
        if self.last_pattern.is_empty() {
            None
        } else {
            Some(&self.last_pattern)
        }
    }

    /// Store `replacement` (truncated to the bound) and return the stored value.
    pub fn set_replacement(&mut self, replacement: &str) -> &str {
        self.last_replacement = truncate_chars(replacement, self.max_len);
        &self.last_replacement
    }

    /// The last replacement text (may be empty).
    pub fn replacement(&self) -> &str {
        &self.last_replacement
    }

    /// Maximum stored length in characters.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => text[..byte].to_string(),
        None => text.to_string(),
    }
}
