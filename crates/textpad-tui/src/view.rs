//! Drawing one editor pane: gutter, soft wrap, selection and find-all highlight.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::ops::Range;
use textpad_core::{Document, Editor, HighlightMask, MatchStyle, SearchMatch, SurfaceId};
use unicode_width::UnicodeWidthChar;

/// Cells used by a tab.
pub const TAB_WIDTH: usize = 4;

/// Scroll position of one pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneState {
    /// First logical line drawn.
    pub top_line: usize,
    /// Horizontal scroll in cells, used when wrapping is off.
    pub scroll_left: usize,
}

pub fn char_cells(ch: char) -> usize {
    if ch == '\t' {
        TAB_WIDTH
    } else {
        ch.width().unwrap_or(0)
    }
}

fn cells(chars: &[char]) -> usize {
    chars.iter().map(|&ch| char_cells(ch)).sum()
}

/// Split a line into char ranges of at most `width` cells each (at least one range).
pub fn wrap_segments(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, &ch) in chars.iter().enumerate() {
        let w = char_cells(ch);
        if width > 0 && used + w > width && i > start {
            segments.push(start..i);
            start = i;
            used = 0;
        }
        used += w;
    }
    segments.push(start..chars.len());
    segments
}

/// Index of the segment holding column `col` (a column at a segment end belongs to the next one,
/// except after the last segment).
pub fn segment_of(segments: &[Range<usize>], col: usize) -> usize {
    segments
        .iter()
        .position(|seg| col < seg.end)
        .unwrap_or(segments.len().saturating_sub(1))
}

/// Gutter width for `line_count` lines: digits plus one separating space.
pub fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len() + 1
}

fn line_chars(doc: &Document, line: usize) -> Vec<char> {
    doc.line_text(line).unwrap_or_default().chars().collect()
}

impl PaneState {
    /// Scroll so the caret is inside a `text_width` x `height` text area.
    pub fn follow_caret(&mut self, editor: &Editor, caret: usize, text_width: usize, height: usize) {
        let doc = editor.document();
        let caret_line = doc.char_to_line(caret);
        let caret_col = caret.saturating_sub(doc.line_to_char(caret_line));
        self.top_line = self.top_line.min(doc.line_count().saturating_sub(1));
        if caret_line < self.top_line {
            self.top_line = caret_line;
        }
        if height == 0 {
            return;
        }

        if editor.word_wrap() {
            self.scroll_left = 0;
            while self.top_line < caret_line {
                let mut rows = 0;
                for line in self.top_line..caret_line {
                    rows += wrap_segments(&line_chars(doc, line), text_width).len();
                }
                let segments = wrap_segments(&line_chars(doc, caret_line), text_width);
                rows += segment_of(&segments, caret_col) + 1;
                if rows <= height {
                    break;
                }
                self.top_line += 1;
            }
        } else {
            if caret_line >= self.top_line + height {
                self.top_line = caret_line + 1 - height;
            }
            let chars = line_chars(doc, caret_line);
            let x = cells(&chars[..caret_col.min(chars.len())]);
            if x < self.scroll_left {
                self.scroll_left = x;
            } else if text_width > 0 && x >= self.scroll_left + text_width {
                self.scroll_left = x + 1 - text_width;
            }
        }
    }
}

fn cell_style(offset: usize, selection: Option<SearchMatch>, flash: Option<&HighlightMask>) -> Style {
    let mut style = Style::default();
    if flash.is_some_and(|mask| mask.style_at(offset) == MatchStyle::Matched) {
        style = style.fg(Color::Black).bg(Color::Yellow);
    }
    if selection.is_some_and(|sel| sel.start <= offset && offset < sel.end) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// Spans for `chars[segment]`, skipping `skip` leading cells and clipping at `width` cells.
fn styled_segment(
    chars: &[char],
    segment: Range<usize>,
    line_start: usize,
    skip: usize,
    width: usize,
    selection: Option<SearchMatch>,
    flash: Option<&HighlightMask>,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current: Option<Style> = None;
    let mut buffer = String::new();
    let mut x = 0;

    for col in segment {
        let ch = chars[col];
        let w = char_cells(ch);
        let visible = x >= skip && x + w <= skip + width;
        x += w;
        if !visible {
            continue;
        }

        let style = cell_style(line_start + col, selection, flash);
        if current.is_some_and(|s| s != style) {
            spans.push(Span::styled(std::mem::take(&mut buffer), current.unwrap_or_default()));
        }
        current = Some(style);
        if ch == '\t' {
            buffer.push_str(&" ".repeat(TAB_WIDTH));
        } else {
            buffer.push(ch);
        }
    }
    if !buffer.is_empty() {
        spans.push(Span::styled(buffer, current.unwrap_or_default()));
    }
    spans
}

/// Draw the pane for `surface`. Returns the screen position of its caret, if visible.
pub fn render_pane(
    frame: &mut Frame,
    area: Rect,
    editor: &Editor,
    surface: SurfaceId,
    state: &mut PaneState,
    flash: Option<&HighlightMask>,
    focused: bool,
) -> Option<(u16, u16)> {
    let title = match surface {
        SurfaceId::Primary => format!(" {} ", editor.title()),
        SurfaceId::Split => format!(" {} (split) ", editor.title()),
    };
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }

    let doc = editor.document();
    let gutter = if editor.line_numbers() {
        gutter_width(doc.line_count())
    } else {
        0
    };
    let text_width = (inner.width as usize).saturating_sub(gutter);
    let height = inner.height as usize;
    let wrap = editor.word_wrap();
    let caret = editor.caret(surface);
    state.follow_caret(editor, caret, text_width, height);

    let selection = editor.selection();
    let skip = if wrap { 0 } else { state.scroll_left };
    let mut rows: Vec<Line> = Vec::with_capacity(height);
    let mut cursor = None;

    let mut line = state.top_line;
    while rows.len() < height && line < doc.line_count() {
        let chars = line_chars(doc, line);
        let line_start = doc.line_to_char(line);
        let segments = if wrap {
            wrap_segments(&chars, text_width)
        } else {
            vec![0..chars.len()]
        };
        let caret_col = (line == doc.char_to_line(caret)).then(|| caret - line_start);
        let caret_segment = caret_col.map(|col| segment_of(&segments, col));

        for (i, segment) in segments.iter().enumerate() {
            if rows.len() >= height {
                break;
            }
            let mut spans = Vec::new();
            if gutter > 0 {
                let label = if i == 0 {
                    format!("{:>w$} ", line + 1, w = gutter - 1)
                } else {
                    " ".repeat(gutter)
                };
                spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
            }
            spans.extend(styled_segment(
                &chars,
                segment.clone(),
                line_start,
                skip,
                text_width,
                selection,
                flash,
            ));

            if let (Some(col), Some(seg_idx)) = (caret_col, caret_segment) {
                if seg_idx == i {
                    let before = &chars[segment.start..col.min(chars.len())];
                    let x = cells(before).saturating_sub(skip);
                    if x < text_width.max(1) {
                        cursor = Some((
                            inner.x + (gutter + x) as u16,
                            inner.y + rows.len() as u16,
                        ));
                    }
                }
            }
            rows.push(Line::from(spans));
        }
        line += 1;
    }

    frame.render_widget(Paragraph::new(rows), inner);
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_wrap_segments() {
        assert_eq!(wrap_segments(&chars(""), 4), vec![0..0]);
        assert_eq!(wrap_segments(&chars("abcdefghij"), 4), vec![0..4, 4..8, 8..10]);
        // Wide characters take two cells.
        assert_eq!(wrap_segments(&chars("日本語"), 4), vec![0..2, 2..3]);
        assert_eq!(wrap_segments(&chars("abc"), 0), vec![0..3]);
    }

    #[test]
    fn test_segment_of() {
        let segments = vec![0..4, 4..8, 8..10];
        assert_eq!(segment_of(&segments, 0), 0);
        assert_eq!(segment_of(&segments, 4), 1);
        assert_eq!(segment_of(&segments, 10), 2);
    }

    #[test]
    fn test_gutter_width() {
        assert_eq!(gutter_width(0), 2);
        assert_eq!(gutter_width(9), 2);
        assert_eq!(gutter_width(10), 3);
    }

    #[test]
    fn test_follow_caret_scrolls_down_and_up() {
        let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let mut editor = Editor::new(&text);
        let mut state = PaneState::default();

        editor.set_caret(editor.document().line_to_char(30));
        state.follow_caret(&editor, editor.focused_caret(), 40, 10);
        assert_eq!(state.top_line, 21);

        editor.set_caret(0);
        state.follow_caret(&editor, 0, 40, 10);
        assert_eq!(state.top_line, 0);
    }

    #[test]
    fn test_follow_caret_scrolls_horizontally_without_wrap() {
        let mut editor = Editor::new(&"x".repeat(100));
        editor.toggle_word_wrap();
        let mut state = PaneState::default();
        state.follow_caret(&editor, 60, 20, 5);
        assert_eq!(state.scroll_left, 41);
    }

    #[test]
    fn test_styled_segment_marks_selection_and_matches() {
        let mut mask = HighlightMask::new(6);
        mask.mark_range(0, 2);
        let spans = styled_segment(
            &chars("abcdef"),
            0..6,
            0,
            0,
            80,
            Some(SearchMatch::new(4, 6)),
            Some(&mask),
        );
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["ab", "cd", "ef"]);
        assert_eq!(spans[0].style.bg, Some(Color::Yellow));
        assert!(spans[2].style.add_modifier.contains(Modifier::REVERSED));
    }
}
