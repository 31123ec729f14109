//! Scratch text buffer backing the raw JSON view.
//!
//! When the editor switches to the JSON view it serializes the current
//! story into one of these buffers. The buffer is freely editable on
//! screen, but nothing ever parses it back: leaving the view drops the
//! buffer, and the next visit reserializes from state. That makes it a
//! scratch pad over a snapshot, which is exactly the contract the rest
//! of the app relies on.

use ropey::Rope;
use unicode_width::UnicodeWidthChar;

/// Cursor position in the scratch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rope-backed text buffer with a single editing cursor.
///
/// No dirty flag and no save path: the buffer never outlives the view
/// it was created for.
pub struct ScratchBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl ScratchBuffer {
    /// Create a buffer holding the given text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
        }
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let s = line.to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self.line_len(self.cursor.line - 1);
            let char_idx = self.cursor_char_idx();
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_line_len);
        } else {
            let char_idx = self.cursor_char_idx();
            let line = self.rope.line(self.cursor.line);
            let line_str = line.to_string();
            let before = &line_str[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        }
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        self.rope.remove(char_idx..=char_idx);
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor to a specific line and column, clamping both.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line = self.rope.line(self.cursor.line);
        let line_str: String = line.chars().collect();
        // Convert byte offset to char offset within the line
        let byte_col = self.cursor.col.min(line_str.len());
        let char_offset = line_str[..byte_col].chars().count();
        line_start + char_offset
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

impl std::fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Convert a display column (terminal cells) into a byte offset within
/// `line`.
///
/// Wide characters count as their rendered width, so a mouse click on
/// either half of a double-width glyph resolves to a valid boundary.
/// Columns past the end of the line land after the last character.
pub fn display_col_to_byte(line: &str, display_col: usize) -> usize {
    let mut width = 0;
    for (byte_idx, ch) in line.char_indices() {
        if width >= display_col {
            return byte_idx;
        }
        width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }
    line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = "{\n  \"title\": \"maze\",\n  \"entries\": []\n}";

    #[test]
    fn test_display_col_to_byte_ascii() {
        assert_eq!(display_col_to_byte("abc", 0), 0);
        assert_eq!(display_col_to_byte("abc", 2), 2);
        assert_eq!(display_col_to_byte("abc", 10), 3);
    }

    #[test]
    fn test_display_col_to_byte_multibyte() {
        // é is two bytes but one cell wide
        assert_eq!(display_col_to_byte("café!", 4), 5);
    }

    #[test]
    fn test_display_col_to_byte_wide_chars() {
        // 漢 is three bytes and two cells wide
        assert_eq!(display_col_to_byte("漢字", 0), 0);
        assert_eq!(display_col_to_byte("漢字", 2), 3);
    }

    #[test]
    fn test_from_text_splits_lines() {
        let buf = ScratchBuffer::from_text(SNIPPET);
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.line_at(0), Some("{".to_string()));
        assert_eq!(buf.line_at(1), Some("  \"title\": \"maze\",".to_string()));
        assert_eq!(buf.line_at(3), Some("}".to_string()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = ScratchBuffer::from_text("{}");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_text_round_trips() {
        let buf = ScratchBuffer::from_text(SNIPPET);
        assert_eq!(buf.text(), SNIPPET);
    }

    #[test]
    fn test_cursor_starts_at_origin() {
        let buf = ScratchBuffer::from_text(SNIPPET);
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buf = ScratchBuffer::from_text("{}");
        buf.move_cursor(Direction::Right);
        buf.insert_char('x');
        assert_eq!(buf.line_at(0), Some("{x}".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = ScratchBuffer::from_text("\"id\": 1,");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("\"id\":".to_string()));
        assert_eq!(buf.line_at(1), Some(" 1,".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = ScratchBuffer::from_text("{}");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "{}");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = ScratchBuffer::from_text("{\n}");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("{}".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_delete_forward_at_buffer_end_is_noop() {
        let mut buf = ScratchBuffer::from_text("{}");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = ScratchBuffer::from_text("[\n]");
        buf.move_to(0, 1);
        assert!(buf.delete_forward());
        assert_eq!(buf.line_at(0), Some("[]".to_string()));
    }

    #[test]
    fn test_move_left_wraps_to_previous_line() {
        let mut buf = ScratchBuffer::from_text("{\n}");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = ScratchBuffer::from_text("{\n}");
        buf.move_to(0, 1);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_vertical_movement_keeps_sticky_column() {
        let mut buf = ScratchBuffer::from_text("  \"text\": \"hi\",\n{\n  \"next_id\": 2");
        buf.move_to(0, 10);
        buf.move_cursor(Direction::Down); // "{" clamps to col 1
        assert_eq!(buf.cursor().line, 1);
        assert_eq!(buf.cursor().col, 1);
        buf.move_cursor(Direction::Down); // long line restores col 10
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 10);
    }

    #[test]
    fn test_move_home_and_end() {
        let mut buf = ScratchBuffer::from_text("  \"id\": 7");
        buf.move_end();
        assert_eq!(buf.cursor().col, 9);
        buf.move_home();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_to_clamps_line_and_col() {
        let mut buf = ScratchBuffer::from_text("{}");
        buf.move_to(10, 10);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_move_to_buffer_ends() {
        let mut buf = ScratchBuffer::from_text(SNIPPET);
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(3, 1));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_multibyte_insert_and_delete() {
        let mut buf = ScratchBuffer::from_text("\"café\"");
        buf.move_to(0, buf.line_len(0) - 1); // before closing quote
        assert_eq!(buf.cursor().col, 6); // 'é' is 2 bytes
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("\"caf\"".to_string()));
    }

    #[test]
    fn test_edit_sequence_types_over_snapshot() {
        let mut buf = ScratchBuffer::from_text("\"title\": \"\"");
        buf.move_to(0, 10);
        for ch in "maze".chars() {
            buf.insert_char(ch);
        }
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("\"title\": \"maz\"".to_string()));
    }
}
