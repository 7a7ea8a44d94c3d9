//! Cursor movement and internal scrolling for the input box.

use ratatui::layout::Rect;

use super::layout::{self, MAX_VISIBLE_LINES};

pub(super) struct CursorState {
    /// Byte offset into the buffer, always on a char boundary.
    pub pos: usize,
    /// First visible row when the content is taller than the box.
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn left(&mut self, buffer: &str) -> bool {
        match buffer[..self.pos].chars().next_back() {
            Some(c) => {
                self.pos -= c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn right(&mut self, buffer: &str) -> bool {
        match buffer[self.pos..].chars().next() {
            Some(c) => {
                self.pos += c.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Byte range of the char before the cursor, if any.
    pub fn char_before(&self, buffer: &str) -> Option<std::ops::Range<usize>> {
        let c = buffer[..self.pos].chars().next_back()?;
        Some(self.pos - c.len_utf8()..self.pos)
    }

    /// Byte range of the char under the cursor, if any.
    pub fn char_at(&self, buffer: &str) -> Option<std::ops::Range<usize>> {
        let c = buffer[self.pos..].chars().next()?;
        Some(self.pos..self.pos + c.len_utf8())
    }

    /// Moves to the start (`to_end = false`) or end of the current row.
    pub fn row_edge(&mut self, buffer: &str, width: usize, to_end: bool) -> bool {
        let rows = layout::rows(buffer, width);
        let (row, _) = layout::locate(buffer, &rows, self.pos);
        let target = if to_end { rows[row].end } else { rows[row].start };
        let moved = target != self.pos;
        self.pos = target;
        moved
    }

    /// Moves one row up (`delta < 0`) or down, keeping the display column.
    pub fn vertical(&mut self, buffer: &str, width: usize, delta: isize) -> bool {
        let rows = layout::rows(buffer, width);
        let (row, column) = layout::locate(buffer, &rows, self.pos);
        let Some(target) = row.checked_add_signed(delta).filter(|r| *r < rows.len()) else {
            return false;
        };
        self.pos = layout::offset_at_column(buffer, rows[target], column);
        true
    }

    /// Adjusts `scroll_offset` so the cursor row is visible.
    pub fn follow(&mut self, buffer: &str, width: usize) {
        let rows = layout::rows(buffer, width);
        if rows.len() as u16 <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (row, _) = layout::locate(buffer, &rows, self.pos);
        let row = row as u16;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Terminal cell of the cursor inside a box drawn at `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let rows = layout::rows(buffer, layout::text_width(area.width));
        let (row, column) = layout::locate(buffer, &rows, self.pos);
        let column = u16::try_from(column).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(2).saturating_add(column);
        let y = area.y + 1 + (row as u16).saturating_sub(self.scroll_offset);
        (x.min(area.right().saturating_sub(2)), y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_right_step_over_multibyte_chars() {
        let buffer = "aé🔥";
        let mut cursor = CursorState::new();
        assert!(cursor.right(buffer));
        assert!(cursor.right(buffer));
        assert_eq!(cursor.pos, 3);
        assert!(cursor.right(buffer));
        assert_eq!(cursor.pos, buffer.len());
        assert!(!cursor.right(buffer));
        assert!(cursor.left(buffer));
        assert_eq!(cursor.pos, 3);
    }

    #[test]
    fn vertical_keeps_column_and_stops_at_edges() {
        let buffer = "hello\nhi\nworld";
        let mut cursor = CursorState::new();
        cursor.pos = 4; // "hell|o"
        assert!(!cursor.vertical(buffer, 40, -1));
        assert!(cursor.vertical(buffer, 40, 1));
        assert_eq!(cursor.pos, 8); // clamped to end of "hi"
        assert!(cursor.vertical(buffer, 40, 1));
        assert_eq!(cursor.pos, 11); // "wo|rld" at column 2
        assert!(!cursor.vertical(buffer, 40, 1));
    }

    #[test]
    fn row_edges_follow_soft_wraps() {
        let buffer = "abcdefgh";
        let mut cursor = CursorState::new();
        cursor.pos = 5;
        assert!(cursor.row_edge(buffer, 4, false));
        assert_eq!(cursor.pos, 4);
        assert!(cursor.row_edge(buffer, 4, true));
        assert_eq!(cursor.pos, 8);
    }

    #[test]
    fn follow_scrolls_to_cursor_row() {
        let buffer = "1\n2\n3\n4\n5\n6\n7";
        let mut cursor = CursorState::new();
        cursor.pos = buffer.len();
        cursor.follow(buffer, 40);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.follow(buffer, 40);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_is_inside_border_and_padding() {
        let cursor = CursorState::new();
        let area = Rect::new(10, 20, 30, 3);
        assert_eq!(cursor.screen_pos("", area), (12, 21));
    }
}
