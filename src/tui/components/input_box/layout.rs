//! Row layout for the input box.
//!
//! Each logical line is word-wrapped with `textwrap`, then the wrapped
//! pieces are mapped back to byte ranges of the buffer. Rows tile the
//! buffer with no gaps (spaces at a wrap point stay on the upper row), so
//! every byte offset lands on exactly one `(row, column)`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (2) + padding (2) consumed horizontally.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders.
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box starts scrolling internally.
pub const MAX_VISIBLE_LINES: u16 = 5;

/// Byte range of one drawn row (newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Columns available for text inside a box of `area_width`.
pub(super) fn text_width(area_width: u16) -> usize {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD) as usize
}

/// Wrap settings for the input text: break on ASCII spaces, split words longer than a row.
pub(super) fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Splits `buffer` into rows of at most `width` columns. Always returns at least one row.
pub(super) fn rows(buffer: &str, width: usize) -> Vec<Row> {
    let options = wrap_options(width);
    let mut rows = Vec::new();
    let mut offset = 0;

    for logical in buffer.split('\n') {
        let first = rows.len();
        let mut search = 0;
        for piece in textwrap::wrap(logical, &options) {
            // Pieces are slices of `logical` in order, so the next match is the piece itself
            let start = logical[search..]
                .find(piece.as_ref())
                .map_or(search, |i| search + i);
            search = start + piece.len();
            rows.push(Row {
                start: offset + start,
                end: offset + search,
            });
        }
        if rows.len() == first {
            rows.push(Row {
                start: offset,
                end: offset,
            });
        }

        rows[first].start = offset;
        for i in first + 1..rows.len() {
            rows[i - 1].end = rows[i].start;
        }
        if let Some(last) = rows.last_mut() {
            last.end = offset + logical.len();
        }
        offset += logical.len() + 1;
    }
    rows
}

/// Row index and display column of byte offset `pos`.
///
/// A position on a soft-wrap boundary belongs to the following row.
pub(super) fn locate(buffer: &str, rows: &[Row], pos: usize) -> (usize, usize) {
    let row = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start);
    (row, buffer[start..pos].width())
}

/// Byte offset in `row` closest to display column `column` without passing it.
pub(super) fn offset_at_column(buffer: &str, row: Row, column: usize) -> usize {
    let mut used = 0;
    for (i, c) in buffer[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > column {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

/// Box height for `buffer` at `area_width`, capped at `MAX_VISIBLE_LINES` rows.
pub(super) fn box_height(buffer: &str, area_width: u16) -> u16 {
    let count = rows(buffer, text_width(area_width)).len() as u16;
    count.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_one_row() {
        assert_eq!(rows("", 10), vec![Row { start: 0, end: 0 }]);
    }

    #[test]
    fn newlines_split_rows() {
        let r = rows("ab\n\ncd", 10);
        assert_eq!(
            r,
            vec![
                Row { start: 0, end: 2 },
                Row { start: 3, end: 3 },
                Row { start: 4, end: 6 },
            ]
        );
    }

    #[test]
    fn long_line_hard_wraps() {
        let r = rows("abcdefg", 3);
        assert_eq!(r.len(), 3);
        assert_eq!(r[2], Row { start: 6, end: 7 });
    }

    #[test]
    fn words_wrap_at_spaces() {
        let r = rows("hello world", 8);
        assert_eq!(
            r,
            vec![Row { start: 0, end: 6 }, Row { start: 6, end: 11 }]
        );
        assert_eq!(locate("hello world", &r, 5), (0, 5));
        assert_eq!(locate("hello world", &r, 6), (1, 0));
    }

    #[test]
    fn repeated_words_map_to_their_own_offsets() {
        let buffer = "ab ab ab";
        let r = rows(buffer, 2);
        assert_eq!(
            r,
            vec![
                Row { start: 0, end: 3 },
                Row { start: 3, end: 6 },
                Row { start: 6, end: 8 },
            ]
        );
    }

    #[test]
    fn wide_chars_count_double() {
        // Each CJK char is 2 columns wide
        let r = rows("日本語", 4);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0], Row { start: 0, end: 6 });
    }

    #[test]
    fn locate_prefers_next_row_on_wrap_boundary() {
        let buffer = "abcdef";
        let r = rows(buffer, 3);
        assert_eq!(locate(buffer, &r, 3), (1, 0));
        assert_eq!(locate(buffer, &r, 2), (0, 2));
        assert_eq!(locate(buffer, &r, 6), (1, 3));
    }

    #[test]
    fn locate_after_trailing_newline() {
        let buffer = "hi\n";
        let r = rows(buffer, 10);
        assert_eq!(locate(buffer, &r, 2), (0, 2));
        assert_eq!(locate(buffer, &r, 3), (1, 0));
    }

    #[test]
    fn offset_at_column_clamps_to_row_end() {
        let buffer = "abc\nx";
        let r = rows(buffer, 10);
        assert_eq!(offset_at_column(buffer, r[0], 1), 1);
        assert_eq!(offset_at_column(buffer, r[1], 5), 5);
    }

    #[test]
    fn height_is_capped() {
        assert_eq!(box_height("", 40), 1 + VERTICAL_OVERHEAD);
        assert_eq!(box_height("a\nb\nc", 40), 3 + VERTICAL_OVERHEAD);
        assert_eq!(
            box_height("1\n2\n3\n4\n5\n6\n7", 40),
            MAX_VISIBLE_LINES + VERTICAL_OVERHEAD
        );
    }
}
