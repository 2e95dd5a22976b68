//! Cell buffer and diff renderer integration tests.

use zithril::buffer::diff;
use zithril::{Buffer, Cell, Rect, Style};

/// S6 — diff minimality: a single changed cell produces exactly one
/// segment carrying exactly that glyph, nothing else.
#[test]
fn diff_minimality_single_cell_change() {
    let area = Rect::new(0, 0, 10, 10);
    let prev = Buffer::empty(area);
    let mut curr = Buffer::empty(area);
    curr.set(5, 3, Cell::new('X', Style::new()));

    let segments = diff(&prev, &curr);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].x, 5);
    assert_eq!(segments[0].y, 3);
    assert_eq!(segments[0].glyphs, vec![(Style::new(), 'X')]);
}

/// S7 — a wide character written at the last column of a row is dropped
/// (would overflow into a nonexistent column) rather than corrupting the
/// buffer; the cell it would have occupied stays a plain blank.
#[test]
fn wide_character_at_row_end_is_not_written() {
    let area = Rect::new(0, 0, 5, 1);
    let mut buffer = Buffer::empty(area);
    buffer.set_string(4, 0, "中", Style::new());

    let cell = buffer.get(4, 0);
    assert_eq!(cell.ch, ' ');
    assert_eq!(cell.width, 1);
    assert!(!cell.is_wide());
}

/// No buffer ever holds a width-2 cell whose immediate successor in the
/// row is not a width-0 continuation.
#[test]
fn wide_cell_invariant_holds_after_mixed_writes() {
    let area = Rect::new(0, 0, 10, 1);
    let mut buffer = Buffer::empty(area);
    buffer.set_string(0, 0, "a中b", Style::new());

    for x in 0..area.width() {
        let cell = buffer.get(x, 0);
        if cell.is_wide() {
            let next = buffer.get(x + 1, 0);
            assert!(next.is_continuation());
        }
    }
}
