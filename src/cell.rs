//! Cell type — a single terminal cell.

use crate::style::Style;
use unicode_width::UnicodeWidthChar;

/// A single cell in the terminal screen buffer.
///
/// Every wide cell (`width == 2`) is immediately followed in its row by a
/// placeholder cell (`width == 0`) reserving the second column; placeholder
/// cells are never constructed directly by callers outside [`crate::buffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The Unicode scalar value displayed in this cell.
    pub ch: char,
    /// The style of this cell.
    pub style: Style,
    /// Display width: 0 (placeholder/zero-width), 1, or 2.
    pub width: u8,
}

impl Cell {
    /// Create a new cell, auto-detecting width from the character.
    pub fn new(ch: char, style: Style) -> Self {
        let width = char_display_width(ch);
        Self { ch, style, width }
    }

    /// Create a blank cell (space, default style, width 1).
    pub const fn blank() -> Self {
        Self {
            ch: ' ',
            style: Style::new(),
            width: 1,
        }
    }

    /// Create a continuation cell (placeholder for the second column of a
    /// wide character). `style` should mirror the wide cell it follows.
    pub const fn continuation(style: Style) -> Self {
        Self {
            ch: ' ',
            style,
            width: 0,
        }
    }

    /// Returns true if this is a blank cell (space with default style).
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.style.is_empty() && self.width == 1
    }

    /// Returns true if this is a wide character (width 2).
    pub const fn is_wide(&self) -> bool {
        self.width == 2
    }

    /// Returns true if this is a continuation/placeholder cell (width 0).
    pub const fn is_continuation(&self) -> bool {
        self.width == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

/// Compute the terminal display width of a single Unicode scalar value.
///
/// Zero for combining marks and other zero-width codepoints, 2 for
/// East-Asian Wide/Full-Width codepoints, 1 otherwise.
pub fn char_display_width(ch: char) -> u8 {
    UnicodeWidthChar::width(ch).unwrap_or(0) as u8
}
