//! Style types: text attributes and the cell-level [`Style`] record.
//!
//! Colour-value math (blending, gradients, contrast ratios) is out of scope
//! for this crate; colours live in [`crate::color`] as a plain wire-format
//! enum that the terminal backend renders, nothing more.

use crate::color::Color;

/// A single text attribute bit.
///
/// Stored as an explicit bitset field on [`Style`] rather than pulled in via
/// an external bitflags crate: eight named booleans, unioned on patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Bold / increased intensity.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Dim / decreased intensity.
    pub dim: bool,
    /// Blink.
    pub blink: bool,
    /// Reverse video (swap fg/bg).
    pub reverse: bool,
    /// Strikethrough.
    pub strikethrough: bool,
    /// Overline.
    pub overline: bool,
}

impl Attributes {
    /// Union two attribute sets (OR each field).
    pub const fn union(self, other: Self) -> Self {
        Self {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            dim: self.dim || other.dim,
            blink: self.blink || other.blink,
            reverse: self.reverse || other.reverse,
            strikethrough: self.strikethrough || other.strikethrough,
            overline: self.overline || other.overline,
        }
    }

    /// Returns true if no attribute is set.
    pub const fn is_empty(self) -> bool {
        !(self.bold
            || self.italic
            || self.underline
            || self.dim
            || self.blink
            || self.reverse
            || self.strikethrough
            || self.overline)
    }
}

/// A cell's style: text attributes plus optional foreground/background colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    /// Text attributes.
    pub attributes: Attributes,
    /// Foreground colour, or `None` to inherit the terminal default.
    pub fg: Option<Color>,
    /// Background colour, or `None` to inherit the terminal default.
    pub bg: Option<Color>,
}

impl Style {
    /// The empty style: no attributes, no colours.
    pub const fn new() -> Self {
        Self {
            attributes: Attributes {
                bold: false,
                italic: false,
                underline: false,
                dim: false,
                blink: false,
                reverse: false,
                strikethrough: false,
                overline: false,
            },
            fg: None,
            bg: None,
        }
    }

    /// Returns true if this style is the empty style.
    pub const fn is_empty(self) -> bool {
        self.attributes.is_empty() && self.fg.is_none() && self.bg.is_none()
    }

    /// Set the foreground colour.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background colour.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the bold attribute.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.attributes.bold = true;
        self
    }

    /// Set the italic attribute.
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.attributes.italic = true;
        self
    }

    /// Set the underline attribute.
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.attributes.underline = true;
        self
    }

    /// Set the dim attribute.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.attributes.dim = true;
        self
    }

    /// Set the blink attribute.
    #[must_use]
    pub const fn blink(mut self) -> Self {
        self.attributes.blink = true;
        self
    }

    /// Set the reverse attribute.
    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.attributes.reverse = true;
        self
    }

    /// Set the strikethrough attribute.
    #[must_use]
    pub const fn strikethrough(mut self) -> Self {
        self.attributes.strikethrough = true;
        self
    }

    /// Set the overline attribute.
    #[must_use]
    pub const fn overline(mut self) -> Self {
        self.attributes.overline = true;
        self
    }

    /// Compose two styles: fields set on `other` override `self`, attribute
    /// sets union.
    #[must_use]
    pub fn patch(self, other: Self) -> Self {
        Self {
            attributes: self.attributes.union(other.attributes),
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    #[test]
    fn empty_style_has_no_attrs_or_colors() {
        let s = Style::new();
        assert!(s.is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let s = Style::new().bold().fg(Color::Named(NamedColor::Red));
        assert!(s.attributes.bold);
        assert_eq!(s.fg, Some(Color::Named(NamedColor::Red)));
        assert!(!s.is_empty());
    }

    #[test]
    fn patch_overrides_colors_and_unions_attributes() {
        let base = Style::new().bold().fg(Color::Named(NamedColor::Red));
        let patch = Style::new().italic().fg(Color::Named(NamedColor::Blue));
        let result = base.patch(patch);

        assert!(result.attributes.bold);
        assert!(result.attributes.italic);
        assert_eq!(result.fg, Some(Color::Named(NamedColor::Blue)));
        assert_eq!(result.bg, None);
    }

    #[test]
    fn patch_preserves_base_when_other_is_empty() {
        let base = Style::new().bold().fg(Color::Named(NamedColor::Green));
        let result = base.patch(Style::new());
        assert_eq!(result, base);
    }

    #[test]
    fn style_equality_is_structural() {
        let a = Style::new().bold().fg(Color::Rgb(1, 2, 3));
        let b = Style::new().bold().fg(Color::Rgb(1, 2, 3));
        assert_eq!(a, b);
    }
}
