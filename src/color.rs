//! Terminal colour representation.

/// A terminal colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// One of the 16 standard ANSI colours.
    Named(NamedColor),
    /// An 8-bit palette index (0-255).
    Indexed(u8),
    /// A 24-bit RGB triplet.
    Rgb(u8, u8, u8),
}

/// The 16 standard ANSI colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedColor {
    /// Black (0).
    Black,
    /// Red (1).
    Red,
    /// Green (2).
    Green,
    /// Yellow (3).
    Yellow,
    /// Blue (4).
    Blue,
    /// Magenta (5).
    Magenta,
    /// Cyan (6).
    Cyan,
    /// White (7).
    White,
    /// Bright black / dark gray (8).
    BrightBlack,
    /// Bright red (9).
    BrightRed,
    /// Bright green (10).
    BrightGreen,
    /// Bright yellow (11).
    BrightYellow,
    /// Bright blue (12).
    BrightBlue,
    /// Bright magenta (13).
    BrightMagenta,
    /// Bright cyan (14).
    BrightCyan,
    /// Bright white (15).
    BrightWhite,
}

impl NamedColor {
    /// The 8-bit SGR foreground parameter (30-37, 90-97) for this colour.
    pub const fn sgr_fg(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::BrightBlack => 90,
            Self::BrightRed => 91,
            Self::BrightGreen => 92,
            Self::BrightYellow => 93,
            Self::BrightBlue => 94,
            Self::BrightMagenta => 95,
            Self::BrightCyan => 96,
            Self::BrightWhite => 97,
        }
    }

    /// The 8-bit SGR background parameter (40-47, 100-107) for this colour.
    pub const fn sgr_bg(self) -> u8 {
        self.sgr_fg() + 10
    }

    /// The 8-bit palette index (0-15) that this named colour maps to.
    pub const fn palette_index(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::BrightBlack => 8,
            Self::BrightRed => 9,
            Self::BrightGreen => 10,
            Self::BrightYellow => 11,
            Self::BrightBlue => 12,
            Self::BrightMagenta => 13,
            Self::BrightCyan => 14,
            Self::BrightWhite => 15,
        }
    }
}

const INDEXED_TO_NAMED: [NamedColor; 16] = [
    NamedColor::Black,
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Yellow,
    NamedColor::Blue,
    NamedColor::Magenta,
    NamedColor::Cyan,
    NamedColor::White,
    NamedColor::BrightBlack,
    NamedColor::BrightRed,
    NamedColor::BrightGreen,
    NamedColor::BrightYellow,
    NamedColor::BrightBlue,
    NamedColor::BrightMagenta,
    NamedColor::BrightCyan,
    NamedColor::BrightWhite,
];

impl Color {
    /// Downgrade this colour to the closest representation expressible with
    /// only the 16 standard ANSI colours, for terminals with no truecolor or
    /// 256-colour support.
    pub fn to_named_approx(self) -> NamedColor {
        match self {
            Self::Named(n) => n,
            Self::Indexed(i) if i < 16 => INDEXED_TO_NAMED[i as usize],
            Self::Indexed(i) if i < 232 => {
                // 6x6x6 color cube (16-231): approximate by the dominant channel.
                let cube = i - 16;
                let r = cube / 36;
                let g = (cube / 6) % 6;
                let b = cube % 6;
                rgb_to_named(r * 51, g * 51, b * 51)
            }
            Self::Indexed(i) => {
                // Grayscale ramp (232-255).
                let level = (i - 232) * 10 + 8;
                rgb_to_named(level, level, level)
            }
            Self::Rgb(r, g, b) => rgb_to_named(r, g, b),
        }
    }

    /// Downgrade this colour to an 8-bit palette index, for terminals
    /// without truecolor support.
    pub const fn to_indexed_approx(self) -> u8 {
        match self {
            Self::Named(n) => n.palette_index(),
            Self::Indexed(i) => i,
            Self::Rgb(r, g, b) => {
                let r = (r as u16 * 5 / 255) as u8;
                let g = (g as u16 * 5 / 255) as u8;
                let b = (b as u16 * 5 / 255) as u8;
                16 + 36 * r + 6 * g + b
            }
        }
    }
}

fn rgb_to_named(r: u8, g: u8, b: u8) -> NamedColor {
    let brightness = u16::from(r) + u16::from(g) + u16::from(b);
    if brightness < 96 {
        return NamedColor::Black;
    }
    if brightness > 650 {
        return NamedColor::BrightWhite;
    }
    let max = r.max(g).max(b);
    let bright = brightness > 400;
    match max {
        m if m == r && r >= g && r >= b => {
            if bright {
                NamedColor::BrightRed
            } else {
                NamedColor::Red
            }
        }
        m if m == g => {
            if bright {
                NamedColor::BrightGreen
            } else {
                NamedColor::Green
            }
        }
        _ => {
            if bright {
                NamedColor::BrightBlue
            } else {
                NamedColor::Blue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_color_sgr_codes() {
        assert_eq!(NamedColor::Red.sgr_fg(), 31);
        assert_eq!(NamedColor::Red.sgr_bg(), 41);
        assert_eq!(NamedColor::BrightRed.sgr_fg(), 91);
        assert_eq!(NamedColor::BrightRed.sgr_bg(), 101);
    }

    #[test]
    fn named_color_palette_index_roundtrip() {
        for i in 0..16u8 {
            assert_eq!(INDEXED_TO_NAMED[i as usize].palette_index(), i);
        }
    }

    #[test]
    fn indexed_below_16_maps_directly() {
        assert_eq!(Color::Indexed(1).to_named_approx(), NamedColor::Red);
    }

    #[test]
    fn rgb_black_maps_to_black() {
        assert_eq!(Color::Rgb(0, 0, 0).to_named_approx(), NamedColor::Black);
    }

    #[test]
    fn rgb_pure_red_maps_to_red() {
        assert_eq!(Color::Rgb(200, 0, 0).to_named_approx(), NamedColor::Red);
    }

    #[test]
    fn rgb_white_maps_to_bright_white() {
        assert_eq!(
            Color::Rgb(255, 255, 255).to_named_approx(),
            NamedColor::BrightWhite
        );
    }

    #[test]
    fn indexed_approx_passthrough() {
        assert_eq!(Color::Indexed(200).to_indexed_approx(), 200);
    }

    #[test]
    fn color_equality_is_structural() {
        assert_eq!(Color::Rgb(1, 2, 3), Color::Rgb(1, 2, 3));
        assert_ne!(Color::Rgb(1, 2, 3), Color::Rgb(1, 2, 4));
    }
}
