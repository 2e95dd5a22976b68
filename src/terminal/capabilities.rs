//! Terminal type and colour-support detection, derived entirely from
//! environment variables at start-up — never queried from the terminal at
//! runtime.

use std::collections::HashMap;

use tracing::debug;

/// Level of colour support a terminal offers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSupport {
    /// The 16 standard ANSI colours only.
    #[default]
    Basic16,
    /// 256-colour palette.
    Extended256,
    /// 24-bit RGB.
    TrueColor,
}

/// The detected terminal emulator family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    /// kitty.
    Kitty,
    /// iTerm2.
    ITerm2,
    /// WezTerm.
    WezTerm,
    /// Alacritty.
    Alacritty,
    /// Konsole.
    Konsole,
    /// GNOME Terminal / other VTE-based terminals.
    Vte,
    /// Windows Terminal.
    WindowsTerminal,
    /// ConEmu.
    ConEmu,
    /// Generic xterm-compatible terminal.
    Xterm,
    /// The Windows `cmd.exe` console (MSYS/legacy).
    Cmd,
    /// The Linux virtual console.
    LinuxConsole,
    /// Unrecognised terminal.
    Unknown,
}

/// A detected terminal multiplexer wrapping the real terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MultiplexerKind {
    /// No multiplexer detected.
    #[default]
    None,
    /// GNU `screen`.
    Screen,
    /// tmux.
    Tmux,
}

/// A record of terminal features, detected once at start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerminalCapabilities {
    /// Colour support level.
    pub color: ColorSupport,
    /// Unicode (wide-character) rendering is reliable.
    pub unicode: bool,
    /// The terminal accepts mouse tracking sequences.
    pub mouse: bool,
    /// The terminal accepts the SGR mouse extension (wider coordinate range).
    pub sgr_mouse: bool,
    /// The terminal accepts bracketed-paste mode.
    pub bracketed_paste: bool,
    /// The terminal supports the alternate screen buffer.
    pub alternate_screen: bool,
}

impl TerminalKind {
    /// Detect the terminal kind from the process environment, consulting
    /// vendor-specific variables first, then `TERM_PROGRAM`, then
    /// multiplexer variables, then the `TERM` prefix, then a platform
    /// default.
    pub fn detect(env: &dyn Fn(&str) -> Option<String>) -> Self {
        if env("KITTY_WINDOW_ID").is_some() {
            return Self::Kitty;
        }
        if env("ITERM_SESSION_ID").is_some() || env("ITERM_PROFILE").is_some() {
            return Self::ITerm2;
        }
        if env("WEZTERM_PANE").is_some() {
            return Self::WezTerm;
        }
        if env("ALACRITTY_LOG").is_some() || env("ALACRITTY_SOCKET").is_some() {
            return Self::Alacritty;
        }
        if env("KONSOLE_VERSION").is_some() {
            return Self::Konsole;
        }
        if env("VTE_VERSION").is_some() || env("GNOME_TERMINAL_SCREEN").is_some() {
            return Self::Vte;
        }
        if env("WT_SESSION").is_some() || env("WT_PROFILE_ID").is_some() {
            return Self::WindowsTerminal;
        }
        if env("ConEmuPID").is_some() || env("ConEmuANSI").is_some() {
            return Self::ConEmu;
        }

        if let Some(program) = env("TERM_PROGRAM") {
            match program.as_str() {
                "iTerm.app" => return Self::ITerm2,
                "WezTerm" => return Self::WezTerm,
                "Apple_Terminal" => return Self::Unknown,
                _ => {}
            }
        }

        if let Some(term) = env("TERM") {
            if term.starts_with("xterm") {
                return Self::Xterm;
            }
            if term == "linux" {
                return Self::LinuxConsole;
            }
        }

        if env("MSYSTEM").is_some() {
            return Self::Cmd;
        }

        Self::Unknown
    }
}

impl MultiplexerKind {
    /// Detect a wrapping multiplexer from `TMUX`/`STY`.
    pub fn detect(env: &dyn Fn(&str) -> Option<String>) -> Self {
        if env("TMUX").is_some() {
            Self::Tmux
        } else if env("STY").is_some() {
            Self::Screen
        } else {
            Self::None
        }
    }
}

/// The static capability profile for a [`TerminalKind`], before multiplexer
/// limits and colour-level refinement are applied.
pub fn profile_for(kind: TerminalKind) -> TerminalCapabilities {
    let modern = TerminalCapabilities {
        color: ColorSupport::TrueColor,
        unicode: true,
        mouse: true,
        sgr_mouse: true,
        bracketed_paste: true,
        alternate_screen: true,
    };

    match kind {
        TerminalKind::Kitty
        | TerminalKind::ITerm2
        | TerminalKind::WezTerm
        | TerminalKind::Alacritty
        | TerminalKind::WindowsTerminal => modern,
        TerminalKind::Konsole | TerminalKind::Vte => modern,
        TerminalKind::Xterm => TerminalCapabilities {
            color: ColorSupport::Extended256,
            unicode: true,
            mouse: true,
            sgr_mouse: true,
            bracketed_paste: true,
            alternate_screen: true,
        },
        TerminalKind::ConEmu => TerminalCapabilities {
            color: ColorSupport::Extended256,
            unicode: true,
            mouse: true,
            sgr_mouse: false,
            bracketed_paste: false,
            alternate_screen: true,
        },
        TerminalKind::LinuxConsole => TerminalCapabilities {
            color: ColorSupport::Basic16,
            unicode: false,
            mouse: false,
            sgr_mouse: false,
            bracketed_paste: false,
            alternate_screen: true,
        },
        TerminalKind::Cmd | TerminalKind::Unknown => TerminalCapabilities {
            color: ColorSupport::Basic16,
            unicode: false,
            mouse: false,
            sgr_mouse: false,
            bracketed_paste: false,
            alternate_screen: true,
        },
    }
}

/// Apply a wrapping multiplexer's known feature limits on top of an
/// otherwise-detected capability record.
pub fn merge_multiplexer_limits(
    mut caps: TerminalCapabilities,
    multiplexer: MultiplexerKind,
) -> TerminalCapabilities {
    match multiplexer {
        MultiplexerKind::None => caps,
        MultiplexerKind::Tmux => {
            // tmux passes most sequences through but mangles mouse/paste
            // coordination across panes; be conservative.
            caps.bracketed_paste = false;
            caps
        }
        MultiplexerKind::Screen => {
            caps.color = caps.color.min(ColorSupport::Extended256);
            caps.sgr_mouse = false;
            caps.bracketed_paste = false;
            caps
        }
    }
}

impl ColorSupport {
    fn rank(self) -> u8 {
        match self {
            Self::Basic16 => 0,
            Self::Extended256 => 1,
            Self::TrueColor => 2,
        }
    }

    fn min(self, other: Self) -> Self {
        if self.rank() <= other.rank() { self } else { other }
    }

    fn max(self, other: Self) -> Self {
        if self.rank() >= other.rank() { self } else { other }
    }
}

impl PartialOrd for ColorSupport {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.rank().cmp(&other.rank()))
    }
}

impl Ord for ColorSupport {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Derive the colour support level from `COLORTERM`/`TERM`, refining
/// whatever the static profile already assumed.
fn colorterm_support(env: &dyn Fn(&str) -> Option<String>, baseline: ColorSupport) -> ColorSupport {
    if let Some(colorterm) = env("COLORTERM") {
        let lower = colorterm.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }
    if let Some(term) = env("TERM") {
        let lower = term.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") || lower.contains("direct") {
            return ColorSupport::TrueColor;
        }
        if lower.contains("256color") {
            return baseline.min(ColorSupport::Extended256).max(ColorSupport::Extended256);
        }
    }
    baseline
}

/// Detect the full capability record for the current process environment.
///
/// `env` is injected (rather than reading `std::env::var` directly) so tests
/// can supply a fixed map without mutating real process state.
pub fn detect_capabilities(env: &dyn Fn(&str) -> Option<String>) -> TerminalCapabilities {
    let kind = TerminalKind::detect(env);
    let multiplexer = MultiplexerKind::detect(env);
    let mut caps = profile_for(kind);
    caps.color = colorterm_support(env, caps.color);
    let caps = merge_multiplexer_limits(caps, multiplexer);
    debug!(
        ?kind,
        ?multiplexer,
        color = ?caps.color,
        mouse = caps.mouse,
        bracketed_paste = caps.bracketed_paste,
        "detected terminal capabilities"
    );
    caps
}

/// Build an environment lookup closure over a fixed map, for tests.
pub fn env_from_map(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
    move |key| map.get(key).map(|v| (*v).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
        env_from_map(map)
    }

    #[test]
    fn detects_kitty_from_vendor_variable() {
        let env = env_map(&[("KITTY_WINDOW_ID", "1")]);
        assert_eq!(TerminalKind::detect(&env), TerminalKind::Kitty);
    }

    #[test]
    fn detects_xterm_from_term_prefix() {
        let env = env_map(&[("TERM", "xterm-256color")]);
        assert_eq!(TerminalKind::detect(&env), TerminalKind::Xterm);
    }

    #[test]
    fn falls_back_to_unknown() {
        let env = env_map(&[]);
        assert_eq!(TerminalKind::detect(&env), TerminalKind::Unknown);
    }

    #[test]
    fn detects_tmux_multiplexer() {
        let env = env_map(&[("TMUX", "/tmp/tmux-0/default,1234,0")]);
        assert_eq!(MultiplexerKind::detect(&env), MultiplexerKind::Tmux);
    }

    #[test]
    fn profile_for_kitty_is_modern() {
        let caps = profile_for(TerminalKind::Kitty);
        assert_eq!(caps.color, ColorSupport::TrueColor);
        assert!(caps.mouse);
        assert!(caps.bracketed_paste);
    }

    #[test]
    fn profile_for_unknown_is_conservative() {
        let caps = profile_for(TerminalKind::Unknown);
        assert_eq!(caps.color, ColorSupport::Basic16);
        assert!(!caps.mouse);
    }

    #[test]
    fn tmux_disables_bracketed_paste() {
        let caps = profile_for(TerminalKind::Kitty);
        let merged = merge_multiplexer_limits(caps, MultiplexerKind::Tmux);
        assert!(!merged.bracketed_paste);
        assert_eq!(merged.color, ColorSupport::TrueColor);
    }

    #[test]
    fn screen_downgrades_color_and_disables_sgr_mouse() {
        let caps = profile_for(TerminalKind::Kitty);
        let merged = merge_multiplexer_limits(caps, MultiplexerKind::Screen);
        assert_eq!(merged.color, ColorSupport::Extended256);
        assert!(!merged.sgr_mouse);
    }

    #[test]
    fn colorterm_truecolor_upgrades_basic_profile() {
        let env = env_map(&[("TERM", "xterm"), ("COLORTERM", "truecolor")]);
        let caps = detect_capabilities(&env);
        assert_eq!(caps.color, ColorSupport::TrueColor);
    }

    #[test]
    fn term_256color_upgrades_to_extended() {
        let env = env_map(&[("TERM", "screen-256color")]);
        let caps = detect_capabilities(&env);
        assert_eq!(caps.color, ColorSupport::Extended256);
    }

    #[test]
    fn color_support_ordering() {
        assert!(ColorSupport::Basic16 < ColorSupport::Extended256);
        assert!(ColorSupport::Extended256 < ColorSupport::TrueColor);
    }
}
