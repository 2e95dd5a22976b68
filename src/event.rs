//! Structured input events produced by the terminal input parser.

/// A keyboard key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Shift+Tab.
    Backtab,
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Insert.
    Insert,
    /// Delete.
    Delete,
    /// Function key `F1`-`F12`.
    Function(u8),
}

/// Modifier keys held during a key or mouse event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Ctrl held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Returns true if no modifier is held.
    pub const fn is_none(self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

/// A key press event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key pressed.
    pub code: KeyCode,
    /// Modifiers held while it was pressed.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// A key event with the given modifiers.
    pub const fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// The kind of mouse action reported by a [`MouseEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed down.
    Down,
    /// Button released.
    Up,
    /// Mouse moved while a button was held.
    Drag,
    /// Mouse moved with no button held.
    Move,
    /// Wheel scrolled up.
    ScrollUp,
    /// Wheel scrolled down.
    ScrollDown,
}

/// A mouse event at a 0-based cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// What happened.
    pub kind: MouseEventKind,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
}

/// A terminal resize notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    /// New width in columns.
    pub width: u16,
    /// New height in rows.
    pub height: u16,
}

/// A single structured input event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse action occurred.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(ResizeEvent),
    /// A periodic tick fired (application-driven, not produced by the parser).
    Tick,
    /// The result of a previously dispatched command completed.
    CommandResult(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_none());
        assert!(!Modifiers { ctrl: true, ..Modifiers::NONE }.is_none());
    }

    #[test]
    fn key_event_constructors() {
        let k = KeyEvent::new(KeyCode::Char('a'));
        assert_eq!(k.code, KeyCode::Char('a'));
        assert!(k.modifiers.is_none());
    }

    #[test]
    fn event_equality_is_structural() {
        let a = Event::Key(KeyEvent::new(KeyCode::Enter));
        let b = Event::Key(KeyEvent::new(KeyCode::Enter));
        assert_eq!(a, b);
    }
}
