//! Byte-level terminal input parser.
//!
//! A stateful decoder: feed it bytes as they arrive from the terminal, get
//! back at most one [`Event`] per call. Incomplete sequences are retained
//! internally until more bytes (or a timeout decision, see
//! [`Parser::decide_pending_escape`]) resolve them.

use tracing::trace;

use crate::event::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent, MouseEventKind, ResizeEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Ground,
    PasteActive,
}

/// The byte-level input decoder. Owns an internal buffer of not-yet-decoded
/// bytes; single-threaded, single-owner.
#[derive(Debug)]
pub struct Parser {
    buf: Vec<u8>,
    state: State,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

const PASTE_END: &[u8] = b"\x1b[201~";

impl Parser {
    /// Create a new parser in the ground state with an empty buffer.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: State::Ground,
        }
    }

    /// Feed more bytes in and attempt to decode a single event.
    ///
    /// Returns `None` if no complete event is available yet; the bytes are
    /// retained and more data (or another call with an empty slice, to drain
    /// a buffer that already holds a complete event) may complete it.
    pub fn parse(&mut self, bytes: &[u8]) -> Option<Event> {
        self.buf.extend_from_slice(bytes);
        self.decode_one()
    }

    /// Force a decision on a lone pending `ESC` byte after the backend's
    /// read timeout has elapsed with no follow-up byte. Returns the `Esc`
    /// key event and clears the buffer if (and only if) exactly one `0x1B`
    /// byte is pending; otherwise a no-op.
    pub fn decide_pending_escape(&mut self) -> Option<Event> {
        if self.buf == [0x1B] {
            self.buf.clear();
            return Some(Event::Key(KeyEvent::new(KeyCode::Escape)));
        }
        None
    }

    /// Attempt to decode a single event, looping internally over any number
    /// of state-only transitions (entering/leaving paste mode, skipping a
    /// malformed byte) that consume bytes without themselves producing an
    /// event — the caller should still only ever see one `Event` back.
    fn decode_one(&mut self) -> Option<Event> {
        loop {
            let len_before = self.buf.len();
            let state_before = self.state;

            let result = self.decode_step();
            if result.is_some() {
                return result;
            }
            if self.buf.len() == len_before && self.state == state_before {
                return None;
            }
        }
    }

    fn decode_step(&mut self) -> Option<Event> {
        if self.state == State::PasteActive {
            return self.decode_paste();
        }
        if self.buf.is_empty() {
            return None;
        }

        match self.buf[0] {
            0x1B => self.decode_escape(),
            0x09 => self.consume_and_emit(1, KeyEvent::new(KeyCode::Tab)),
            0x0A | 0x0D => self.consume_and_emit(1, KeyEvent::new(KeyCode::Enter)),
            0x7F => self.consume_and_emit(1, KeyEvent::new(KeyCode::Backspace)),
            0x00 => self.consume_and_emit(
                1,
                KeyEvent::with_modifiers(KeyCode::Char(' '), Modifiers { ctrl: true, ..Modifiers::NONE }),
            ),
            b @ (0x01..=0x08 | 0x0B | 0x0C | 0x0E..=0x1A) => {
                let ch = (b'a' + (b - 1)) as char;
                self.consume_and_emit(
                    1,
                    KeyEvent::with_modifiers(KeyCode::Char(ch), Modifiers { ctrl: true, ..Modifiers::NONE }),
                )
            }
            b @ 0x20..=0x7E => {
                self.consume_and_emit(1, KeyEvent::new(KeyCode::Char(b as char)))
            }
            b if (0x80..=0xF4).contains(&b) => self.decode_utf8(),
            b => {
                // Unrecognized/stray byte: drop it and keep going.
                trace!(byte = format_args!("{b:#04x}"), "dropping unrecognized input byte");
                self.buf.remove(0);
                None
            }
        }
    }

    fn consume_and_emit(&mut self, n: usize, key: KeyEvent) -> Option<Event> {
        self.buf.drain(0..n);
        Some(Event::Key(key))
    }

    fn decode_utf8(&mut self) -> Option<Event> {
        let first = self.buf[0];
        let len = utf8_sequence_len(first);
        if self.buf.len() < len {
            return None; // incomplete, wait for more bytes
        }
        let bytes: Vec<u8> = self.buf[0..len].to_vec();
        match core::str::from_utf8(&bytes) {
            Ok(s) => {
                let ch = s.chars().next();
                self.buf.drain(0..len);
                ch.map(|c| Event::Key(KeyEvent::new(KeyCode::Char(c))))
            }
            Err(_) => {
                trace!(len, "dropping malformed utf-8 sequence");
                self.buf.drain(0..len);
                None
            }
        }
    }

    fn decode_escape(&mut self) -> Option<Event> {
        if self.buf.len() < 2 {
            return None; // wait for a follow-up byte or a timeout decision
        }
        match self.buf[1] {
            b'[' => self.decode_csi(),
            b'O' => self.decode_ss3(),
            0x1B => self.consume_and_emit(
                2,
                KeyEvent::with_modifiers(KeyCode::Escape, Modifiers { alt: true, ..Modifiers::NONE }),
            ),
            0x7F => self.consume_and_emit(
                2,
                KeyEvent::with_modifiers(KeyCode::Backspace, Modifiers { alt: true, ..Modifiers::NONE }),
            ),
            b @ 0x20..=0x7E => self.consume_and_emit(
                2,
                KeyEvent::with_modifiers(KeyCode::Char(b as char), Modifiers { alt: true, ..Modifiers::NONE }),
            ),
            _ => {
                self.buf.drain(0..1);
                Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
            }
        }
    }

    fn decode_ss3(&mut self) -> Option<Event> {
        if self.buf.len() < 3 {
            return None;
        }
        let code = match self.buf[2] {
            b'P' => Some(KeyCode::Function(1)),
            b'Q' => Some(KeyCode::Function(2)),
            b'R' => Some(KeyCode::Function(3)),
            b'S' => Some(KeyCode::Function(4)),
            _ => None,
        };
        self.buf.drain(0..3);
        code.map(|c| Event::Key(KeyEvent::new(c)))
    }

    fn decode_csi(&mut self) -> Option<Event> {
        if self.buf.len() < 3 {
            return None;
        }
        match self.buf[2] {
            b'<' => self.decode_sgr_mouse(),
            b'M' => self.decode_x10_mouse(),
            _ => self.decode_csi_generic(),
        }
    }

    fn decode_csi_generic(&mut self) -> Option<Event> {
        // Scan for the final byte (first byte past position 2 that's not a
        // digit or ';').
        let mut i = 2;
        while i < self.buf.len() && (self.buf[i].is_ascii_digit() || self.buf[i] == b';') {
            i += 1;
        }
        if i >= self.buf.len() {
            return None; // incomplete: no final byte yet
        }
        let final_byte = self.buf[i];
        let params_str = core::str::from_utf8(&self.buf[2..i]).unwrap_or("");
        let mut parts = params_str.split(';');
        let p1: u32 = parts.next().unwrap_or("").parse().unwrap_or(0);
        let p2: u32 = parts.next().unwrap_or("").parse().unwrap_or(0);
        let total_len = i + 1;

        let modifiers = decode_modifiers(p2);

        let code = match final_byte {
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            b'Z' => Some(KeyCode::Backtab),
            b'P' => Some(KeyCode::Function(1)),
            b'Q' => Some(KeyCode::Function(2)),
            b'R' => Some(KeyCode::Function(3)),
            b'S' => Some(KeyCode::Function(4)),
            b'~' => tilde_code(p1),
            _ => None,
        };

        if final_byte == b'~' && p1 == 200 {
            self.buf.drain(0..total_len);
            self.state = State::PasteActive;
            return None;
        }
        if final_byte == b'~' && p1 == 201 {
            self.buf.drain(0..total_len);
            return None;
        }

        self.buf.drain(0..total_len);
        if code.is_none() {
            trace!(final_byte = format_args!("{final_byte:#04x}"), "dropping unrecognized CSI sequence");
        }
        code.map(|c| Event::Key(KeyEvent::with_modifiers(c, modifiers)))
    }

    fn decode_sgr_mouse(&mut self) -> Option<Event> {
        // "ESC [ < cb ; cx ; cy" terminated by 'M' (press/move/drag) or 'm' (release).
        let mut i = 3;
        while i < self.buf.len() && self.buf[i] != b'M' && self.buf[i] != b'm' {
            i += 1;
        }
        if i >= self.buf.len() {
            return None;
        }
        let is_release = self.buf[i] == b'm';
        let params_str = core::str::from_utf8(&self.buf[3..i]).unwrap_or("");
        let mut parts = params_str.split(';');
        let cb: u32 = parts.next().unwrap_or("").parse().unwrap_or(0);
        let cx: u32 = parts.next().unwrap_or("").parse().unwrap_or(1);
        let cy: u32 = parts.next().unwrap_or("").parse().unwrap_or(1);
        let total_len = i + 1;
        self.buf.drain(0..total_len);

        let kind = mouse_kind(cb, is_release);
        let modifiers = Modifiers {
            shift: cb & 0b0000_0100 != 0,
            alt: cb & 0b0000_1000 != 0,
            ctrl: cb & 0b0001_0000 != 0,
        };
        Some(Event::Mouse(MouseEvent {
            x: (cx.saturating_sub(1)) as u16,
            y: (cy.saturating_sub(1)) as u16,
            kind,
            modifiers,
        }))
    }

    fn decode_x10_mouse(&mut self) -> Option<Event> {
        // "ESC [ M cb cx cy" -- exactly three raw bytes, each offset by 32.
        if self.buf.len() < 6 {
            return None;
        }
        let cb = u32::from(self.buf[3].saturating_sub(32));
        let cx = u32::from(self.buf[4].saturating_sub(32));
        let cy = u32::from(self.buf[5].saturating_sub(32));
        self.buf.drain(0..6);

        // X10 has no distinct release byte: button code 3 with no motion
        // bit set is the protocol's release indication.
        let is_release = cb & 0b0000_0011 == 3;
        let kind = mouse_kind(cb, is_release);
        let modifiers = Modifiers {
            shift: cb & 0b0000_0100 != 0,
            alt: cb & 0b0000_1000 != 0,
            ctrl: cb & 0b0001_0000 != 0,
        };
        Some(Event::Mouse(MouseEvent {
            x: cx.saturating_sub(1) as u16,
            y: cy.saturating_sub(1) as u16,
            kind,
            modifiers,
        }))
    }

    fn decode_paste(&mut self) -> Option<Event> {
        if let Some(pos) = find_subsequence(&self.buf, PASTE_END) {
            self.buf.drain(0..pos + PASTE_END.len());
            self.state = State::Ground;
            return None;
        }
        // No terminator yet: the accumulated bytes are pasted content we
        // discard, but keep a tail long enough to catch a terminator split
        // across calls.
        let keep_from = self.buf.len().saturating_sub(PASTE_END.len() - 1);
        self.buf.drain(0..keep_from);
        None
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn utf8_sequence_len(first_byte: u8) -> usize {
    match first_byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

fn decode_modifiers(p2: u32) -> Modifiers {
    if p2 == 0 || p2 == 1 {
        return Modifiers::NONE;
    }
    let m = p2 - 1;
    Modifiers {
        shift: m & 0b001 != 0,
        alt: m & 0b010 != 0,
        ctrl: m & 0b100 != 0,
    }
}

fn tilde_code(p1: u32) -> Option<KeyCode> {
    match p1 {
        1 | 7 => Some(KeyCode::Home),
        2 => Some(KeyCode::Insert),
        3 => Some(KeyCode::Delete),
        4 | 8 => Some(KeyCode::End),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        11..=15 => Some(KeyCode::Function((p1 - 10) as u8)),
        17..=21 => Some(KeyCode::Function((p1 - 11) as u8)),
        23..=24 => Some(KeyCode::Function((p1 - 12) as u8)),
        _ => None,
    }
}

fn mouse_kind(cb: u32, is_release: bool) -> MouseEventKind {
    let is_wheel = cb & 0b0100_0000 != 0;
    let is_motion = cb & 0b0010_0000 != 0;
    let button = cb & 0b0000_0011;

    if is_wheel {
        return if button == 0 {
            MouseEventKind::ScrollUp
        } else {
            MouseEventKind::ScrollDown
        };
    }
    if is_motion {
        return if button == 3 {
            MouseEventKind::Move
        } else {
            MouseEventKind::Drag
        };
    }
    if is_release {
        MouseEventKind::Up
    } else {
        MouseEventKind::Down
    }
}

/// Construct a resize event — not produced by the byte parser (resizes
/// arrive out-of-band via `SIGWINCH`/platform notification), but routed
/// through the same [`Event`] type for the application loop.
pub const fn resize_event(width: u16, height: u16) -> Event {
    Event::Resize(ResizeEvent { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_none_without_state_change() {
        let mut p = Parser::new();
        assert_eq!(p.parse(&[]), None);
    }

    #[test]
    fn ascii_char_key() {
        let mut p = Parser::new();
        assert_eq!(
            p.parse(b"a"),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('a'))))
        );
    }

    #[test]
    fn tab_key() {
        let mut p = Parser::new();
        assert_eq!(p.parse(&[0x09]), Some(Event::Key(KeyEvent::new(KeyCode::Tab))));
    }

    #[test]
    fn enter_key_from_lf_and_cr() {
        let mut p = Parser::new();
        assert_eq!(p.parse(&[0x0A]), Some(Event::Key(KeyEvent::new(KeyCode::Enter))));
        let mut p2 = Parser::new();
        assert_eq!(p2.parse(&[0x0D]), Some(Event::Key(KeyEvent::new(KeyCode::Enter))));
    }

    #[test]
    fn backspace_key() {
        let mut p = Parser::new();
        assert_eq!(
            p.parse(&[0x7F]),
            Some(Event::Key(KeyEvent::new(KeyCode::Backspace)))
        );
    }

    #[test]
    fn ctrl_letter_decoding() {
        let mut p = Parser::new();
        let ev = p.parse(&[0x01]);
        assert_eq!(
            ev,
            Some(Event::Key(KeyEvent::with_modifiers(
                KeyCode::Char('a'),
                Modifiers { ctrl: true, ..Modifiers::NONE }
            )))
        );
    }

    #[test]
    fn ctrl_space() {
        let mut p = Parser::new();
        let ev = p.parse(&[0x00]);
        assert_eq!(
            ev,
            Some(Event::Key(KeyEvent::with_modifiers(
                KeyCode::Char(' '),
                Modifiers { ctrl: true, ..Modifiers::NONE }
            )))
        );
    }

    #[test]
    fn lone_esc_is_pending_until_timeout() {
        let mut p = Parser::new();
        assert_eq!(p.parse(&[0x1B]), None);
        assert_eq!(
            p.decide_pending_escape(),
            Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
        );
    }

    #[test]
    fn alt_char() {
        let mut p = Parser::new();
        let ev = p.parse(b"\x1ba");
        assert_eq!(
            ev,
            Some(Event::Key(KeyEvent::with_modifiers(
                KeyCode::Char('a'),
                Modifiers { alt: true, ..Modifiers::NONE }
            )))
        );
    }

    #[test]
    fn csi_arrow_keys() {
        let mut p = Parser::new();
        assert_eq!(p.parse(b"\x1b[A"), Some(Event::Key(KeyEvent::new(KeyCode::Up))));
        let mut p2 = Parser::new();
        assert_eq!(p2.parse(b"\x1b[D"), Some(Event::Key(KeyEvent::new(KeyCode::Left))));
    }

    #[test]
    fn csi_arrow_key_with_modifier() {
        let mut p = Parser::new();
        // p2 = 6 -> m = 5 = 0b101 -> shift + ctrl
        let ev = p.parse(b"\x1b[1;6A");
        assert_eq!(
            ev,
            Some(Event::Key(KeyEvent::with_modifiers(
                KeyCode::Up,
                Modifiers { shift: true, alt: false, ctrl: true }
            )))
        );
    }

    #[test]
    fn csi_tilde_delete() {
        let mut p = Parser::new();
        assert_eq!(
            p.parse(b"\x1b[3~"),
            Some(Event::Key(KeyEvent::new(KeyCode::Delete)))
        );
    }

    #[test]
    fn csi_tilde_function_keys() {
        let mut p = Parser::new();
        assert_eq!(
            p.parse(b"\x1b[15~"),
            Some(Event::Key(KeyEvent::new(KeyCode::Function(5))))
        );
        let mut p2 = Parser::new();
        assert_eq!(
            p2.parse(b"\x1b[24~"),
            Some(Event::Key(KeyEvent::new(KeyCode::Function(12))))
        );
    }

    #[test]
    fn ss3_function_keys() {
        let mut p = Parser::new();
        assert_eq!(
            p.parse(b"\x1bOP"),
            Some(Event::Key(KeyEvent::new(KeyCode::Function(1))))
        );
    }

    #[test]
    fn utf8_multibyte_char() {
        let mut p = Parser::new();
        let bytes = "é".as_bytes();
        assert_eq!(
            p.parse(bytes),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('é'))))
        );
    }

    #[test]
    fn utf8_incomplete_sequence_waits_for_more_bytes() {
        let mut p = Parser::new();
        let bytes = "é".as_bytes();
        assert_eq!(p.parse(&bytes[0..1]), None);
        assert_eq!(
            p.parse(&bytes[1..]),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('é'))))
        );
    }

    /// S4 — SGR mouse press: `ESC [ < 0 ; 10 ; 20 M` yields one mouse down
    /// event at (9, 19) with no modifiers.
    #[test]
    fn sgr_mouse_press() {
        let mut p = Parser::new();
        let ev = p.parse(b"\x1b[<0;10;20M");
        assert_eq!(
            ev,
            Some(Event::Mouse(MouseEvent {
                x: 9,
                y: 19,
                kind: MouseEventKind::Down,
                modifiers: Modifiers::NONE,
            }))
        );
    }

    #[test]
    fn sgr_mouse_release() {
        let mut p = Parser::new();
        let ev = p.parse(b"\x1b[<0;1;1m");
        assert_eq!(
            ev,
            Some(Event::Mouse(MouseEvent {
                x: 0,
                y: 0,
                kind: MouseEventKind::Up,
                modifiers: Modifiers::NONE,
            }))
        );
    }

    #[test]
    fn sgr_mouse_wheel() {
        let mut p = Parser::new();
        let cb = 0b0100_0000; // wheel, button 0 -> scroll up
        let seq = format!("\x1b[<{cb};5;5M");
        assert_eq!(
            p.parse(seq.as_bytes()),
            Some(Event::Mouse(MouseEvent {
                x: 4,
                y: 4,
                kind: MouseEventKind::ScrollUp,
                modifiers: Modifiers::NONE,
            }))
        );
    }

    #[test]
    fn x10_mouse_press() {
        let mut p = Parser::new();
        // button 0, x=10 (wire 10+32), y=20 (wire 20+32)
        let seq = [0x1B, b'[', b'M', 32, 42, 52];
        let ev = p.parse(&seq);
        assert_eq!(
            ev,
            Some(Event::Mouse(MouseEvent {
                x: 9,
                y: 19,
                kind: MouseEventKind::Down,
                modifiers: Modifiers::NONE,
            }))
        );
    }

    #[test]
    fn x10_mouse_release() {
        let mut p = Parser::new();
        // button 3 (release indication), x=10 (wire 10+32), y=20 (wire 20+32)
        let seq = [0x1B, b'[', b'M', 32 + 3, 42, 52];
        let ev = p.parse(&seq);
        assert_eq!(
            ev,
            Some(Event::Mouse(MouseEvent {
                x: 9,
                y: 19,
                kind: MouseEventKind::Up,
                modifiers: Modifiers::NONE,
            }))
        );
    }

    /// S5 — Bracketed paste passthrough: content between the start and end
    /// markers is discarded, yielding exactly one key event for `z`.
    #[test]
    fn bracketed_paste_passthrough() {
        let mut p = Parser::new();
        let ev = p.parse(b"\x1b[200~ABC\x1b[201~z");
        assert_eq!(ev, Some(Event::Key(KeyEvent::new(KeyCode::Char('z')))));
    }

    #[test]
    fn incomplete_csi_waits_for_final_byte() {
        let mut p = Parser::new();
        assert_eq!(p.parse(b"\x1b[1;6"), None);
        assert_eq!(
            p.parse(b"A"),
            Some(Event::Key(KeyEvent::with_modifiers(
                KeyCode::Up,
                Modifiers { shift: true, alt: false, ctrl: true }
            )))
        );
    }
}
