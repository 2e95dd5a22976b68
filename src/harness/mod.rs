//! Headless test harness: a deterministic update/view driver plus
//! assertions over the resulting cell buffer, with no terminal I/O.

pub mod golden;
pub mod scenario;

use std::path::Path;

use crate::buffer::Buffer;
use crate::cell::char_display_width;
use crate::error::Result;
use crate::event::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent, MouseEventKind, ResizeEvent};
use crate::frame::Frame;
use crate::geometry::Rect;

/// The result of an application's `update` function for one event cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing of note happened.
    None,
    /// The application requests to quit.
    Quit,
    /// An application-defined action, identified by name.
    Custom(String),
}

impl Action {
    fn token(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Quit => "quit".to_string(),
            Self::Custom(name) => name.clone(),
        }
    }
}

/// Dimensions of the harness's two buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Buffer width in columns.
    pub width: u16,
    /// Buffer height in rows.
    pub height: u16,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// One assertion failure: where it happened, what was expected, what the
/// buffer actually held. Assertions record these and continue, they never
/// panic or abort a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureRecord {
    /// Source line in the scenario file, if the failure came from one.
    pub line: Option<usize>,
    /// Human-readable label for the assertion that failed.
    pub label: String,
    /// What was expected.
    pub expected: String,
    /// What was actually found.
    pub actual: String,
}

type UpdateFn<S> = fn(&mut S, Event) -> Action;
type ViewFn<S> = fn(&S, &mut Frame);

/// A deterministic `update`/`view` driver over two cell buffers.
#[derive(Debug)]
pub struct Harness<S> {
    state: S,
    update: UpdateFn<S>,
    view: ViewFn<S>,
    current: Buffer,
    previous: Buffer,
    last_action: Action,
    frame_count: u64,
    failures: Vec<FailureRecord>,
    current_line: Option<usize>,
}

impl<S> Harness<S> {
    /// Start a harness at the default 80x24 size.
    pub fn new(state: S, update: UpdateFn<S>, view: ViewFn<S>) -> Self {
        Self::with_config(state, update, view, HarnessConfig::default())
    }

    /// Start a harness with a specific buffer size.
    pub fn with_config(state: S, update: UpdateFn<S>, view: ViewFn<S>, config: HarnessConfig) -> Self {
        let area = Rect::new(0, 0, config.width, config.height);
        let mut current = Buffer::empty(area);
        let previous = Buffer::empty(area);

        {
            let mut frame = Frame::new(&mut current);
            view(&state, &mut frame);
        }

        Self {
            state,
            update,
            view,
            current,
            previous,
            last_action: Action::None,
            frame_count: 0,
            failures: Vec::new(),
            current_line: None,
        }
    }

    /// The application state being driven.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// The buffer produced by the most recent cycle.
    pub const fn buffer(&self) -> &Buffer {
        &self.current
    }

    /// The buffer from before the most recent cycle.
    pub const fn previous_buffer(&self) -> &Buffer {
        &self.previous
    }

    /// The action returned by the most recent `update` call.
    pub const fn last_action(&self) -> &Action {
        &self.last_action
    }

    /// Number of event cycles run so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Assertion failures recorded so far.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Attach a scenario source-line number to failures recorded until the
    /// next call. Used by the scenario interpreter; harmless to ignore when
    /// driving a harness directly.
    pub fn set_current_line(&mut self, line: Option<usize>) {
        self.current_line = line;
    }

    fn record_failure(&mut self, label: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) {
        self.failures.push(FailureRecord {
            line: self.current_line,
            label: label.into(),
            expected: expected.into(),
            actual: actual.into(),
        });
    }

    /// Run one full event cycle: `update`, clear, `view`, copy current over
    /// previous. Frame count increments by one.
    pub fn dispatch(&mut self, event: Event) {
        self.last_action = (self.update)(&mut self.state, event);
        self.current.clear();
        {
            let mut frame = Frame::new(&mut self.current);
            (self.view)(&self.state, &mut frame);
        }
        self.previous = self.current.clone();
        self.frame_count += 1;
    }

    // --- event injection primitives -------------------------------------

    /// Press a key with no modifiers.
    pub fn key(&mut self, code: KeyCode) {
        self.dispatch(Event::Key(KeyEvent::new(code)));
    }

    /// Press a key with the given modifiers.
    pub fn key_with_modifiers(&mut self, code: KeyCode, modifiers: Modifiers) {
        self.dispatch(Event::Key(KeyEvent::with_modifiers(code, modifiers)));
    }

    /// Type literal text, one key press per codepoint.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(KeyCode::Char(ch));
        }
    }

    /// A click: mouse down followed by mouse up at the same coordinate.
    pub fn click(&mut self, x: u16, y: u16) {
        self.mouse_down(x, y);
        self.mouse_up(x, y);
    }

    /// A right-click: down/up pair with ctrl held, at the same coordinate.
    pub fn right_click(&mut self, x: u16, y: u16) {
        let modifiers = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        self.mouse_event(x, y, MouseEventKind::Down, modifiers);
        self.mouse_event(x, y, MouseEventKind::Up, modifiers);
    }

    /// Mouse button pressed down.
    pub fn mouse_down(&mut self, x: u16, y: u16) {
        self.mouse_event(x, y, MouseEventKind::Down, Modifiers::NONE);
    }

    /// Mouse button released.
    pub fn mouse_up(&mut self, x: u16, y: u16) {
        self.mouse_event(x, y, MouseEventKind::Up, Modifiers::NONE);
    }

    /// Drag: down at `(x1, y1)`, move to `(x2, y2)`, up at `(x2, y2)`.
    pub fn drag(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) {
        self.mouse_down(x1, y1);
        self.mouse_event(x2, y2, MouseEventKind::Drag, Modifiers::NONE);
        self.mouse_up(x2, y2);
    }

    /// Mouse moved with no button held.
    pub fn hover(&mut self, x: u16, y: u16) {
        self.mouse_event(x, y, MouseEventKind::Move, Modifiers::NONE);
    }

    /// Wheel scrolled up at `(x, y)`.
    pub fn scroll_up(&mut self, x: u16, y: u16) {
        self.mouse_event(x, y, MouseEventKind::ScrollUp, Modifiers::NONE);
    }

    /// Wheel scrolled down at `(x, y)`.
    pub fn scroll_down(&mut self, x: u16, y: u16) {
        self.mouse_event(x, y, MouseEventKind::ScrollDown, Modifiers::NONE);
    }

    fn mouse_event(&mut self, x: u16, y: u16, kind: MouseEventKind, modifiers: Modifiers) {
        self.dispatch(Event::Mouse(MouseEvent {
            x,
            y,
            kind,
            modifiers,
        }));
    }

    /// One tick.
    pub fn tick(&mut self) {
        self.dispatch(Event::Tick);
    }

    /// `n` ticks in a row.
    pub fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Reallocate both buffers to `(width, height)`, then deliver a resize
    /// event.
    pub fn resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.current = Buffer::empty(area);
        self.previous = Buffer::empty(area);
        self.dispatch(Event::Resize(ResizeEvent { width, height }));
    }

    /// Inject an already-constructed event directly.
    pub fn raw_inject(&mut self, event: Event) {
        self.dispatch(event);
    }

    // --- assertions -------------------------------------------------------

    /// Assert the codepoint at `(x, y)` matches `expected`.
    pub fn expect_cell(&mut self, x: u16, y: u16, expected: char) -> bool {
        let actual = self.current.get(x, y).ch;
        if actual == expected {
            true
        } else {
            self.record_failure(
                format!("expect_cell({x}, {y})"),
                expected.to_string(),
                actual.to_string(),
            );
            false
        }
    }

    /// Assert the string starting at `(x, y)` matches `expected`, advancing
    /// by display width per codepoint.
    pub fn expect_string(&mut self, x: u16, y: u16, expected: &str) -> bool {
        let mut cursor = x;
        let mut actual = String::new();
        let mut ok = true;
        for ch in expected.chars() {
            let cell = self.current.get(cursor, y);
            actual.push(cell.ch);
            if cell.ch != ch {
                ok = false;
            }
            cursor = cursor.saturating_add(char_display_width(ch).max(1) as u16);
        }
        if !ok {
            self.record_failure(format!("expect_string({x}, {y})"), expected.to_string(), actual);
        }
        ok
    }

    /// Assert the cell at `(x, y)` has the named attribute set.
    pub fn expect_style(&mut self, x: u16, y: u16, attribute: &str) -> bool {
        let attrs = self.current.get(x, y).style.attributes;
        let actual = match attribute {
            "bold" => attrs.bold,
            "italic" => attrs.italic,
            "underline" => attrs.underline,
            "dim" => attrs.dim,
            "blink" => attrs.blink,
            "reverse" => attrs.reverse,
            "strikethrough" => attrs.strikethrough,
            "overline" => attrs.overline,
            _ => false,
        };
        if actual {
            true
        } else {
            self.record_failure(
                format!("expect_style({x}, {y})"),
                attribute.to_string(),
                "not set".to_string(),
            );
            false
        }
    }

    /// Assert the cell at `(x, y)` is the default blank cell.
    pub fn expect_empty(&mut self, x: u16, y: u16) -> bool {
        let cell = self.current.get(x, y);
        if cell.is_blank() {
            true
        } else {
            self.record_failure(
                format!("expect_empty({x}, {y})"),
                "blank cell".to_string(),
                format!("{:?} style={:?}", cell.ch, cell.style),
            );
            false
        }
    }

    /// Assert the last action matches `expected` ("none", "quit", or a
    /// custom action name).
    pub fn expect_action(&mut self, expected: &str) -> bool {
        let actual = self.last_action.token();
        if actual == expected {
            true
        } else {
            self.record_failure("expect_action", expected.to_string(), actual);
            false
        }
    }

    /// Shortcut for `expect_action("quit")`.
    pub fn expect_quit(&mut self) -> bool {
        self.expect_action("quit")
    }

    /// Compare the current buffer to the golden file `tests/golden/<name>.golden`.
    pub fn expect_snapshot(&mut self, name: &str) -> Result<bool> {
        let path = Path::new("tests/golden").join(format!("{name}.golden"));
        match golden::compare_or_update(&self.current, &path)? {
            None => Ok(true),
            Some(diff) => {
                self.record_failure(format!("snapshot({name})"), "match".to_string(), diff);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    struct Counter {
        value: i32,
    }

    fn update(state: &mut Counter, event: Event) -> Action {
        match event {
            Event::Key(KeyEvent { code: KeyCode::Char('+'), .. }) => {
                state.value += 1;
                Action::None
            }
            Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) => Action::Quit,
            _ => Action::None,
        }
    }

    fn view(state: &Counter, frame: &mut Frame) {
        let area = frame.size();
        frame.render(
            &crate::widget::StaticWidget::new(move |area, buffer: &mut Buffer| {
                buffer.set_string(area.x(), area.y(), &state.value.to_string(), Style::new());
            }),
            area,
        );
    }

    #[test]
    fn initial_view_runs_before_any_event() {
        let harness = Harness::new(Counter { value: 0 }, update, view);
        assert_eq!(harness.buffer().get(0, 0).ch, '0');
        assert_eq!(harness.frame_count(), 0);
    }

    #[test]
    fn key_press_triggers_one_cycle() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        harness.key(KeyCode::Char('+'));
        assert_eq!(harness.frame_count(), 1);
        assert!(harness.expect_cell(0, 0, '1'));
    }

    #[test]
    fn quit_action_is_asserted() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        harness.key(KeyCode::Char('q'));
        assert!(harness.expect_quit());
    }

    #[test]
    fn failed_assertion_records_but_does_not_panic() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        assert!(!harness.expect_cell(0, 0, 'x'));
        assert_eq!(harness.failures().len(), 1);
        assert_eq!(harness.failures()[0].expected, "x");
    }

    #[test]
    fn resize_reallocates_and_redraws() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        harness.resize(10, 4);
        assert_eq!(harness.buffer().area(), Rect::new(0, 0, 10, 4));
        assert_eq!(harness.frame_count(), 1);
    }

    #[test]
    fn tick_n_runs_n_cycles() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        harness.tick_n(3);
        assert_eq!(harness.frame_count(), 3);
    }

    #[test]
    fn click_runs_two_cycles() {
        let mut harness = Harness::new(Counter { value: 0 }, update, view);
        harness.click(5, 5);
        assert_eq!(harness.frame_count(), 2);
    }
}
