//! End-to-end harness + scenario language tests, mirroring the framework's
//! canonical usage scenarios.

use zithril::harness::scenario::run_scenario;
use zithril::harness::Action;
use zithril::widget::StaticWidget;
use zithril::{Buffer, Event, Frame, KeyCode, KeyEvent, Rect, Style};

struct Counter {
    count: u32,
}

fn counter_update(state: &mut Counter, event: Event) -> Action {
    if let Event::Key(KeyEvent { code: KeyCode::Char('+'), .. }) = event {
        state.count += 1;
    }
    Action::None
}

fn counter_view(state: &Counter, frame: &mut Frame) {
    let area = frame.size();
    let text = format!("Count: {}", state.count);
    frame.render(
        &StaticWidget::new(move |area: Rect, buffer: &mut Buffer| {
            buffer.set_string(area.x(), area.y(), &text, Style::new());
        }),
        area,
    );
}

/// S1 — counter increments and renders.
#[test]
fn counter_increments_and_renders() {
    let source = "\
size 40 10
key +
key +
key +
expect_string 0 0 \"Count: 3\"
";
    let harness = run_scenario(Counter { count: 0 }, counter_update, counter_view, source).unwrap();
    assert!(harness.failures().is_empty(), "{:?}", harness.failures());
}

struct Labels;

fn labels_update(_state: &mut Labels, _event: Event) -> Action {
    Action::None
}

fn labels_view(_state: &Labels, frame: &mut Frame) {
    let area = frame.size();
    frame.render(
        &StaticWidget::new(|area: Rect, buffer: &mut Buffer| {
            buffer.set_string(area.x(), area.y(), "Bold", Style::new().bold());
            buffer.set_string(area.x(), area.y() + 1, "Normal", Style::new());
        }),
        area,
    );
}

/// S2 — styled output: the first assertion passes, the second fails.
#[test]
fn styled_output_second_assertion_fails() {
    let source = "\
size 40 10
expect_style 0 0 bold
expect_style 0 1 bold
";
    let harness = run_scenario(Labels, labels_update, labels_view, source).unwrap();
    assert_eq!(harness.failures().len(), 1);
    assert_eq!(harness.failures()[0].expected, "bold");
}

struct Quittable;

fn quittable_update(_state: &mut Quittable, event: Event) -> Action {
    if let Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) = event {
        Action::Quit
    } else {
        Action::None
    }
}

fn quittable_view(_state: &Quittable, _frame: &mut Frame) {}

/// S3 — quit on key.
#[test]
fn quit_on_key_passes() {
    let source = "\
size 40 10
key q
expect_quit
";
    let harness = run_scenario(Quittable, quittable_update, quittable_view, source).unwrap();
    assert!(harness.failures().is_empty());
}
