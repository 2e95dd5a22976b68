//! The line-oriented scenario language: a small text format the harness can
//! parse and execute directly, for assertion-heavy scripted tests.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::event::{KeyCode, Modifiers};

use super::{Action, Harness, HarnessConfig};

/// Parse a key token (`"a"`, `"ctrl+c"`, `"shift+f5"`, `"enter"`, ...) into
/// a code and modifier set.
fn parse_key_token(line: usize, token: &str) -> Result<(KeyCode, Modifiers)> {
    let mut parts: Vec<&str> = token.split('+').collect();
    let key_part = parts.pop().ok_or_else(|| Error::ScenarioParse {
        line,
        message: "empty key token".to_string(),
    })?;

    let mut modifiers = Modifiers::NONE;
    for part in parts {
        match part {
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            other => {
                return Err(Error::ScenarioParse {
                    line,
                    message: format!("unknown modifier {other:?}"),
                });
            }
        }
    }

    let code = match key_part {
        "enter" => KeyCode::Enter,
        "escape" => KeyCode::Escape,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::Backtab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" => KeyCode::PageUp,
        "page_down" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,
        f if f.len() >= 2 && f.starts_with('f') && f[1..].chars().all(|c| c.is_ascii_digit()) => {
            let n: u8 = f[1..].parse().map_err(|_| Error::ScenarioParse {
                line,
                message: format!("invalid function key {f:?}"),
            })?;
            KeyCode::Function(n)
        }
        single if single.chars().count() == 1 => {
            #[allow(clippy::unwrap_used)]
            KeyCode::Char(single.chars().next().unwrap())
        }
        other => {
            return Err(Error::ScenarioParse {
                line,
                message: format!("unknown key name {other:?}"),
            });
        }
    };

    Ok((code, modifiers))
}

/// Tokenize one scenario line into whitespace-separated tokens, honoring
/// double-quoted strings with `\"`, `\\`, `\n`, `\t` escapes.
fn tokenize(line: usize, text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('"') => s.push('"'),
                        Some('\\') => s.push('\\'),
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(other) => {
                            return Err(Error::ScenarioParse {
                                line,
                                message: format!("unknown escape \\{other}"),
                            });
                        }
                        None => {
                            return Err(Error::ScenarioParse {
                                line,
                                message: "unterminated escape".to_string(),
                            });
                        }
                    },
                    Some(other) => s.push(other),
                    None => {
                        return Err(Error::ScenarioParse {
                            line,
                            message: "unterminated string".to_string(),
                        });
                    }
                }
            }
            tokens.push(s);
        } else {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                s.push(c);
                chars.next();
            }
            tokens.push(s);
        }
    }

    Ok(tokens)
}

fn parse_u16(line: usize, token: &str) -> Result<u16> {
    token.parse().map_err(|_| Error::ScenarioParse {
        line,
        message: format!("expected a number, got {token:?}"),
    })
}

/// Run scenario source against a fresh harness built from `initial_state`,
/// `update`, and `view`. A leading `size W H` directive, if present,
/// configures the harness's initial buffer dimensions.
pub fn run_scenario<S>(
    initial_state: S,
    update: fn(&mut S, crate::event::Event) -> Action,
    view: fn(&S, &mut crate::frame::Frame),
    source: &str,
) -> Result<Harness<S>> {
    let lines: Vec<(usize, &str)> = source
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| {
            let trimmed = l.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect();

    info!(directive_count = lines.len(), "running scenario");

    let mut config = HarnessConfig::default();
    let mut start = 0;
    if let Some((line, text)) = lines.first() {
        let tokens = tokenize(*line, text)?;
        if tokens.first().map(String::as_str) == Some("size") {
            if tokens.len() != 3 {
                return Err(Error::ScenarioParse {
                    line: *line,
                    message: "size requires W H".to_string(),
                });
            }
            config.width = parse_u16(*line, &tokens[1])?;
            config.height = parse_u16(*line, &tokens[2])?;
            start = 1;
        }
    }

    let mut harness = Harness::with_config(initial_state, update, view, config);
    let mut pending_repeat: u32 = 1;

    for &(line, text) in &lines[start..] {
        harness.set_current_line(Some(line));
        let tokens = tokenize(line, text)?;
        let Some(directive) = tokens.first() else {
            continue;
        };

        let repeat = pending_repeat;
        pending_repeat = 1;

        for _ in 0..repeat {
            execute_directive(&mut harness, line, directive, &tokens)?;
        }

        if directive == "repeat" {
            // the multiplier applies to the *next* directive, not this one
            if tokens.len() != 2 {
                return Err(Error::ScenarioParse {
                    line,
                    message: "repeat requires N".to_string(),
                });
            }
            pending_repeat = parse_u16(line, &tokens[1])? as u32;
        }
    }
    harness.set_current_line(None);

    Ok(harness)
}

fn execute_directive<S>(
    harness: &mut Harness<S>,
    line: usize,
    directive: &str,
    tokens: &[String],
) -> Result<()> {
    debug!(line, directive, "executing scenario directive");
    match directive {
        "repeat" => {} // handled by the caller, which sets pending_repeat
        "size" => {
            return Err(Error::ScenarioParse {
                line,
                message: "size must be the first directive".to_string(),
            });
        }
        "key" => {
            let token = tokens.get(1).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "key requires an argument".to_string(),
            })?;
            let (code, modifiers) = parse_key_token(line, token)?;
            harness.key_with_modifiers(code, modifiers);
        }
        "type" => {
            let text = tokens.get(1).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "type requires a quoted string".to_string(),
            })?;
            harness.type_text(text);
        }
        "click" => two_coords(harness, line, tokens, Harness::click)?,
        "right_click" => two_coords(harness, line, tokens, Harness::right_click)?,
        "mouse_down" => two_coords(harness, line, tokens, Harness::mouse_down)?,
        "mouse_up" => two_coords(harness, line, tokens, Harness::mouse_up)?,
        "hover" => two_coords(harness, line, tokens, Harness::hover)?,
        "scroll_up" => two_coords(harness, line, tokens, Harness::scroll_up)?,
        "scroll_down" => two_coords(harness, line, tokens, Harness::scroll_down)?,
        "drag" => {
            let x1 = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
            let y1 = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
            let x2 = parse_u16(line, tokens.get(3).map(String::as_str).unwrap_or_default())?;
            let y2 = parse_u16(line, tokens.get(4).map(String::as_str).unwrap_or_default())?;
            harness.drag(x1, y1, x2, y2);
        }
        "tick" => match tokens.get(1) {
            Some(n) => harness.tick_n(parse_u16(line, n)? as u32),
            None => harness.tick(),
        },
        "expect_string" => {
            let x = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
            let y = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
            let text = tokens.get(3).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "expect_string requires text".to_string(),
            })?;
            harness.expect_string(x, y, text);
        }
        "expect_cell" => {
            let x = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
            let y = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
            let c = tokens.get(3).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "expect_cell requires a character".to_string(),
            })?;
            let ch = c.chars().next().ok_or_else(|| Error::ScenarioParse {
                line,
                message: "expect_cell requires a non-empty character".to_string(),
            })?;
            harness.expect_cell(x, y, ch);
        }
        "expect_empty" => {
            let x = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
            let y = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
            harness.expect_empty(x, y);
        }
        "expect_style" => {
            let x = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
            let y = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
            let attr = tokens.get(3).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "expect_style requires an attribute name".to_string(),
            })?;
            harness.expect_style(x, y, attr);
        }
        "expect_action" => {
            let expected = tokens.get(1).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "expect_action requires none|quit".to_string(),
            })?;
            harness.expect_action(expected);
        }
        "expect_quit" => {
            harness.expect_quit();
        }
        "snapshot" => {
            let name = tokens.get(1).ok_or_else(|| Error::ScenarioParse {
                line,
                message: "snapshot requires a name".to_string(),
            })?;
            harness.expect_snapshot(name)?;
        }
        other => {
            return Err(Error::ScenarioParse {
                line,
                message: format!("unknown directive {other:?}"),
            });
        }
    }
    Ok(())
}

fn two_coords<S>(
    harness: &mut Harness<S>,
    line: usize,
    tokens: &[String],
    op: fn(&mut Harness<S>, u16, u16),
) -> Result<()> {
    let x = parse_u16(line, tokens.get(1).map(String::as_str).unwrap_or_default())?;
    let y = parse_u16(line, tokens.get(2).map(String::as_str).unwrap_or_default())?;
    op(harness, x, y);
    Ok(())
}
