//! Golden snapshot file format: a header line plus a plain-text rendering
//! of a buffer.

use std::path::Path;

use crate::buffer::Buffer;
use crate::error::{Error, Result};

const HEADER_PREFIX: &str = "# zithril-golden ";
const UPDATE_SNAPSHOTS_VAR: &str = "ZITHRIL_UPDATE_SNAPSHOTS";

/// Render `buffer` as plain text: one line per row, continuation cells
/// (width 0) omitted, trailing whitespace kept as-is.
pub fn render_text(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut out = String::new();
    for y in area.y()..area.bottom() {
        for x in area.x()..area.right() {
            let cell = buffer.get(x, y);
            if cell.is_continuation() {
                continue;
            }
            out.push(cell.ch);
        }
        out.push('\n');
    }
    out
}

/// Build the full golden file contents (header + body) for `buffer`.
pub fn format_golden(buffer: &Buffer) -> String {
    let area = buffer.area();
    format!(
        "{HEADER_PREFIX}{}x{}\n{}",
        area.width(),
        area.height(),
        render_text(buffer)
    )
}

/// Parse a golden file's contents into its declared dimensions and body.
pub fn parse_golden(path: &Path, contents: &str) -> Result<((u16, u16), String)> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or_else(|| Error::InvalidGoldenFileHeader {
        path: path.display().to_string(),
    })?;

    let dims = header
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(|| Error::InvalidGoldenFileHeader {
            path: path.display().to_string(),
        })?;
    let (w, h) = dims
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse::<u16>().ok()?, h.parse::<u16>().ok()?)))
        .ok_or_else(|| Error::InvalidGoldenFileHeader {
            path: path.display().to_string(),
        })?;

    let body: String = lines.collect::<Vec<_>>().join("\n");
    let body = if contents.ends_with('\n') && !body.is_empty() {
        format!("{body}\n")
    } else {
        body
    };
    Ok(((w, h), body))
}

/// Compare `buffer` against the golden file at `path`.
///
/// On mismatch, returns `Ok(Some(diff))` with a line-by-line diff, unless
/// `ZITHRIL_UPDATE_SNAPSHOTS=1` is set in the environment, in which case the
/// file is written (created or overwritten) and the comparison is treated
/// as a pass.
pub fn compare_or_update(buffer: &Buffer, path: &Path) -> Result<Option<String>> {
    let update = std::env::var(UPDATE_SNAPSHOTS_VAR).as_deref() == Ok("1");
    let rendered = render_text(buffer);

    let existing = std::fs::read_to_string(path).ok();

    match existing {
        None => {
            if update {
                write_golden(buffer, path)?;
                Ok(None)
            } else {
                Ok(Some(format!("golden file {} does not exist", path.display())))
            }
        }
        Some(contents) => {
            let (_, body) = parse_golden(path, &contents)?;
            if body == rendered {
                Ok(None)
            } else if update {
                write_golden(buffer, path)?;
                Ok(None)
            } else {
                Ok(Some(line_diff(&body, &rendered)))
            }
        }
    }
}

fn write_golden(buffer: &Buffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format_golden(buffer))?;
    Ok(())
}

fn line_diff(expected: &str, actual: &str) -> String {
    let mut out = String::new();
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let max = expected_lines.len().max(actual_lines.len());
    for i in 0..max {
        let e = expected_lines.get(i).copied().unwrap_or("<missing>");
        let a = actual_lines.get(i).copied().unwrap_or("<missing>");
        if e != a {
            out.push_str(&format!("line {i}: expected {e:?}, got {a:?}\n"));
        }
    }
    out
}
