//! The scoped terminal backend: raw mode, alternate screen, mouse capture,
//! and panic-safe restoration.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use crossterm::terminal as ct;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::style::Style;

use super::capabilities::TerminalCapabilities;

/// Feature flags configuring a [`Backend`] session. All fields default as
/// documented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Use the alternate screen buffer. Default `true`.
    pub alternate_screen: bool,
    /// Hide the cursor for the session. Default `true`.
    pub hide_cursor: bool,
    /// Enable mouse event capture. Default `false`.
    pub mouse_capture: bool,
    /// Enable bracketed-paste mode. Default `false`.
    pub bracketed_paste: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            hide_cursor: true,
            mouse_capture: false,
            bracketed_paste: false,
        }
    }
}

/// Panic-restoration record. At most one backend may be active per process;
/// installed at construction, cleared at teardown, read (never allocated
/// into) by the panic hook.
struct RestorationState {
    config: BackendConfig,
    sgr_mouse: bool,
}

static ACTIVE: OnceLock<Mutex<Option<RestorationState>>> = OnceLock::new();
static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

fn active_slot() -> &'static Mutex<Option<RestorationState>> {
    ACTIVE.get_or_init(|| Mutex::new(None))
}

fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        emit_panic_restoration();
        previous(info);
    }));
}

/// Write the restoration escape sequence for `state` to `out`, in the order
/// the spec mandates: cursor shown before the alternate screen is left.
/// Raw mode is not part of this sequence; the caller disables it separately
/// once the writes land, since it isn't a byte stream write.
fn write_restoration_sequence(out: &mut dyn Write, state: &RestorationState) -> io::Result<()> {
    if state.config.bracketed_paste {
        out.write_all(b"\x1b[?2004l")?;
    }
    if state.sgr_mouse {
        out.write_all(b"\x1b[?1006l")?;
    }
    if state.config.mouse_capture {
        out.write_all(b"\x1b[?1000l\x1b[?1002l\x1b[?1003l")?;
    }
    if state.config.hide_cursor {
        out.write_all(b"\x1b[?25h")?;
    }
    if state.config.alternate_screen {
        out.write_all(b"\x1b[?1049l")?;
    }
    out.flush()
}

/// Emit the minimum restoration sequence from the last-known configuration
/// in `ACTIVE`. Error-swallowing, best-effort, allocation-free on the hot
/// path.
fn emit_panic_restoration() {
    let Ok(guard) = active_slot().lock() else {
        return;
    };
    let Some(state) = guard.as_ref() else {
        return;
    };

    let mut out = io::stdout();
    let _ = write_restoration_sequence(&mut out, state);
    if let Err(e) = ct::disable_raw_mode() {
        warn!(error = %e, "failed to disable raw mode during panic restoration");
    }
}

/// A bounded output buffer: styles, cursor moves, and glyphs accumulate
/// here; [`OutputBuffer::flush`] writes them to the underlying stream. Style
/// writes identical to the previously emitted style are suppressed.
pub struct OutputBuffer<W: Write> {
    writer: W,
    buf: Vec<u8>,
    capacity: usize,
    last_style: Option<Style>,
}

impl<W: Write> OutputBuffer<W> {
    /// Create a buffer over `writer` that auto-flushes once it holds
    /// `capacity` bytes.
    pub fn new(writer: W, capacity: usize) -> Self {
        Self {
            writer,
            buf: Vec::with_capacity(capacity),
            capacity,
            last_style: None,
        }
    }

    /// Append raw bytes, auto-flushing first if they would overflow the
    /// buffer's capacity.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buf.len() + bytes.len() > self.capacity {
            self.flush()?;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Move the cursor to `(x, y)` (0-based).
    pub fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.append(format!("\x1b[{};{}H", y + 1, x + 1).as_bytes())
    }

    /// Emit a style change, unless it is identical to the last style
    /// emitted through this buffer.
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        if self.last_style == Some(style) {
            return Ok(());
        }
        self.append(b"\x1b[0m")?;
        self.last_style = Some(style);
        Ok(())
    }

    /// Write the terminal stream and clear the internal buffer.
    pub fn flush(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A scoped handle on the real terminal. While alive, raw mode and the
/// configured feature set are engaged; dropping it (or calling
/// [`Backend::teardown`] explicitly) restores the prior state.
pub struct Backend {
    config: BackendConfig,
    capabilities: TerminalCapabilities,
    active: bool,
}

impl Backend {
    /// Initialise a backend against stdout/stdin with `config`, detecting
    /// capabilities from the environment.
    ///
    /// Fails with [`Error::NotATty`] if stdout is not a terminal.
    pub fn new(config: BackendConfig, capabilities: TerminalCapabilities) -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(Error::NotATty);
        }

        ct::enable_raw_mode().map_err(|e| {
            warn!(error = %e, "failed to enable raw mode");
            Error::TerminalSetFailed(e.to_string())
        })?;

        let mut out = io::stdout();
        let sgr_mouse = config.mouse_capture && capabilities.sgr_mouse;
        if config.alternate_screen {
            out.write_all(b"\x1b[?1049h")?;
        }
        if config.hide_cursor {
            out.write_all(b"\x1b[?25l")?;
        }
        if config.mouse_capture && capabilities.mouse {
            out.write_all(b"\x1b[?1000h\x1b[?1002h\x1b[?1003h")?;
            if sgr_mouse {
                out.write_all(b"\x1b[?1006h")?;
            }
        }
        if config.bracketed_paste && capabilities.bracketed_paste {
            out.write_all(b"\x1b[?2004h")?;
        }
        out.flush()?;

        install_panic_hook();
        if let Ok(mut guard) = active_slot().lock() {
            *guard = Some(RestorationState { config, sgr_mouse });
        }

        info!(?config, "terminal backend initialised");

        Ok(Self {
            config,
            capabilities,
            active: true,
        })
    }

    /// The backend's configuration.
    pub const fn config(&self) -> BackendConfig {
        self.config
    }

    /// The detected terminal capabilities.
    pub const fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    /// Query the current terminal size.
    pub fn size(&self) -> Result<Size> {
        let (w, h) = ct::size().map_err(|e| Error::TerminalQueryFailed(e.to_string()))?;
        Ok(Size::new(w, h))
    }

    /// Restore the terminal to its pre-backend state. Idempotent.
    pub fn teardown(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut out = io::stdout();
        let sgr_mouse = self.config.mouse_capture && self.capabilities.sgr_mouse;
        if self.config.bracketed_paste && self.capabilities.bracketed_paste {
            let _ = out.write_all(b"\x1b[?2004l");
        }
        if sgr_mouse {
            let _ = out.write_all(b"\x1b[?1006l");
        }
        if self.config.mouse_capture && self.capabilities.mouse {
            let _ = out.write_all(b"\x1b[?1000l\x1b[?1002l\x1b[?1003l");
        }
        if self.config.hide_cursor {
            let _ = out.write_all(b"\x1b[?25h");
        }
        if self.config.alternate_screen {
            let _ = out.write_all(b"\x1b[?1049l");
        }
        let _ = out.flush();
        ct::disable_raw_mode().map_err(|e| {
            warn!(error = %e, "failed to disable raw mode");
            Error::TerminalSetFailed(e.to_string())
        })?;

        if let Ok(mut guard) = active_slot().lock() {
            *guard = None;
        }
        self.active = false;
        info!("terminal backend torn down");
        Ok(())
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}
