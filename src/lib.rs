//! zithril: the core of an Elm-style terminal UI framework.
//!
//! This crate provides the rendering pipeline and its adjacent subsystems:
//! a double-buffered cell grid with a minimal-diff renderer, a
//! constraint-based layout solver, a byte-level terminal input parser, the
//! terminal backend lifecycle (raw mode, alternate screen, panic-safe
//! restoration), and a headless test harness with a scripted scenario
//! language.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │           Application (model, update, view)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │     Layout solver (Rect + Constraint → sub-rectangles)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │          Widget::render(area, buffer) seam                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │     Cell buffer + diff renderer (minimal update stream)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Terminal backend (raw mode, modes, panic-safe restoration)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bytes flow the other way through the input parser: raw terminal input →
//! [`input::Parser`] → [`event::Event`] → application `update`.
//!
//! The widget library itself, the application event loop, and colour-value
//! math are out of scope here — see [`widget::Widget`] for the single seam
//! external collaborators implement.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod harness;
pub mod input;
pub mod layout;
pub mod style;
pub mod terminal;
pub mod widget;

pub use buffer::{Buffer, Segment};
pub use cell::Cell;
pub use color::{Color, NamedColor};
pub use error::{Error, Result};
pub use event::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent, MouseEventKind, ResizeEvent};
pub use frame::Frame;
pub use geometry::{Padding, Position, Rect, Size};
pub use harness::{Action, FailureRecord, Harness, HarnessConfig};
pub use input::Parser;
pub use layout::{split, Constraint, Direction};
pub use style::{Attributes, Style};
pub use terminal::{
    detect_capabilities, detect_from_process_env, Backend, BackendConfig, ColorSupport,
    MultiplexerKind, TerminalCapabilities, TerminalKind,
};
pub use widget::{StaticWidget, Widget};
