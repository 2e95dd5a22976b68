//! Terminal capability detection and the scoped backend lifecycle.

mod backend;
mod capabilities;

pub use backend::{Backend, BackendConfig, OutputBuffer};
pub use capabilities::{
    detect_capabilities, env_from_map, merge_multiplexer_limits, profile_for, ColorSupport,
    MultiplexerKind, TerminalCapabilities, TerminalKind,
};

/// Detect capabilities from the real process environment.
///
/// Thin wrapper around [`detect_capabilities`] for callers that don't need
/// to inject a fake environment (i.e. everything outside this crate's own
/// tests).
pub fn detect_from_process_env() -> TerminalCapabilities {
    detect_capabilities(&|key| std::env::var(key).ok())
}
