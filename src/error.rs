//! Error types for zithril.

use std::io;

/// Error type for zithril operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The output stream is not a terminal.
    #[error("not a tty")]
    NotATty,

    /// Reading the current terminal attributes failed.
    #[error("failed to query terminal attributes: {0}")]
    TerminalQueryFailed(String),

    /// Putting the terminal into raw mode (or restoring it) failed.
    #[error("failed to set terminal attributes: {0}")]
    TerminalSetFailed(String),

    /// Layout calculation failed.
    #[error("layout error: {0}")]
    Layout(String),

    /// Rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// A scenario file failed to parse.
    #[error("scenario parse error at line {line}: {message}")]
    ScenarioParse {
        /// 1-based line number within the scenario source.
        line: usize,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A golden snapshot file did not start with the expected header.
    #[error("invalid golden file header in {path}")]
    InvalidGoldenFileHeader {
        /// Path of the offending file.
        path: String,
    },

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for zithril operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::NotATty;
        assert_eq!(err.to_string(), "not a tty");
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn scenario_parse_display() {
        let err = Error::ScenarioParse {
            line: 3,
            message: "unknown directive".into(),
        };
        assert_eq!(
            err.to_string(),
            "scenario parse error at line 3: unknown directive"
        );
    }
}
