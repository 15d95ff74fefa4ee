//! Errors raised while reading a process listing.

use thiserror::Error;

/// Failure to read a process listing.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A non-blank line does not start with `pid ppid cpu mem`.
    #[error("invalid process record on line {line}: `{content}`")]
    InvalidLine {
        /// One-based line number.
        line: usize,
        /// The offending line, without its line terminator.
        content: String,
    },
}
