//! Error types for pscircle operations.
//!
//! This module provides the main error type [`PscircleError`] which wraps
//! the error conditions that can occur while reading and laying out a
//! process listing.

use std::io;

use thiserror::Error;

use pscircle_procs::StreamError;

/// The main error type for pscircle operations.
#[derive(Debug, Error)]
pub enum PscircleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Configuration error: {0}")]
    Config(String),
}
