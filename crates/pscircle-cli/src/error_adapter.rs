//! Error adapter for converting PscircleError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. A malformed
//! listing line is shown as a source snippet with the line underlined; every
//! other error is rendered as a plain message with an error code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pscircle::PscircleError;
use pscircle_procs::StreamError;

/// Adapter for a listing line that could not be parsed.
pub struct LineAdapter<'a> {
    err: &'a StreamError,
    line: usize,
    content: &'a str,
}

impl<'a> LineAdapter<'a> {
    /// Create a new adapter for a stream error.
    pub fn new(err: &'a StreamError) -> Self {
        let StreamError::InvalidLine { line, content } = err;
        Self {
            err,
            line: *line,
            content,
        }
    }
}

impl fmt::Debug for LineAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for LineAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid process record on line {}", self.line)
    }
}

impl std::error::Error for LineAdapter<'_> {}

impl MietteDiagnostic for LineAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("pscircle::stream"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "expected `pid ppid cpu mem name`, as printed by `ps -e -o pid,ppid,pcpu,rss,comm --no-headers`",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.content as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::new(0.into(), self.content.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("this line".to_string()),
            span,
        ))))
    }
}

/// Adapter for [`PscircleError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a PscircleError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PscircleError::Io(_) => "pscircle::io",
            PscircleError::Stream(_) => "pscircle::stream",
            PscircleError::Config(_) => "pscircle::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A listing line with its source snippet.
    Line(LineAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Line(l) => fmt::Display::fmt(l, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Line(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Line(l) => l.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Line(l) => l.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Line(l) => l.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Line(l) => l.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`PscircleError`] into the errors to render.
pub fn to_reportables(err: &PscircleError) -> Vec<Reportable<'_>> {
    match err {
        PscircleError::Stream(stream_err) => vec![Reportable::Line(LineAdapter::new(stream_err))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
