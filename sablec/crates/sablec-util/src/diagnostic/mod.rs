//! Diagnostic module - Error reporting infrastructure.
//!
//! This module provides the [`Diagnostic`] record, the [`Handler`] sink
//! that parser productions emit into, and the [`Fatal`] wrapper for lexer
//! failures that abort parsing of a file.
//!
//! Parser errors are *recoverable*: a production emits into the handler
//! and returns a placeholder node so its caller can continue. Lexer
//! failures corrupt position tracking beyond safe recovery, so they travel
//! as `Err(Fatal)` up to the driver instead.
//!
//! # Examples
//!
//! ```
//! use sablec_util::{Diagnostic, Handler, Span};
//!
//! let handler = Handler::new();
//! handler.emit(Diagnostic::error(
//!     "Unexpected token",
//!     Span::new(4, 5),
//!     "Expected an identifier, found this instead",
//! ));
//!
//! assert!(handler.has_errors());
//! ```

mod render;

pub use render::{render, Palette};

use std::cell::RefCell;
use std::fmt;

use thiserror::Error;

use crate::Span;

/// A single error report with a precise source location.
///
/// `message` is the short text for the header line, `label` the longer
/// explanation printed under the underline, and `note` an optional block
/// of extra context rendered after the snippet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Short header message.
    pub message: String,
    /// Byte range the report points at.
    pub span: Span,
    /// Long message rendered under the underline.
    pub label: String,
    /// Optional trailing note (hints, help text).
    pub note: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span, label: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            label: label.into(),
            note: None,
        }
    }

    /// Attach a note to the diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A diagnostic severe enough to abort parsing of the file.
///
/// Raised by the lexer for token-level failures (invalid escapes, bad
/// numeric suffixes, unknown characters) and structural failures
/// (unclosed delimiters). The driver renders it once and stops.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct Fatal(pub Diagnostic);

/// Result alias for operations that can fail fatally.
pub type FatalResult<T> = std::result::Result<T, Fatal>;

/// Sink for recoverable diagnostics.
///
/// Productions take `&Handler` and push reports as they consume tokens;
/// interior mutability keeps the signatures clean while sub-lexers and
/// productions borrow freely. Reports stay in emission order.
///
/// The struct-literal disambiguation rule parses a condition against a
/// scratch handler, then uses [`Handler::take`] to decide which buffered
/// reports to forward.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic into the sink.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Clone out the collected diagnostics, leaving the handler intact.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain the collected diagnostics out of the handler.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("Unexpected token", Span::new(1, 2), "found this");
        assert_eq!(diag.message, "Unexpected token");
        assert_eq!(diag.span, Span::new(1, 2));
        assert!(diag.note.is_none());
    }

    #[test]
    fn test_diagnostic_with_note() {
        let diag = Diagnostic::error("m", Span::DUMMY, "l").with_note("hint: add a type");
        assert_eq!(diag.note.as_deref(), Some("hint: add a type"));
    }

    #[test]
    fn test_handler_emit_and_count() {
        let handler = Handler::new();
        assert!(!handler.has_errors());

        handler.emit(Diagnostic::error("a", Span::DUMMY, "a"));
        handler.emit(Diagnostic::error("b", Span::DUMMY, "b"));
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn test_handler_preserves_order() {
        let handler = Handler::new();
        handler.emit(Diagnostic::error("first", Span::DUMMY, ""));
        handler.emit(Diagnostic::error("second", Span::DUMMY, ""));

        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }

    #[test]
    fn test_handler_take_drains() {
        let handler = Handler::new();
        handler.emit(Diagnostic::error("a", Span::DUMMY, ""));

        let drained = handler.take();
        assert_eq!(drained.len(), 1);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_fatal_display() {
        let fatal = Fatal(Diagnostic::error("Unclosed delimiters", Span::new(0, 3), ""));
        assert_eq!(fatal.to_string(), "Unclosed delimiters");
    }
}
