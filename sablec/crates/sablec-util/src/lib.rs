//! sablec-util - Shared Infrastructure for the Sable Compiler
//!
//! This crate provides the foundation types used by every phase of the
//! front end: source spans, diagnostics, the diagnostic handler, and the
//! terminal renderer that turns a diagnostic into an annotated snippet.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{render, Diagnostic, Fatal, FatalResult, Handler, Palette};
pub use span::Span;
