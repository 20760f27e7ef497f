//! sablec-lex - Delimiter-Aware Lexer for the Sable Language
//!
//! This crate turns a UTF-8 source buffer into tokens. Unlike a flat
//! tokenizer, balanced `()`, `[]`, and `{}` regions are matched eagerly
//! during lexing: the lexer emits a single [`Token::Group`] whose payload
//! is a nested [`Lexer`] scoped to the interior of the delimiters. All
//! lexers produced from one buffer share the same `&str` and use absolute
//! byte offsets, so spans from any nesting depth index the original
//! source directly.
//!
//! Token-level failures (bad escapes, bad numeric suffixes, unknown
//! characters, unclosed delimiters) corrupt position tracking beyond safe
//! recovery and are returned as [`sablec_util::Fatal`] errors; everything
//! else is the parser's problem.

mod edge_cases;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{Delim, FloatSuffix, IntSuffix, Token};
