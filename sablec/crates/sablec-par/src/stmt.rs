//! Statement-level forms: `;` termination, jumps, and `let` bindings.
//!
//! A trailing `;` wraps the expression in a `Semi` node, which is how a
//! block distinguishes its statements from its trailing expression.

use sablec_lex::Lexer;
use sablec_util::{FatalResult, Handler, Span};

use crate::ast::{BreakExpr, ContinueExpr, Expr, LetExpr, Pattern, ReturnExpr, SemiExpr, Ty};
use crate::{expr, items};

/// Parse one expression and wrap it in `Semi` if a `;` follows.
pub(crate) fn semi(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let base = items::item(lexer, dcx)?;
    match lexer.peek()? {
        Some(token) if token.is_punct(";") => {
            lexer.next()?;
            Ok(Expr::Semi(Box::new(SemiExpr {
                span: Span::new(base.span().start, lexer.offset()),
                inner: base,
            })))
        }
        _ => Ok(base),
    }
}

/// Parse the jump forms `return`, `break`, and `continue`, falling
/// through to `let`.
///
/// `return` and `break` take a value unless a `;` or the end of input
/// follows directly.
pub(crate) fn cont(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    match lexer.peek()? {
        Some(token) if token.is_ident("return") => {
            let start = token.span();
            lexer.next()?;
            let value = jump_value(lexer, dcx)?;
            Ok(Expr::Return(Box::new(ReturnExpr {
                span: Span::new(start.start, lexer.offset()),
                value,
            })))
        }
        Some(token) if token.is_ident("break") => {
            let start = token.span();
            lexer.next()?;
            let value = jump_value(lexer, dcx)?;
            Ok(Expr::Break(Box::new(BreakExpr {
                span: Span::new(start.start, lexer.offset()),
                value,
            })))
        }
        Some(token) if token.is_ident("continue") => {
            let start = token.span();
            lexer.next()?;
            Ok(Expr::Continue(ContinueExpr {
                span: Span::new(start.start, lexer.offset()),
            }))
        }
        _ => let_(lexer, dcx),
    }
}

/// The optional value of a `return` or `break`.
fn jump_value(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Option<Expr>> {
    match lexer.peek()? {
        Some(token) if token.is_punct(";") => Ok(None),
        None => Ok(None),
        _ => Ok(Some(Expr::parse(lexer, dcx)?)),
    }
}

/// Parse `let PATTERN (: TY)? (= EXPR (else EXPR)?)?`, falling through
/// to the binary ladder.
fn let_(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    match lexer.peek()? {
        Some(token) if token.is_ident("let") => {
            let start = token.span();
            lexer.next()?;
            let pattern = Pattern::parse(lexer, dcx)?;
            let ty = match lexer.peek()? {
                Some(token) if token.is_punct(":") => {
                    lexer.next()?;
                    Some(Ty::parse(lexer, dcx)?)
                }
                _ => None,
            };
            let (value, else_) = match lexer.peek()? {
                Some(token) if token.is_punct("=") => {
                    lexer.next()?;
                    let value = Expr::parse(lexer, dcx)?;
                    let else_ = match lexer.peek()? {
                        Some(token) if token.is_ident("else") => {
                            lexer.next()?;
                            Some(Expr::parse(lexer, dcx)?)
                        }
                        _ => None,
                    };
                    (Some(value), else_)
                }
                _ => (None, None),
            };
            Ok(Expr::Let(Box::new(LetExpr {
                span: Span::new(start.start, lexer.offset()),
                pattern,
                ty,
                value,
                else_,
            })))
        }
        _ => expr::binary(lexer, dcx),
    }
}
