//! Control-flow parsing: `if`, `while`, `for`, and `match`.
//!
//! `if` and `match` have to solve the struct-literal ambiguity: in
//! `if x { y }` the atom parser greedily reads `x { y }` as a struct
//! initializer, leaving nothing for the body. The condition is therefore
//! parsed against a scratch handler, and [`fix_improper_struct_init`]
//! decides afterwards whether to keep the initializer, reinterpret its
//! braces as the body (rewinding the lexer), or let the buffered
//! diagnostics through untouched.
//!
//! `while` and `for` parse their condition and iterator plainly and do
//! not run the rule.

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, FatalResult, Handler, Span};

use crate::ast::{Expr, ForExpr, IfExpr, MatchExpr, Pattern, WhileExpr};
use crate::stmt;

/// Walk the rightmost spine of a freshly parsed condition and deal with
/// a struct initializer found there.
///
/// The walk descends through `Binary` right operands, `Prefix` operands,
/// suffix bases, and `let` values whenever the walked child is itself a
/// struct initializer. On reaching one:
///
/// - with buffered errors, the braces made the expression malformed: the
///   last buffered error is discarded, the rest forwarded, the lexer
///   rewound to the opening brace, and the initializer replaced by its
///   bare path so the braces re-parse as the body;
/// - with no buffered errors, the initializer was well-formed but is not
///   allowed in this position, which gets its own diagnostic.
///
/// Any other shape forwards the buffered errors unchanged.
fn fix_improper_struct_init(
    lexer: &mut Lexer<'_>,
    expr: Expr,
    errors: &mut Vec<Diagnostic>,
    dcx: &Handler,
) -> Expr {
    match expr {
        Expr::Binary(mut binary) if matches!(binary.rhs, Expr::StructInit(_)) => {
            let rhs = std::mem::replace(&mut binary.rhs, Expr::Unrecoverable(Span::DUMMY));
            binary.rhs = fix_improper_struct_init(lexer, rhs, errors, dcx);
            Expr::Binary(binary)
        }
        Expr::Prefix(mut prefix) if matches!(prefix.rhs, Expr::StructInit(_)) => {
            let rhs = std::mem::replace(&mut prefix.rhs, Expr::Unrecoverable(Span::DUMMY));
            prefix.rhs = fix_improper_struct_init(lexer, rhs, errors, dcx);
            Expr::Prefix(prefix)
        }
        Expr::Member(mut member) if matches!(member.base, Expr::StructInit(_)) => {
            let base = std::mem::replace(&mut member.base, Expr::Unrecoverable(Span::DUMMY));
            member.base = fix_improper_struct_init(lexer, base, errors, dcx);
            Expr::Member(member)
        }
        Expr::Offset(mut offset) if matches!(offset.base, Expr::StructInit(_)) => {
            let base = std::mem::replace(&mut offset.base, Expr::Unrecoverable(Span::DUMMY));
            offset.base = fix_improper_struct_init(lexer, base, errors, dcx);
            Expr::Offset(offset)
        }
        Expr::Call(mut call) if matches!(call.base, Expr::StructInit(_)) => {
            let base = std::mem::replace(&mut call.base, Expr::Unrecoverable(Span::DUMMY));
            call.base = fix_improper_struct_init(lexer, base, errors, dcx);
            Expr::Call(call)
        }
        Expr::Index(mut index) if matches!(index.base, Expr::StructInit(_)) => {
            let base = std::mem::replace(&mut index.base, Expr::Unrecoverable(Span::DUMMY));
            index.base = fix_improper_struct_init(lexer, base, errors, dcx);
            Expr::Index(index)
        }
        Expr::Cast(mut cast) if matches!(cast.base, Expr::StructInit(_)) => {
            let base = std::mem::replace(&mut cast.base, Expr::Unrecoverable(Span::DUMMY));
            cast.base = fix_improper_struct_init(lexer, base, errors, dcx);
            Expr::Cast(cast)
        }
        Expr::Let(mut let_)
            if let_.else_.is_none() && matches!(let_.value, Some(Expr::StructInit(_))) =>
        {
            let value = let_.value.take();
            if let Some(value) = value {
                let_.value = Some(fix_improper_struct_init(lexer, value, errors, dcx));
            }
            Expr::Let(let_)
        }
        Expr::Let(mut let_) if matches!(let_.else_, Some(Expr::StructInit(_))) => {
            let else_ = let_.else_.take();
            if let Some(else_) = else_ {
                let_.else_ = Some(fix_improper_struct_init(lexer, else_, errors, dcx));
            }
            Expr::Let(let_)
        }
        Expr::StructInit(init) if !errors.is_empty() => {
            errors.pop();
            for error in errors.drain(..) {
                dcx.emit(error);
            }
            lexer.rewind_to(init.brace_span);
            let mut path = init.path;
            if path.segments.len() == 1 {
                Expr::Ident(path.segments.remove(0))
            } else {
                Expr::Path(path)
            }
        }
        Expr::StructInit(init) => {
            dcx.emit(Diagnostic::error(
                "Struct initializer not allowed here",
                init.span,
                "Struct initializers are not allowed as conditions. \
                 Use a variable or wrap the initializer in parentheses.",
            ));
            Expr::StructInit(init)
        }
        expr => {
            for error in errors.drain(..) {
                dcx.emit(error);
            }
            expr
        }
    }
}

/// Parse a condition or scrutinee speculatively and apply the
/// struct-initializer rule to the result.
fn condition(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let scratch = Handler::new();
    let parsed = Expr::parse(lexer, &scratch)?;
    let mut errors = scratch.take();
    Ok(fix_improper_struct_init(lexer, parsed, &mut errors, dcx))
}

/// Parse a control-flow expression, falling through to the jump forms.
pub(crate) fn flow(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    match lexer.peek()? {
        Some(token) if token.is_ident("if") => {
            let start = token.span();
            lexer.next()?;
            let cond = condition(lexer, dcx)?;
            let then = Expr::parse(lexer, dcx)?;
            let else_ = match lexer.peek()? {
                Some(token) if token.is_ident("else") => {
                    lexer.next()?;
                    Some(Expr::parse(lexer, dcx)?)
                }
                _ => None,
            };
            Ok(Expr::If(Box::new(IfExpr {
                span: Span::new(start.start, lexer.offset()),
                cond,
                then,
                else_,
            })))
        }
        Some(token) if token.is_ident("while") => {
            let start = token.span();
            lexer.next()?;
            let cond = Expr::parse(lexer, dcx)?;
            let body = Expr::parse(lexer, dcx)?;
            Ok(Expr::While(Box::new(WhileExpr {
                span: Span::new(start.start, lexer.offset()),
                cond,
                body,
            })))
        }
        Some(token) if token.is_ident("for") => {
            let start = token.span();
            lexer.next()?;
            let pattern = Pattern::parse(lexer, dcx)?;
            match lexer.next()? {
                Some(token) if token.is_ident("in") => {}
                Some(token) => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected 'in', found this instead",
                    ));
                }
                None => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected end of file",
                        lexer.eof_span(),
                        "Expected 'in', found end of file instead",
                    ));
                }
            }
            let iter = Expr::parse(lexer, dcx)?;
            let body = Expr::parse(lexer, dcx)?;
            Ok(Expr::For(Box::new(ForExpr {
                span: Span::new(start.start, lexer.offset()),
                pattern,
                iter,
                body,
            })))
        }
        Some(token) if token.is_ident("match") => {
            let start = token.span();
            lexer.next()?;
            let scrutinee = condition(lexer, dcx)?;
            let mut arms = Vec::new();
            match lexer.next()? {
                Some(Token::Group {
                    delim: Delim::Brace,
                    mut inner,
                    ..
                }) => {
                    while !inner.is_empty() {
                        let pattern = Pattern::parse(&mut inner, dcx)?;
                        match inner.next()? {
                            Some(token) if token.is_punct("=>") => {
                                let body = Expr::parse(&mut inner, dcx)?;
                                arms.push((pattern, body));
                            }
                            Some(token) => {
                                dcx.emit(Diagnostic::error(
                                    "Unexpected token",
                                    token.span(),
                                    "Expected '=>', found this instead",
                                ));
                            }
                            None => {
                                dcx.emit(Diagnostic::error(
                                    "Unexpected end of file",
                                    inner.eof_span(),
                                    "Expected '=>', found end of file instead",
                                ));
                            }
                        }
                        if let Some(token) = inner.peek()? {
                            if token.is_punct(",") {
                                inner.next()?;
                            }
                        }
                    }
                }
                Some(token) => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected '{', found this instead",
                    ));
                }
                None => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected end of file",
                        lexer.eof_span(),
                        "Expected '{', found end of file instead",
                    ));
                }
            }
            Ok(Expr::Match(Box::new(MatchExpr {
                span: Span::new(start.start, lexer.offset()),
                scrutinee,
                arms,
            })))
        }
        _ => stmt::cont(lexer, dcx),
    }
}
