//! Atom parsing - the leaves of the expression grammar.
//!
//! An atom is a literal, an identifier or path, a parenthesized
//! expression or tuple, a block, or a struct initializer. Struct
//! initializers are recognized greedily here whenever a path is followed
//! by a brace group; the control-flow parser undoes that choice when the
//! braces turn out to be a statement body (see `flow`).

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, FatalResult, Handler, Span};

use crate::ast::{
    BlockExpr, CharExpr, Expr, FloatExpr, IdentExpr, IntExpr, PathExpr, StrExpr, StructInitExpr,
    TupleExpr,
};
use crate::stmt;

/// Collect `:: Ident` continuations after a leading path segment.
fn continue_path(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Vec<IdentExpr>> {
    let mut segments = Vec::new();
    loop {
        match lexer.peek()? {
            Some(token) if token.is_punct("::") => {
                lexer.next()?;
                match lexer.peek()? {
                    Some(Token::Ident { span, text }) => {
                        lexer.next()?;
                        segments.push(IdentExpr {
                            span,
                            name: text.to_string(),
                        });
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected an identifier, found this instead",
                        ));
                        return Ok(segments);
                    }
                    None => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected end of file",
                            lexer.eof_span(),
                            "Expected an identifier, found end of file instead",
                        ));
                        return Ok(segments);
                    }
                }
            }
            _ => return Ok(segments),
        }
    }
}

/// Parse a path that must begin with an identifier.
///
/// Always yields `Expr::Path` on success, even for a single segment;
/// callers that want the single-identifier collapse go through [`atom`].
pub(crate) fn path(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    match lexer.next()? {
        Some(Token::Ident { span, text }) => {
            let mut segments = vec![IdentExpr {
                span,
                name: text.to_string(),
            }];
            segments.extend(continue_path(lexer, dcx)?);
            Ok(Expr::Path(PathExpr {
                span: Span::new(span.start, lexer.offset()),
                segments,
            }))
        }
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Unexpected token",
                token.span(),
                "Expected an identifier, found this instead",
            ));
            Ok(Expr::Unrecoverable(token.span()))
        }
        None => {
            dcx.emit(Diagnostic::error(
                "Unexpected end of file",
                lexer.eof_span(),
                "Expected an identifier, found end of file instead",
            ));
            Ok(Expr::Unrecoverable(lexer.eof_span()))
        }
    }
}

/// Parse the `name: expr` list inside a struct initializer's braces.
fn struct_init_fields(
    inner: &mut Lexer<'_>,
    dcx: &Handler,
) -> FatalResult<Vec<(IdentExpr, Expr)>> {
    let mut fields = Vec::new();
    while !inner.is_empty() {
        match inner.next()? {
            Some(Token::Ident { span, text }) => {
                let name = IdentExpr {
                    span,
                    name: text.to_string(),
                };
                match inner.next()? {
                    Some(token) if token.is_punct(":") => {
                        fields.push((name, Expr::parse(inner, dcx)?));
                        match inner.peek()? {
                            Some(token) if token.is_punct(",") => {
                                inner.next()?;
                            }
                            None => {}
                            Some(token) => {
                                dcx.emit(Diagnostic::error(
                                    "Unexpected token",
                                    token.span(),
                                    "Expected a comma or closing brace, found this instead",
                                ));
                                break;
                            }
                        }
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected a colon, found this instead",
                        ));
                        fields.push((name, Expr::Unrecoverable(Span::DUMMY)));
                        break;
                    }
                    None => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected end of file",
                            inner.eof_span(),
                            "Expected a colon, found end of file instead",
                        ));
                        fields.push((name, Expr::Unrecoverable(Span::DUMMY)));
                        break;
                    }
                }
            }
            Some(token) => {
                dcx.emit(Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected an identifier, found this instead",
                ));
                break;
            }
            None => break,
        }
    }
    Ok(fields)
}

/// Parse a single atom.
pub(crate) fn atom(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    match lexer.next()? {
        Some(Token::Ident { span, text }) => {
            let mut segments = vec![IdentExpr {
                span,
                name: text.to_string(),
            }];
            segments.extend(continue_path(lexer, dcx)?);
            let path = PathExpr {
                span: Span::new(span.start, lexer.offset()),
                segments,
            };
            match lexer.peek()? {
                Some(Token::Group {
                    span: brace_span,
                    delim: Delim::Brace,
                    mut inner,
                }) => {
                    lexer.next()?;
                    let fields = struct_init_fields(&mut inner, dcx)?;
                    Ok(Expr::StructInit(Box::new(StructInitExpr {
                        span: Span::new(span.start, lexer.offset()),
                        path,
                        brace_span,
                        fields,
                    })))
                }
                _ => {
                    let mut path = path;
                    if path.segments.len() == 1 {
                        Ok(Expr::Ident(path.segments.remove(0)))
                    } else {
                        Ok(Expr::Path(path))
                    }
                }
            }
        }
        Some(Token::Str { span, value }) => Ok(Expr::Str(StrExpr { span, value })),
        Some(Token::Char { span, value }) => Ok(Expr::Char(CharExpr { span, value })),
        Some(Token::Int {
            span,
            value,
            suffix,
        }) => Ok(Expr::Int(IntExpr {
            span,
            value,
            suffix,
        })),
        Some(Token::Float {
            span,
            value,
            suffix,
        }) => Ok(Expr::Float(FloatExpr {
            span,
            value,
            suffix,
        })),
        Some(Token::Group {
            span,
            delim: Delim::Paren,
            mut inner,
        }) => {
            if inner.is_empty() {
                return Ok(Expr::Tuple(TupleExpr {
                    span,
                    exprs: Vec::new(),
                }));
            }
            let expr = Expr::parse(&mut inner, dcx)?;
            if !inner.is_empty() {
                match inner.peek()? {
                    Some(token) if token.is_punct(",") => {
                        inner.next()?;
                        let mut exprs = vec![expr];
                        exprs.extend(Expr::comma_separated(&mut inner, dcx)?);
                        return Ok(Expr::Tuple(TupleExpr { span, exprs }));
                    }
                    _ => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected tokens",
                            Span::new(inner.offset(), inner.end()),
                            "Expected a closing parenthesis, found these tokens instead",
                        ));
                    }
                }
            }
            Ok(expr)
        }
        Some(Token::Group {
            span,
            delim: Delim::Brace,
            mut inner,
        }) => {
            let mut exprs = Vec::new();
            while !inner.is_empty() {
                exprs.push(stmt::semi(&mut inner, dcx)?);
            }
            Ok(Expr::Block(BlockExpr { span, exprs }))
        }
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Expected an expression",
                token.span(),
                "Expected an expression, found this instead",
            ));
            Ok(Expr::Unrecoverable(token.span()))
        }
        None => {
            let span = Span::point(lexer.offset());
            dcx.emit(Diagnostic::error(
                "Expected an expression",
                span,
                "Expected an expression, found end of file instead",
            ));
            Ok(Expr::Unrecoverable(span))
        }
    }
}
