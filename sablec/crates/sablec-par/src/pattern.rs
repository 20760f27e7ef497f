//! Pattern parsing.
//!
//! Patterns appear in `let` bindings, `for` loops, function parameters,
//! and `match` arms: a binding name, the `_` wildcard, a tuple of
//! patterns, a struct destructuring, or a literal value to compare
//! against. A path of two or more segments without braces is a value
//! pattern (an enum variant).

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, Fatal, FatalResult, Handler, Span};

use crate::ast::{
    CharExpr, Expr, FloatExpr, IdentExpr, IntExpr, PathExpr, Pattern, StrExpr,
};

impl Pattern {
    /// Parse a single pattern.
    pub fn parse(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Pattern> {
        match lexer.peek()? {
            Some(Token::Ident { span, text: "_" }) => {
                lexer.next()?;
                Ok(Pattern::Ignore(span))
            }
            Some(Token::Ident { span, text }) => {
                lexer.next()?;
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
                        delim: Delim::Brace,
                        mut inner,
                        ..
                    }) => {
                        lexer.next()?;
                        let fields = struct_fields(&mut inner, dcx)?;
                        Ok(Pattern::Struct {
                            span: Span::new(span.start, lexer.offset()),
                            path,
                            fields,
                        })
                    }
                    _ => {
                        let mut path = path;
                        if path.segments.len() == 1 {
                            Ok(Pattern::Ident(path.segments.remove(0)))
                        } else {
                            Ok(Pattern::Value(Box::new(Expr::Path(path))))
                        }
                    }
                }
            }
            Some(Token::Group {
                span,
                delim: Delim::Paren,
                mut inner,
            }) => {
                lexer.next()?;
                let patterns = Pattern::comma_separated(&mut inner, dcx)?;
                if !inner.is_empty() {
                    dcx.emit(Diagnostic::error(
                        "Unexpected tokens",
                        Span::new(inner.offset(), inner.end()),
                        "Expected a closing bracket, found these tokens instead",
                    ));
                }
                Ok(Pattern::Tuple { span, patterns })
            }
            Some(Token::Str { span, value }) => {
                lexer.next()?;
                Ok(Pattern::Value(Box::new(Expr::Str(StrExpr { span, value }))))
            }
            Some(Token::Char { span, value }) => {
                lexer.next()?;
                Ok(Pattern::Value(Box::new(Expr::Char(CharExpr {
                    span,
                    value,
                }))))
            }
            Some(Token::Int {
                span,
                value,
                suffix,
            }) => {
                lexer.next()?;
                Ok(Pattern::Value(Box::new(Expr::Int(IntExpr {
                    span,
                    value,
                    suffix,
                }))))
            }
            Some(Token::Float {
                span,
                value,
                suffix,
            }) => {
                lexer.next()?;
                Ok(Pattern::Value(Box::new(Expr::Float(FloatExpr {
                    span,
                    value,
                    suffix,
                }))))
            }
            Some(token) => {
                lexer.next()?;
                dcx.emit(Diagnostic::error(
                    "Expected a pattern",
                    token.span(),
                    "Expected a pattern, found this instead",
                ));
                Ok(Pattern::Ignore(token.span()))
            }
            None => {
                dcx.emit(Diagnostic::error(
                    "Expected a pattern",
                    lexer.eof_span(),
                    "Expected a pattern, found end of file instead",
                ));
                Ok(Pattern::Ignore(lexer.eof_span()))
            }
        }
    }

    /// Parse comma-separated patterns until the lexer runs out.
    ///
    /// As with expression lists, a non-comma separator is fatal: the list
    /// is always bounded by a delimited group.
    pub(crate) fn comma_separated(
        lexer: &mut Lexer<'_>,
        dcx: &Handler,
    ) -> FatalResult<Vec<Pattern>> {
        let mut patterns = Vec::new();
        while !lexer.is_empty() {
            patterns.push(Pattern::parse(lexer, dcx)?);
            match lexer.peek()? {
                Some(token) if token.is_punct(",") => {
                    lexer.next()?;
                }
                Some(token) => {
                    return Err(Fatal(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected a comma, found this instead",
                    )));
                }
                None => {}
            }
        }
        Ok(patterns)
    }
}

/// Collect `:: Ident` continuations after a leading pattern segment.
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

/// Parse the `name: pattern` list inside a struct pattern's braces.
fn struct_fields(
    inner: &mut Lexer<'_>,
    dcx: &Handler,
) -> FatalResult<Vec<(IdentExpr, Pattern)>> {
    let mut fields = Vec::new();
    while !inner.is_empty() {
        match inner.next()? {
            Some(Token::Ident { span, text }) => {
                let name = IdentExpr {
                    span,
                    name: text.to_string(),
                };
                match inner.peek()? {
                    Some(token) if token.is_punct(":") => {
                        inner.next()?;
                        fields.push((name, Pattern::parse(inner, dcx)?));
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected a colon, found this instead",
                        ));
                        fields.push((name, Pattern::Ignore(Span::DUMMY)));
                        break;
                    }
                    None => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected end of file",
                            inner.eof_span(),
                            "Expected a colon, found end of file instead",
                        ));
                        fields.push((name, Pattern::Ignore(Span::DUMMY)));
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
        match inner.peek()? {
            Some(token) if token.is_punct(",") => {
                inner.next()?;
            }
            Some(token) => {
                dcx.emit(Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected a comma or closing brace, found this instead",
                ));
                break;
            }
            None => {}
        }
    }
    Ok(fields)
}
