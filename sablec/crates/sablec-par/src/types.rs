//! Type parsing.
//!
//! A type is a primitive name, a path, a pointer `*T`, a tuple
//! `(T, ...)`, a slice `[T]`, or an array `[T; N]` whose size must be an
//! unsuffixed integer literal. Primitive names are matched before the
//! path fallback; the exact set is the integer widths up to 128, the two
//! float widths, `str`, `bool`, `char`, `usize`, `isize`, and `Self`.

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, FatalResult, Handler, Span};

use crate::ast::Ty;

impl Ty {
    /// Parse a single type.
    pub fn parse(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Ty> {
        match lexer.next()? {
            Some(Token::Ident { span, text }) => Ok(Self::from_name(lexer, dcx, span, text)?),
            Some(Token::Punct { span, text: "*" }) => {
                let ty = Ty::parse(lexer, dcx)?;
                Ok(Ty::Ptr {
                    span: Span::new(span.start, lexer.offset()),
                    ty: Box::new(ty),
                })
            }
            Some(Token::Group {
                span,
                delim: Delim::Paren,
                mut inner,
            }) => {
                let tys = Ty::comma_separated(&mut inner, dcx)?;
                if !inner.is_empty() {
                    dcx.emit(Diagnostic::error(
                        "Unexpected tokens",
                        Span::new(inner.offset(), inner.end()),
                        "Expected a closing bracket, found these tokens instead",
                    ));
                }
                let span = Span::new(span.start, lexer.offset());
                if tys.is_empty() {
                    Ok(Ty::Unit { span })
                } else {
                    Ok(Ty::Tuple { span, tys })
                }
            }
            Some(Token::Group {
                span,
                delim: Delim::Bracket,
                mut inner,
            }) => Self::bracketed(lexer, dcx, span, &mut inner),
            Some(token) => {
                dcx.emit(Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected a type, found this instead",
                ));
                Ok(Ty::Unrecoverable { span: token.span() })
            }
            None => {
                dcx.emit(Diagnostic::error(
                    "Unexpected end of file",
                    lexer.eof_span(),
                    "Expected a type, found end of file instead",
                ));
                Ok(Ty::Unrecoverable {
                    span: lexer.eof_span(),
                })
            }
        }
    }

    /// Resolve an identifier at type position: a primitive or a path.
    fn from_name(
        lexer: &mut Lexer<'_>,
        dcx: &Handler,
        span: Span,
        text: &str,
    ) -> FatalResult<Ty> {
        let ty = match text {
            "i8" => Ty::Int { span, size: 8, signed: true },
            "i16" => Ty::Int { span, size: 16, signed: true },
            "i32" => Ty::Int { span, size: 32, signed: true },
            "i64" => Ty::Int { span, size: 64, signed: true },
            "i128" => Ty::Int { span, size: 128, signed: true },
            "u8" => Ty::Int { span, size: 8, signed: false },
            "u16" => Ty::Int { span, size: 16, signed: false },
            "u32" => Ty::Int { span, size: 32, signed: false },
            "u64" => Ty::Int { span, size: 64, signed: false },
            "u128" => Ty::Int { span, size: 128, signed: false },
            "f32" => Ty::Float { span, size: 32 },
            "f64" => Ty::Float { span, size: 64 },
            "str" => Ty::Str { span },
            "bool" => Ty::Bool { span },
            "char" => Ty::Char { span },
            "usize" => Ty::Size { span, signed: false },
            "isize" => Ty::Size { span, signed: true },
            "Self" => Ty::SelfTy { span },
            _ => {
                let mut segments = vec![text.to_string()];
                segments.extend(Self::continue_path(lexer, dcx)?);
                return Ok(Ty::Path {
                    span: Span::new(span.start, lexer.offset()),
                    segments,
                });
            }
        };
        Ok(ty)
    }

    /// Parse the interior of `[ ... ]`: a slice, or an array when a `;`
    /// and size follow the element type.
    fn bracketed(
        lexer: &mut Lexer<'_>,
        dcx: &Handler,
        span: Span,
        inner: &mut Lexer<'_>,
    ) -> FatalResult<Ty> {
        let ty = Ty::parse(inner, dcx)?;
        match inner.next()? {
            Some(token) if token.is_punct(";") => {
                let size = match inner.next()? {
                    Some(Token::Int {
                        value,
                        suffix: None,
                        ..
                    }) => value,
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected an integer, found this instead",
                        ));
                        0
                    }
                    None => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected end of file",
                            inner.eof_span(),
                            "Expected an integer, found end of file instead",
                        ));
                        0
                    }
                };
                Ok(Ty::Array {
                    span: Span::new(span.start, lexer.offset()),
                    ty: Box::new(ty),
                    size,
                })
            }
            None => Ok(Ty::Slice {
                span: Span::new(span.start, lexer.offset()),
                ty: Box::new(ty),
            }),
            Some(token) => {
                dcx.emit(Diagnostic::error(
                    "Unexpected tokens",
                    Span::new(token.span().start, inner.end()),
                    "Expected a closing bracket, found these tokens instead",
                ));
                Ok(Ty::Slice {
                    span: Span::new(span.start, lexer.offset()),
                    ty: Box::new(ty),
                })
            }
        }
    }

    /// Collect `:: Ident` continuations of a type path.
    fn continue_path(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Vec<String>> {
        let mut segments = Vec::new();
        loop {
            match lexer.peek()? {
                Some(token) if token.is_punct("::") => {
                    lexer.next()?;
                    match lexer.peek()? {
                        Some(Token::Ident { text, .. }) => {
                            lexer.next()?;
                            segments.push(text.to_string());
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

    /// Parse comma-separated types until the lexer runs out.
    pub(crate) fn comma_separated(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Vec<Ty>> {
        let mut tys = Vec::new();
        while !lexer.is_empty() {
            tys.push(Ty::parse(lexer, dcx)?);
            match lexer.peek()? {
                Some(token) if token.is_punct(",") => {
                    lexer.next()?;
                }
                Some(token) => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected a comma, found this instead",
                    ));
                }
                None => {}
            }
        }
        Ok(tys)
    }
}
