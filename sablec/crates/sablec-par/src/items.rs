//! Item parsing: top-level declarations.
//!
//! An item starts with an optional `pub` and one of the declaration
//! keywords; anything else falls through to the control-flow level of
//! the expression grammar. The file entry point consumes `;`-terminated
//! items until the lexer is exhausted.

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, FatalResult, Handler, Span};

use crate::ast::{
    ConstItem, EnumItem, Expr, Fields, FunctionItem, Item, Items, ModDeclItem, ModDefItem,
    Pattern, SemiExpr, StaticItem, StructItem, Ty, UnionItem, UseItem,
};
use crate::{atom, flow, stmt};

/// Parse a whole file into its item list.
///
/// A file with errors still yields an `Items` node; recovery points skip
/// to the end of whatever expression could be parsed.
pub fn parse_file(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Items> {
    let items = file_items(lexer, dcx)?;
    let span = match (items.first(), items.last()) {
        (Some(first), Some(last)) => Span::new(first.span().start, last.span().stop),
        _ => Span::point(lexer.offset()),
    };
    Ok(Items { span, items })
}

/// Parse `;`-terminated items until the lexer is empty.
pub(crate) fn file_items(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Vec<Item>> {
    let mut items = Vec::new();
    while !lexer.is_empty() {
        let expr = stmt::semi(lexer, dcx)?;
        match expr {
            Expr::Item(item) => items.push(*item),
            Expr::Semi(semi) => {
                let SemiExpr { span, inner } = *semi;
                match inner {
                    Expr::Item(mut item) => {
                        item.set_span(span);
                        items.push(*item);
                    }
                    inner => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            inner.span(),
                            "Expected a declaration, found this instead",
                        ));
                        lexer.rewind_to(Span::point(inner.span().stop));
                    }
                }
            }
            expr => {
                dcx.emit(Diagnostic::error(
                    "Unexpected token",
                    expr.span(),
                    "Expected a declaration, found this instead",
                ));
                lexer.rewind_to(Span::point(expr.span().stop));
            }
        }
    }
    Ok(items)
}

/// Require an identifier, reporting and returning `None` otherwise.
fn expect_name(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Option<String>> {
    match lexer.next()? {
        Some(Token::Ident { text, .. }) => Ok(Some(text.to_string())),
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Unexpected token",
                token.span(),
                "Expected an identifier, found this instead",
            ));
            Ok(None)
        }
        None => {
            dcx.emit(Diagnostic::error(
                "Unexpected end of file",
                lexer.eof_span(),
                "Expected an identifier, found end of file instead",
            ));
            Ok(None)
        }
    }
}

/// Parse one item, or fall through to the expression grammar.
pub(crate) fn item(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let token = match lexer.peek()? {
        Some(token) => token,
        None => return flow::flow(lexer, dcx),
    };

    if token.is_ident("pub") {
        lexer.next()?;
        let mut value = item(lexer, dcx)?;
        if let Expr::Item(item) = &mut value {
            item.set_public(true);
        }
        return Ok(value);
    }
    if token.is_ident("fn") {
        return function(lexer, dcx, token.span());
    }
    if token.is_ident("use") {
        return use_item(lexer, dcx, token.span());
    }
    if token.is_ident("mod") {
        return module(lexer, dcx, token.span());
    }
    if token.is_ident("static") || token.is_ident("const") {
        return static_or_const(lexer, dcx, token.span());
    }
    if token.is_ident("struct") {
        return struct_item(lexer, dcx, token.span());
    }
    if token.is_ident("enum") {
        return enum_item(lexer, dcx, token.span());
    }
    if token.is_ident("union") {
        return union_item(lexer, dcx, token.span());
    }
    flow::flow(lexer, dcx)
}

/// `fn NAME (PARAMS) (-> TY)? EXPR`
fn function(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };

    let mut params = Vec::new();
    match lexer.next()? {
        Some(Token::Group {
            delim: Delim::Paren,
            mut inner,
            ..
        }) => {
            while !inner.is_empty() {
                let pattern = Pattern::parse(&mut inner, dcx)?;
                match inner.peek()? {
                    Some(token) if token.is_punct(":") => {
                        inner.next()?;
                        let ty = Ty::parse(&mut inner, dcx)?;
                        params.push((pattern, ty));
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected ':', found this instead",
                        ));
                        params.push((pattern, Ty::Unrecoverable { span: token.span() }));
                    }
                    None => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected end of file",
                            inner.eof_span(),
                            "Expected ':', found end of file instead",
                        ));
                        params.push((pattern, Ty::Unrecoverable { span: inner.eof_span() }));
                    }
                }
                match inner.peek()? {
                    Some(token) if token.is_punct(",") => {
                        inner.next()?;
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected ',', found this instead",
                        ));
                        break;
                    }
                    None => {}
                }
            }
        }
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Unexpected token",
                token.span(),
                "Expected '(', found this instead",
            ));
            return Ok(Expr::Unrecoverable(Span::new(start.start, lexer.offset())));
        }
        None => {
            dcx.emit(Diagnostic::error(
                "Unexpected end of file",
                lexer.eof_span(),
                "Expected '(', found end of file instead",
            ));
            return Ok(Expr::Unrecoverable(Span::new(start.start, lexer.offset())));
        }
    }

    let ret_ty = match lexer.peek()? {
        Some(token) if token.is_punct("->") => {
            lexer.next()?;
            Some(Ty::parse(lexer, dcx)?)
        }
        _ => None,
    };
    let body = Expr::parse(lexer, dcx)?;
    Ok(Expr::Item(Box::new(Item::Function(FunctionItem {
        span: Span::new(start.start, lexer.offset()),
        public: false,
        name,
        params,
        ret_ty,
        body,
    }))))
}

/// `use PATH (as IDENT)?`
fn use_item(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let path = match atom::path(lexer, dcx)? {
        Expr::Path(path) => path,
        expr => return Ok(Expr::Unrecoverable(expr.span())),
    };
    let alias = match lexer.peek()? {
        Some(token) if token.is_ident("as") => {
            lexer.next()?;
            match expect_name(lexer, dcx)? {
                Some(alias) => Some(alias),
                None => return Ok(Expr::Unrecoverable(start)),
            }
        }
        _ => None,
    };
    Ok(Expr::Item(Box::new(Item::Use(UseItem {
        span: Span::new(start.start, lexer.offset()),
        public: false,
        segments: path.segments.into_iter().map(|s| s.name).collect(),
        alias,
    }))))
}

/// `mod NAME ;` or `mod NAME { ITEMS }`
fn module(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };
    match lexer.peek()? {
        Some(Token::Group {
            delim: Delim::Brace,
            mut inner,
            ..
        }) => {
            lexer.next()?;
            let items = file_items(&mut inner, dcx)?;
            Ok(Expr::Item(Box::new(Item::ModDef(ModDefItem {
                span: Span::new(start.start, lexer.offset()),
                public: false,
                name,
                items,
            }))))
        }
        _ => Ok(Expr::Item(Box::new(Item::ModDecl(ModDeclItem {
            span: Span::new(start.start, lexer.offset()),
            public: false,
            name,
        })))),
    }
}

/// `static NAME : TY = EXPR` and `const NAME : TY = EXPR`
///
/// Both the type annotation and the value are mandatory; their absence
/// is reported with a hint note.
fn static_or_const(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    let keyword = match lexer.next()? {
        Some(Token::Ident { text, .. }) => text,
        _ => return Ok(Expr::Unrecoverable(start)),
    };
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };

    let ty = match lexer.peek()? {
        Some(token) if token.is_punct(":") => {
            lexer.next()?;
            Ty::parse(lexer, dcx)?
        }
        Some(token) => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected ':', found this instead",
                )
                .with_note("hint: static and const declarations must have a known type"),
            );
            Ty::Unrecoverable { span: token.span() }
        }
        None => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected end of file",
                    lexer.eof_span(),
                    "Expected ':', found end of file instead",
                )
                .with_note("hint: static and const declarations must have a known type"),
            );
            Ty::Unrecoverable {
                span: Span::new(start.start, lexer.offset()),
            }
        }
    };

    let value = match lexer.peek()? {
        Some(token) if token.is_punct("=") => {
            lexer.next()?;
            Expr::parse(lexer, dcx)?
        }
        Some(token) => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected '=', found this instead",
                )
                .with_note("hint: static and const declarations must have a value"),
            );
            return Ok(Expr::Unrecoverable(Span::new(start.start, lexer.offset())));
        }
        None => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected end of file",
                    lexer.eof_span(),
                    "Expected '=', found end of file instead",
                )
                .with_note("hint: static and const declarations must have a value"),
            );
            return Ok(Expr::Unrecoverable(Span::new(start.start, lexer.offset())));
        }
    };

    let span = Span::new(start.start, lexer.offset());
    let item = if keyword == "static" {
        Item::Static(StaticItem {
            span,
            public: false,
            name,
            ty,
            value,
        })
    } else {
        Item::Const(ConstItem {
            span,
            public: false,
            name,
            ty,
            value,
        })
    };
    Ok(Expr::Item(Box::new(item)))
}

/// `struct NAME FIELDS`
fn struct_item(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };
    let fields = Fields::parse(lexer, dcx)?;
    Ok(Expr::Item(Box::new(Item::Struct(StructItem {
        span: Span::new(start.start, lexer.offset()),
        public: false,
        name,
        fields,
    }))))
}

/// `enum NAME { (VARIANT (, VARIANT)*)? }` where `VARIANT = IDENT FIELDS`
fn enum_item(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };
    match lexer.next()? {
        Some(Token::Group {
            delim: Delim::Brace,
            mut inner,
            ..
        }) => {
            let mut variants = Vec::new();
            while !inner.is_empty() {
                let Some(variant) = expect_name(&mut inner, dcx)? else {
                    return Ok(Expr::Unrecoverable(start));
                };
                let fields = Fields::parse(&mut inner, dcx)?;
                variants.push((variant, fields));
                match inner.peek()? {
                    Some(token) if token.is_punct(",") => {
                        inner.next()?;
                    }
                    Some(token) => {
                        dcx.emit(Diagnostic::error(
                            "Unexpected token",
                            token.span(),
                            "Expected ',', found this instead",
                        ));
                        return Ok(Expr::Unrecoverable(start));
                    }
                    None => {}
                }
            }
            Ok(Expr::Item(Box::new(Item::Enum(EnumItem {
                span: Span::new(start.start, lexer.offset()),
                public: false,
                name,
                variants,
            }))))
        }
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Unexpected token",
                token.span(),
                "Expected '{', found this instead",
            ));
            Ok(Expr::Unrecoverable(start))
        }
        None => {
            dcx.emit(Diagnostic::error(
                "Unexpected end of file",
                lexer.eof_span(),
                "Expected '{', found end of file instead",
            ));
            Ok(Expr::Unrecoverable(start))
        }
    }
}

/// `union NAME { NamedFields }` - the braces are mandatory.
fn union_item(lexer: &mut Lexer<'_>, dcx: &Handler, start: Span) -> FatalResult<Expr> {
    lexer.next()?;
    let Some(name) = expect_name(lexer, dcx)? else {
        return Ok(Expr::Unrecoverable(start));
    };
    match lexer.peek()? {
        Some(Token::Group {
            delim: Delim::Brace,
            mut inner,
            ..
        }) => {
            lexer.next()?;
            let fields = Fields::named(&mut inner, dcx)?;
            Ok(Expr::Item(Box::new(Item::Union(UnionItem {
                span: Span::new(start.start, lexer.offset()),
                public: false,
                name,
                fields,
            }))))
        }
        Some(token) => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected token",
                    token.span(),
                    "Expected '{', found this instead",
                )
                .with_note("help: unions must have at least one field"),
            );
            Ok(Expr::Unrecoverable(start))
        }
        None => {
            dcx.emit(
                Diagnostic::error(
                    "Unexpected end of file",
                    lexer.eof_span(),
                    "Expected '{', found end of file instead",
                )
                .with_note("help: unions must have at least one field"),
            );
            Ok(Expr::Unrecoverable(start))
        }
    }
}

impl Fields {
    /// Parse a field list: unit (nothing), `( TyList )`, or
    /// `{ NamedFields }`.
    pub(crate) fn parse(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Fields> {
        match lexer.peek()? {
            Some(Token::Group {
                span,
                delim: Delim::Paren,
                mut inner,
            }) => {
                lexer.next()?;
                Ok(Fields::Tuple {
                    span,
                    tys: Ty::comma_separated(&mut inner, dcx)?,
                })
            }
            Some(Token::Group {
                span,
                delim: Delim::Brace,
                mut inner,
            }) => {
                lexer.next()?;
                Ok(Fields::Named {
                    span,
                    fields: Fields::named(&mut inner, dcx)?,
                })
            }
            _ => Ok(Fields::Unit {
                span: Span::point(lexer.offset()),
            }),
        }
    }

    /// Parse a comma-separated `name: ty` list until the lexer is empty.
    pub(crate) fn named(
        lexer: &mut Lexer<'_>,
        dcx: &Handler,
    ) -> FatalResult<Vec<(String, Ty)>> {
        let mut fields = Vec::new();
        while !lexer.is_empty() {
            match lexer.next()? {
                Some(Token::Ident { text, .. }) => {
                    let name = text.to_string();
                    match lexer.peek()? {
                        Some(token) if token.is_punct(":") => {
                            lexer.next()?;
                            let ty = Ty::parse(lexer, dcx)?;
                            fields.push((name, ty));
                        }
                        Some(token) => {
                            dcx.emit(Diagnostic::error(
                                "Unexpected token",
                                token.span(),
                                "Expected ':', found this instead",
                            ));
                        }
                        None => {
                            dcx.emit(Diagnostic::error(
                                "Unexpected end of file",
                                lexer.eof_span(),
                                "Expected ':', found end of file instead",
                            ));
                        }
                    }
                }
                Some(token) => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected an identifier, found this instead",
                    ));
                }
                None => break,
            }
            match lexer.peek()? {
                Some(token) if token.is_punct(",") => {
                    lexer.next()?;
                }
                Some(token) => {
                    dcx.emit(Diagnostic::error(
                        "Unexpected token",
                        token.span(),
                        "Expected ',', found this instead",
                    ));
                }
                None => {}
            }
        }
        Ok(fields)
    }
}
