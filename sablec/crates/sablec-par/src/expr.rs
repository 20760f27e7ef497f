//! Expression parsing - the precedence ladder.
//!
//! Each level parses its operands by calling the next-tighter level and
//! folds operators left to right; assignment folds right. The full chain,
//! loosest first:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | assign | `=` `+=` `-=` `*=` `/=` `%=` `&=` `\|=` `^=` `<<=` `>>=` | Right |
//! | logical or | `\|\|` | Left |
//! | logical and | `&&` | Left |
//! | compare | `==` `!=` `<` `<=` `>` `>=` | Left |
//! | bit or | `\|` | Left |
//! | bit xor | `^` | Left |
//! | bit and | `&` | Left |
//! | shift | `<<` `>>` | Left |
//! | term | `+` `-` | Left |
//! | factor | `*` `/` `%` | Left |
//! | prefix | unary `-` `!` `+` `*` `&` | Right |
//! | suffix | `.name` `->name` `(args)` `[index]` `as ty` | Left |
//!
//! Entry is [`Expr::parse`], which starts at the item level so that
//! declarations, control flow, and `let` all live in expression position.

use sablec_lex::{Delim, Lexer, Token};
use sablec_util::{Diagnostic, Fatal, FatalResult, Handler, Span};

use crate::ast::{
    BinOp, BinaryExpr, CallExpr, CastExpr, Expr, IndexExpr, MemberExpr, OffsetExpr, PrefixExpr,
    PrefixOp,
};
use crate::{atom, items, Ty};

impl Expr {
    /// Parse a full expression, declarations included.
    pub fn parse(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
        items::item(lexer, dcx)
    }

    /// Parse comma-separated expressions until the lexer runs out.
    ///
    /// Anything other than a comma between expressions is fatal: this is
    /// only called on the interior of a delimited group, where the bound
    /// of the list is the group itself.
    pub(crate) fn comma_separated(
        lexer: &mut Lexer<'_>,
        dcx: &Handler,
    ) -> FatalResult<Vec<Expr>> {
        let mut exprs = Vec::new();
        while !lexer.is_empty() {
            exprs.push(Expr::parse(lexer, dcx)?);
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
        Ok(exprs)
    }
}

type Level = fn(&mut Lexer<'_>, &Handler) -> FatalResult<Expr>;

/// Fold one left-associative level of binary operators.
fn binary_level(
    lexer: &mut Lexer<'_>,
    dcx: &Handler,
    ops: &[(&str, BinOp)],
    next: Level,
) -> FatalResult<Expr> {
    let mut expr = next(lexer, dcx)?;
    'fold: loop {
        let token = match lexer.peek()? {
            Some(token) => token,
            None => break,
        };
        for &(text, op) in ops {
            if token.is_punct(text) {
                lexer.next()?;
                let rhs = next(lexer, dcx)?;
                let span = Span::new(expr.span().start, lexer.offset());
                expr = Expr::Binary(Box::new(BinaryExpr {
                    span,
                    op,
                    lhs: expr,
                    rhs,
                }));
                continue 'fold;
            }
        }
        break;
    }
    Ok(expr)
}

/// Entry into the binary ladder, at the assignment level.
pub(crate) fn binary(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    assign(lexer, dcx)
}

const ASSIGN_OPS: &[(&str, BinOp)] = &[
    ("=", BinOp::Assign),
    ("+=", BinOp::AddAssign),
    ("-=", BinOp::SubAssign),
    ("*=", BinOp::MulAssign),
    ("/=", BinOp::DivAssign),
    ("%=", BinOp::ModAssign),
    ("&=", BinOp::BitAndAssign),
    ("|=", BinOp::BitOrAssign),
    ("^=", BinOp::BitXorAssign),
    ("<<=", BinOp::ShlAssign),
    (">>=", BinOp::ShrAssign),
];

/// Assignments associate to the right: `a = b = c` is `a = (b = c)`.
fn assign(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let mut expr = logical_or(lexer, dcx)?;
    'fold: loop {
        let token = match lexer.peek()? {
            Some(token) => token,
            None => break,
        };
        for &(text, op) in ASSIGN_OPS {
            if token.is_punct(text) {
                lexer.next()?;
                let rhs = assign(lexer, dcx)?;
                let span = Span::new(expr.span().start, lexer.offset());
                expr = Expr::Binary(Box::new(BinaryExpr {
                    span,
                    op,
                    lhs: expr,
                    rhs,
                }));
                continue 'fold;
            }
        }
        break;
    }
    Ok(expr)
}

fn logical_or(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(lexer, dcx, &[("||", BinOp::Or)], logical_and)
}

fn logical_and(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(lexer, dcx, &[("&&", BinOp::And)], compare)
}

fn compare(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(
        lexer,
        dcx,
        &[
            ("==", BinOp::Eq),
            ("!=", BinOp::Ne),
            ("<", BinOp::Lt),
            ("<=", BinOp::Le),
            (">", BinOp::Gt),
            (">=", BinOp::Ge),
        ],
        bit_or,
    )
}

fn bit_or(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(lexer, dcx, &[("|", BinOp::BitOr)], bit_xor)
}

fn bit_xor(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(lexer, dcx, &[("^", BinOp::BitXor)], bit_and)
}

fn bit_and(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(lexer, dcx, &[("&", BinOp::BitAnd)], shift)
}

fn shift(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(
        lexer,
        dcx,
        &[("<<", BinOp::Shl), (">>", BinOp::Shr)],
        term,
    )
}

fn term(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(
        lexer,
        dcx,
        &[("+", BinOp::Add), ("-", BinOp::Sub)],
        factor,
    )
}

fn factor(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    binary_level(
        lexer,
        dcx,
        &[("*", BinOp::Mul), ("/", BinOp::Div), ("%", BinOp::Mod)],
        prefix,
    )
}

/// Unary prefix operators; they bind tighter than any binary operator
/// and nest to the right.
fn prefix(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let op = match lexer.peek()? {
        Some(token) if token.is_punct("-") => PrefixOp::Neg,
        Some(token) if token.is_punct("!") => PrefixOp::Not,
        Some(token) if token.is_punct("+") => PrefixOp::Pos,
        Some(token) if token.is_punct("*") => PrefixOp::Deref,
        Some(token) if token.is_punct("&") => PrefixOp::Ref,
        _ => return suffix(lexer, dcx),
    };
    let start = match lexer.next()? {
        Some(token) => token.span().start,
        None => lexer.offset(),
    };
    let rhs = prefix(lexer, dcx)?;
    Ok(Expr::Prefix(Box::new(PrefixExpr {
        span: Span::new(start, lexer.offset()),
        op,
        rhs,
    })))
}

/// Suffix operators: member access, pointer member access, calls,
/// indexing, and casts.
fn suffix(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Expr> {
    let mut expr = atom::atom(lexer, dcx)?;
    loop {
        let token = match lexer.peek()? {
            Some(token) => token,
            None => break,
        };
        match token {
            Token::Punct { text: ".", .. } => {
                lexer.next()?;
                let name = match member_name(lexer, dcx)? {
                    Some(name) => name,
                    None => continue,
                };
                expr = Expr::Member(Box::new(MemberExpr {
                    span: Span::new(expr.span().start, lexer.offset()),
                    base: expr,
                    name,
                }));
            }
            Token::Punct { text: "->", .. } => {
                lexer.next()?;
                let name = match member_name(lexer, dcx)? {
                    Some(name) => name,
                    None => continue,
                };
                expr = Expr::Offset(Box::new(OffsetExpr {
                    span: Span::new(expr.span().start, lexer.offset()),
                    base: expr,
                    name,
                }));
            }
            Token::Group {
                delim: Delim::Paren,
                mut inner,
                ..
            } => {
                lexer.next()?;
                let args = Expr::comma_separated(&mut inner, dcx)?;
                if !inner.is_empty() {
                    dcx.emit(Diagnostic::error(
                        "Unexpected tokens",
                        Span::new(inner.offset(), inner.end()),
                        "Expected a closing bracket, found these tokens instead",
                    ));
                }
                expr = Expr::Call(Box::new(CallExpr {
                    span: Span::new(expr.span().start, lexer.offset()),
                    base: expr,
                    args,
                }));
            }
            Token::Group {
                delim: Delim::Bracket,
                mut inner,
                ..
            } => {
                lexer.next()?;
                let index = Expr::parse(&mut inner, dcx)?;
                if !inner.is_empty() {
                    dcx.emit(Diagnostic::error(
                        "Unexpected tokens",
                        Span::new(inner.offset(), inner.end()),
                        "Expected a closing bracket, found these tokens instead",
                    ));
                }
                expr = Expr::Index(Box::new(IndexExpr {
                    span: Span::new(expr.span().start, lexer.offset()),
                    base: expr,
                    index,
                }));
            }
            token if token.is_ident("as") => {
                lexer.next()?;
                let ty = Ty::parse(lexer, dcx)?;
                expr = Expr::Cast(Box::new(CastExpr {
                    span: Span::new(expr.span().start, lexer.offset()),
                    base: expr,
                    ty,
                }));
            }
            _ => break,
        }
    }
    Ok(expr)
}

/// Read the name after `.` or `->`: an identifier or an unsuffixed
/// integer (tuple index). On anything else the offending token is
/// consumed and reported, and `None` tells the caller to keep folding.
fn member_name(lexer: &mut Lexer<'_>, dcx: &Handler) -> FatalResult<Option<String>> {
    match lexer.next()? {
        Some(Token::Ident { span, .. })
        | Some(Token::Int {
            span,
            suffix: None,
            ..
        }) => Ok(Some(lexer.text(span).to_string())),
        Some(token) => {
            dcx.emit(Diagnostic::error(
                "Unexpected token",
                token.span(),
                "Expected an identifier or integer, found this instead",
            ));
            Ok(None)
        }
        None => {
            dcx.emit(Diagnostic::error(
                "Unexpected end of file",
                lexer.eof_span(),
                "Expected an identifier or integer, found end of file instead",
            ));
            Ok(None)
        }
    }
}
