//! sablec-par - Recursive-Descent Parser for the Sable Language
//!
//! This crate turns the token stream of `sablec-lex` into a typed AST.
//! Parsing is driven directly on the delimiter-aware lexer: a production
//! that needs the interior of a `()`/`[]`/`{}` region descends into the
//! group token's sub-lexer instead of tracking bracket depth itself.
//!
//! Productions are *recovering*: they emit diagnostics into a
//! [`sablec_util::Handler`] and return placeholder nodes so that a file
//! with errors still produces a full [`Items`] tree. Only lexer failures
//! abort, propagating as [`sablec_util::Fatal`].
//!
//! The entry point is [`parse_file`]:
//!
//! ```
//! use sablec_lex::Lexer;
//! use sablec_util::Handler;
//!
//! let mut lexer = Lexer::new("fn main() { }");
//! let dcx = Handler::new();
//! let items = sablec_par::parse_file(&mut lexer, &dcx).unwrap();
//!
//! assert_eq!(items.items.len(), 1);
//! assert!(!dcx.has_errors());
//! ```

pub mod ast;
mod atom;
mod edge_cases;
mod expr;
mod flow;
mod items;
mod pattern;
mod pretty;
mod stmt;
mod types;

pub use ast::*;
pub use items::parse_file;

#[cfg(test)]
mod tests {
    use sablec_lex::Lexer;
    use sablec_util::{Diagnostic, Handler};

    use crate::ast::*;
    use crate::{parse_file, stmt};

    fn parse_source(source: &str) -> (Items, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let dcx = Handler::new();
        let items = parse_file(&mut lexer, &dcx).expect("fatal error");
        (items, dcx.take())
    }

    /// Parse a single statement the way a block body would.
    fn parse_stmt(source: &str) -> (Expr, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let dcx = Handler::new();
        let expr = stmt::semi(&mut lexer, &dcx).expect("fatal error");
        (expr, dcx.take())
    }

    fn parse_expr(source: &str) -> (Expr, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let dcx = Handler::new();
        let expr = Expr::parse(&mut lexer, &dcx).expect("fatal error");
        (expr, dcx.take())
    }

    // ==================== SPAN INVARIANTS ====================

    fn children(expr: &Expr) -> Vec<&Expr> {
        match expr {
            Expr::Block(e) => e.exprs.iter().collect(),
            Expr::Tuple(e) => e.exprs.iter().collect(),
            Expr::StructInit(e) => e.fields.iter().map(|(_, expr)| expr).collect(),
            Expr::Semi(e) => vec![&e.inner],
            Expr::Binary(e) => vec![&e.lhs, &e.rhs],
            Expr::Prefix(e) => vec![&e.rhs],
            Expr::Member(e) => vec![&e.base],
            Expr::Offset(e) => vec![&e.base],
            Expr::Call(e) => std::iter::once(&e.base).chain(e.args.iter()).collect(),
            Expr::Index(e) => vec![&e.base, &e.index],
            Expr::Cast(e) => vec![&e.base],
            Expr::If(e) => {
                let mut out = vec![&e.cond, &e.then];
                out.extend(e.else_.as_ref());
                out
            }
            Expr::While(e) => vec![&e.cond, &e.body],
            Expr::For(e) => vec![&e.iter, &e.body],
            Expr::Match(e) => std::iter::once(&e.scrutinee)
                .chain(e.arms.iter().map(|(_, body)| body))
                .collect(),
            Expr::Return(e) => e.value.iter().collect(),
            Expr::Break(e) => e.value.iter().collect(),
            Expr::Let(e) => e.value.iter().chain(e.else_.iter()).collect(),
            Expr::Item(item) => item_children(item),
            _ => Vec::new(),
        }
    }

    fn item_children(item: &Item) -> Vec<&Expr> {
        match item {
            Item::Function(i) => vec![&i.body],
            Item::Static(i) => vec![&i.value],
            Item::Const(i) => vec![&i.value],
            _ => Vec::new(),
        }
    }

    fn assert_span_containment(expr: &Expr) {
        let span = expr.span();
        assert!(span.start <= span.stop, "inverted span in {expr:?}");
        for child in children(expr) {
            if !child.span().is_empty() {
                assert!(
                    span.contains_span(child.span()),
                    "child span {:?} escapes parent {:?} in {expr}",
                    child.span(),
                    span,
                );
            }
            assert_span_containment(child);
        }
    }

    #[test]
    fn test_spans_nest() {
        let sources = [
            "let x: i32 = 1 + 2 * 3;",
            "if x { y } else { z }",
            "fn f(x: i32) -> i32 { return x + 1; }",
            "a.b(c)[d] as u8",
            "match x { 1 => a, _ => b }",
            "for i in (xs) { i; }",
            "while x < 10 { x += 1; }",
        ];
        for source in sources {
            let (expr, _) = parse_stmt(source);
            assert_span_containment(&expr);
        }
    }

    // ==================== END-TO-END SCENARIOS ====================

    #[test]
    fn test_let_with_precedence() {
        let (expr, diags) = parse_stmt("let x: i32 = 1 + 2 * 3;");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Expr::Semi(semi) = expr else {
            panic!("expected Semi, got {expr:?}");
        };
        let Expr::Let(let_) = semi.inner else {
            panic!("expected Let");
        };
        assert!(matches!(&let_.pattern, Pattern::Ident(p) if p.name == "x"));
        assert!(matches!(
            let_.ty,
            Some(Ty::Int { size: 32, signed: true, .. })
        ));
        assert!(let_.else_.is_none());

        let Some(Expr::Binary(add)) = let_.value else {
            panic!("expected binary value");
        };
        assert_eq!(add.op, BinOp::Add);
        assert!(matches!(add.lhs, Expr::Int(IntExpr { value: 1, .. })));
        let Expr::Binary(mul) = add.rhs else {
            panic!("expected Mul on the right");
        };
        assert_eq!(mul.op, BinOp::Mul);
        assert!(matches!(mul.lhs, Expr::Int(IntExpr { value: 2, .. })));
        assert!(matches!(mul.rhs, Expr::Int(IntExpr { value: 3, .. })));
    }

    #[test]
    fn test_if_condition_backtracks_out_of_struct_init() {
        let (expr, diags) = parse_stmt("if x { y } else { z }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Expr::If(if_) = expr else {
            panic!("expected If, got {expr:?}");
        };
        assert!(
            matches!(&if_.cond, Expr::Ident(p) if p.name == "x"),
            "condition must not be a struct init: {:?}",
            if_.cond,
        );
        let Expr::Block(then) = &if_.then else {
            panic!("expected block then-branch");
        };
        assert!(matches!(&then.exprs[0], Expr::Ident(p) if p.name == "y"));
        let Some(Expr::Block(else_)) = &if_.else_ else {
            panic!("expected block else-branch");
        };
        assert!(matches!(&else_.exprs[0], Expr::Ident(p) if p.name == "z"));
    }

    #[test]
    fn test_valid_struct_init_condition_is_reported() {
        let (expr, diags) = parse_stmt("if Foo { a: 1 } { }");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Struct initializer not allowed here");

        let Expr::If(if_) = expr else {
            panic!("expected If");
        };
        let Expr::StructInit(init) = &if_.cond else {
            panic!("expected struct init condition");
        };
        assert_eq!(init.path.segments[0].name, "Foo");
        assert_eq!(init.fields.len(), 1);
        assert_eq!(init.fields[0].0.name, "a");
        assert!(matches!(
            init.fields[0].1,
            Expr::Int(IntExpr { value: 1, .. })
        ));
        assert!(matches!(&if_.then, Expr::Block(b) if b.exprs.is_empty()));
        assert!(if_.else_.is_none());
    }

    #[test]
    fn test_backtrack_through_binary_rhs() {
        let (expr, diags) = parse_stmt("if x == y { z } { }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Expr::If(if_) = expr else {
            panic!("expected If");
        };
        let Expr::Binary(eq) = &if_.cond else {
            panic!("expected binary condition");
        };
        assert_eq!(eq.op, BinOp::Eq);
        assert!(matches!(&eq.rhs, Expr::Ident(p) if p.name == "y"));
        assert!(matches!(&if_.then, Expr::Block(b) if b.exprs.len() == 1));
    }

    #[test]
    fn test_struct_init_behind_binary_without_errors_is_reported() {
        let (expr, diags) = parse_stmt("if x == Foo { } { }");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Struct initializer not allowed here");

        let Expr::If(if_) = expr else {
            panic!("expected If");
        };
        let Expr::Binary(eq) = &if_.cond else {
            panic!("expected binary condition");
        };
        assert!(matches!(eq.rhs, Expr::StructInit(_)));
    }

    #[test]
    fn test_invalid_prefixed_int_is_fatal() {
        let mut lexer = Lexer::new("0xZZ");
        let dcx = Handler::new();
        let err = parse_file(&mut lexer, &dcx).unwrap_err();
        assert_eq!(err.0.message, "Invalid integer literal");
    }

    #[test]
    fn test_struct_with_named_fields() {
        let (items, diags) = parse_source("struct S { x: i32, y: u8 }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(items.items.len(), 1);

        let Item::Struct(s) = &items.items[0] else {
            panic!("expected struct");
        };
        assert_eq!(s.name, "S");
        assert!(!s.public);
        let Fields::Named { fields, .. } = &s.fields else {
            panic!("expected named fields");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "x");
        assert!(matches!(
            fields[0].1,
            Ty::Int { size: 32, signed: true, .. }
        ));
        assert_eq!(fields[1].0, "y");
        assert!(matches!(
            fields[1].1,
            Ty::Int { size: 8, signed: false, .. }
        ));
    }

    #[test]
    fn test_function_with_semi_return() {
        let (items, diags) = parse_source("fn f(x: i32) -> i32 { return x + 1; }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(items.items.len(), 1);

        let Item::Function(f) = &items.items[0] else {
            panic!("expected function");
        };
        assert_eq!(f.name, "f");
        assert_eq!(f.params.len(), 1);
        assert!(matches!(&f.params[0].0, Pattern::Ident(p) if p.name == "x"));
        assert!(matches!(
            f.ret_ty,
            Some(Ty::Int { size: 32, signed: true, .. })
        ));

        let Expr::Block(body) = &f.body else {
            panic!("expected block body");
        };
        let Expr::Semi(semi) = &body.exprs[0] else {
            panic!("expected Semi statement");
        };
        let Expr::Return(ret) = &semi.inner else {
            panic!("expected return");
        };
        let Some(Expr::Binary(add)) = &ret.value else {
            panic!("expected return value");
        };
        assert_eq!(add.op, BinOp::Add);
    }

    // ==================== PRECEDENCE LAWS ====================

    #[test]
    fn test_assignment_is_right_associative() {
        let (expr, diags) = parse_expr("a = b = c");
        assert!(diags.is_empty());

        let Expr::Binary(outer) = expr else {
            panic!("expected assignment");
        };
        assert_eq!(outer.op, BinOp::Assign);
        assert!(matches!(&outer.lhs, Expr::Ident(p) if p.name == "a"));
        let Expr::Binary(inner) = outer.rhs else {
            panic!("expected nested assignment");
        };
        assert_eq!(inner.op, BinOp::Assign);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let (expr, diags) = parse_expr("a - b - c");
        assert!(diags.is_empty());

        let Expr::Binary(outer) = expr else {
            panic!("expected subtraction");
        };
        assert_eq!(outer.op, BinOp::Sub);
        let Expr::Binary(inner) = outer.lhs else {
            panic!("expected nested subtraction on the left");
        };
        assert_eq!(inner.op, BinOp::Sub);
        assert!(matches!(&outer.rhs, Expr::Ident(p) if p.name == "c"));
    }

    #[test]
    fn test_prefix_operators_nest_right() {
        let (expr, diags) = parse_expr("!-x");
        assert!(diags.is_empty());

        let Expr::Prefix(not) = expr else {
            panic!("expected prefix");
        };
        assert_eq!(not.op, PrefixOp::Not);
        let Expr::Prefix(neg) = not.rhs else {
            panic!("expected nested prefix");
        };
        assert_eq!(neg.op, PrefixOp::Neg);
        assert!(matches!(&neg.rhs, Expr::Ident(p) if p.name == "x"));
    }

    #[test]
    fn test_suffixes_fold_left() {
        let (expr, diags) = parse_expr("a.b(c)[d]");
        assert!(diags.is_empty());

        let Expr::Index(index) = expr else {
            panic!("expected index at the top, got something else");
        };
        assert!(matches!(&index.index, Expr::Ident(p) if p.name == "d"));
        let Expr::Call(call) = index.base else {
            panic!("expected call below index");
        };
        assert_eq!(call.args.len(), 1);
        let Expr::Member(member) = call.base else {
            panic!("expected member below call");
        };
        assert_eq!(member.name, "b");
        assert!(matches!(&member.base, Expr::Ident(p) if p.name == "a"));
    }

    #[test]
    fn test_shift_binds_tighter_than_compare() {
        let (expr, diags) = parse_expr("a << b < c");
        assert!(diags.is_empty());

        let Expr::Binary(lt) = expr else {
            panic!("expected comparison at the top");
        };
        assert_eq!(lt.op, BinOp::Lt);
        let Expr::Binary(shl) = lt.lhs else {
            panic!("expected shift on the left");
        };
        assert_eq!(shl.op, BinOp::Shl);
    }

    #[test]
    fn test_cast_suffix() {
        let (expr, diags) = parse_expr("x as u8 + 1");
        assert!(diags.is_empty());

        let Expr::Binary(add) = expr else {
            panic!("expected addition");
        };
        let Expr::Cast(cast) = add.lhs else {
            panic!("expected cast on the left");
        };
        assert!(matches!(cast.ty, Ty::Int { size: 8, signed: false, .. }));
    }

    #[test]
    fn test_tuple_member_index() {
        let (expr, diags) = parse_expr("t.0");
        assert!(diags.is_empty());
        let Expr::Member(member) = expr else {
            panic!("expected member access");
        };
        assert_eq!(member.name, "0");
    }

    // ==================== ITEMS ====================

    #[test]
    fn test_item_grammar() {
        let source = "\
pub fn f() { }
use a::b as c;
mod decl;
mod def { const X: i32 = 1; }
static S: u8 = 0;
pub struct T(i32, bool);
enum E { A, B(i32), C { x: i32 } }
union U { a: i32, b: f32 }
";
        let (items, diags) = parse_source(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(items.items.len(), 8);

        assert!(matches!(&items.items[0], Item::Function(f) if f.public));
        let Item::Use(use_) = &items.items[1] else {
            panic!("expected use");
        };
        assert_eq!(use_.segments, ["a", "b"]);
        assert_eq!(use_.alias.as_deref(), Some("c"));
        assert!(matches!(&items.items[2], Item::ModDecl(m) if m.name == "decl"));
        let Item::ModDef(def) = &items.items[3] else {
            panic!("expected mod def");
        };
        assert!(matches!(&def.items[0], Item::Const(_)));
        assert!(matches!(&items.items[4], Item::Static(_)));
        let Item::Struct(t) = &items.items[5] else {
            panic!("expected tuple struct");
        };
        assert!(t.public);
        assert!(matches!(&t.fields, Fields::Tuple { tys, .. } if tys.len() == 2));
        let Item::Enum(e) = &items.items[6] else {
            panic!("expected enum");
        };
        assert_eq!(e.variants.len(), 3);
        assert!(matches!(e.variants[0].1, Fields::Unit { .. }));
        assert!(matches!(&e.variants[1].1, Fields::Tuple { tys, .. } if tys.len() == 1));
        assert!(matches!(&e.variants[2].1, Fields::Named { fields, .. } if fields.len() == 1));
        let Item::Union(u) = &items.items[7] else {
            panic!("expected union");
        };
        assert_eq!(u.fields.len(), 2);
    }

    #[test]
    fn test_missing_const_type_hints() {
        let (_, diags) = parse_source("const X = 1;");
        assert!(!diags.is_empty());
        assert_eq!(diags[0].message, "Unexpected token");
        assert_eq!(
            diags[0].note.as_deref(),
            Some("hint: static and const declarations must have a known type"),
        );
    }

    #[test]
    fn test_union_requires_braces() {
        let (_, diags) = parse_source("union U;");
        assert!(diags
            .iter()
            .any(|d| d.note.as_deref() == Some("help: unions must have at least one field")));
    }

    #[test]
    fn test_expression_at_top_level_is_reported() {
        let (items, diags) = parse_source("1 + 2;");
        assert!(items.items.is_empty());
        assert!(!diags.is_empty());
        assert_eq!(diags[0].label, "Expected a declaration, found this instead");
    }

    // ==================== TYPES ====================

    #[test]
    fn test_type_grammar() {
        let source = "fn f(a: *u8, b: (i32, str), c: [bool], d: [f64; 4], e: a::B, f: Self) { }";
        let (items, diags) = parse_source(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Item::Function(f) = &items.items[0] else {
            panic!("expected function");
        };
        assert!(matches!(&f.params[0].1, Ty::Ptr { ty, .. }
            if matches!(**ty, Ty::Int { size: 8, signed: false, .. })));
        assert!(matches!(&f.params[1].1, Ty::Tuple { tys, .. } if tys.len() == 2));
        assert!(matches!(&f.params[2].1, Ty::Slice { .. }));
        assert!(matches!(&f.params[3].1, Ty::Array { size: 4, .. }));
        assert!(matches!(&f.params[4].1, Ty::Path { segments, .. } if segments.len() == 2));
        assert!(matches!(&f.params[5].1, Ty::SelfTy { .. }));
    }

    #[test]
    fn test_array_size_must_be_unsuffixed() {
        let (_, diags) = parse_stmt("let x: [u8; 4u8];");
        assert!(!diags.is_empty());
        assert_eq!(diags[0].label, "Expected an integer, found this instead");
    }

    #[test]
    fn test_unit_type() {
        let (expr, diags) = parse_stmt("let x: () = ();");
        assert!(diags.is_empty());
        let Expr::Semi(semi) = expr else {
            panic!("expected Semi");
        };
        let Expr::Let(let_) = semi.inner else {
            panic!("expected Let");
        };
        assert!(matches!(let_.ty, Some(Ty::Unit { .. })));
        assert!(matches!(let_.value, Some(Expr::Tuple(t)) if t.exprs.is_empty()));
    }

    // ==================== MATCH & PATTERNS ====================

    #[test]
    fn test_match_arms() {
        let (expr, diags) = parse_expr("match x { 1 => a, _ => b, (p, q) => c }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Expr::Match(match_) = expr else {
            panic!("expected match");
        };
        assert!(matches!(&match_.scrutinee, Expr::Ident(p) if p.name == "x"));
        assert_eq!(match_.arms.len(), 3);
        assert!(matches!(&match_.arms[0].0, Pattern::Value(v)
            if matches!(**v, Expr::Int(IntExpr { value: 1, .. }))));
        assert!(matches!(match_.arms[1].0, Pattern::Ignore(_)));
        assert!(matches!(&match_.arms[2].0, Pattern::Tuple { patterns, .. }
            if patterns.len() == 2));
    }

    #[test]
    fn test_struct_pattern() {
        let (expr, diags) = parse_expr("match x { Point { x: a, y: _ } => a }");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let Expr::Match(match_) = expr else {
            panic!("expected match");
        };
        let Pattern::Struct { path, fields, .. } = &match_.arms[0].0 else {
            panic!("expected struct pattern");
        };
        assert_eq!(path.segments[0].name, "Point");
        assert_eq!(fields.len(), 2);
        assert!(matches!(&fields[0].1, Pattern::Ident(p) if p.name == "a"));
        assert!(matches!(fields[1].1, Pattern::Ignore(_)));
    }

    #[test]
    fn test_enum_variant_pattern_is_a_value() {
        let (expr, diags) = parse_expr("match x { Color::Red => 1 }");
        assert!(diags.is_empty());
        let Expr::Match(match_) = expr else {
            panic!("expected match");
        };
        assert!(matches!(&match_.arms[0].0, Pattern::Value(v)
            if matches!(&**v, Expr::Path(p) if p.segments.len() == 2)));
    }

    // ==================== PRETTY-PRINT ROUND TRIP ====================

    #[test]
    fn test_pretty_print_fixed_point() {
        let sources = [
            "let x: i32 = 1 + 2 * 3;",
            "if x { y } else { z }",
            "fn f(x: i32) -> i32 { return x + 1; }",
            "struct S { x: i32, y: u8 }",
            "struct T(i32, bool);",
            "enum E { A, B(i32), C { x: i32 } }",
            "union U { a: i32, b: f32 }",
            "use a::b as c;",
            "mod m { const X: u8 = 0; }",
            "let p = (1, \"two\\n\", '3');",
            "a.b(c)[d] as u8",
            "match x { 1 => a, _ => { b; c } }",
            "while x < 10 { x += 1; }",
            "for i in (xs) { break; }",
            "let y = -x * !z;",
            "pub fn g() -> *u8 { p->q }",
            "let v: [f64; 3];",
            "let t = (1,);",
            "let f = 2.5f32;",
        ];
        for source in sources {
            let (expr, diags) = parse_stmt(source);
            assert!(diags.is_empty(), "{source}: unexpected diagnostics {diags:?}");

            let printed = expr.to_string();
            let (reparsed, diags) = parse_stmt(&printed);
            assert!(
                diags.is_empty(),
                "{source}: re-parse of {printed:?} produced {diags:?}",
            );
            assert_eq!(
                reparsed.to_string(),
                printed,
                "{source}: printing is not a fixed point",
            );
        }
    }
}
