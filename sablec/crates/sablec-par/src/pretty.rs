//! Pretty-printing for AST nodes.
//!
//! Every node renders back to surface syntax, fully parenthesized where
//! precedence could be ambiguous. For any source that parsed without
//! diagnostics, re-parsing the rendered form yields a structurally equal
//! tree; string and character literals re-escape through the lexer's own
//! escape set to keep that round trip closed.

use std::fmt;

use crate::ast::{
    BinaryExpr, BlockExpr, BreakExpr, CallExpr, CastExpr, CharExpr, ContinueExpr, Expr, Fields,
    FloatExpr, ForExpr, IdentExpr, IfExpr, IndexExpr, IntExpr, Item, Items, LetExpr, MatchExpr,
    MemberExpr, OffsetExpr, PathExpr, Pattern, PrefixExpr, ReturnExpr, SemiExpr, StrExpr,
    StructInitExpr, TupleExpr, Ty, WhileExpr,
};

/// Write one character, escaped if the lexer could not read it back
/// directly inside a literal delimited by `quote`.
fn write_escaped(f: &mut fmt::Formatter<'_>, c: char, quote: char) -> fmt::Result {
    match c {
        '\n' => write!(f, "\\n"),
        '\t' => write!(f, "\\t"),
        '\\' => write!(f, "\\\\"),
        '"' if quote == '"' => write!(f, "\\\""),
        '\0' => write!(f, "\\0"),
        '\r' => write!(f, "\\r"),
        '\u{8}' => write!(f, "\\b"),
        '\u{c}' => write!(f, "\\f"),
        '\u{b}' => write!(f, "\\v"),
        '\u{7}' => write!(f, "\\a"),
        c if c == quote || c.is_control() => write!(f, "\\u{{{:X}}}", c as u32),
        c => write!(f, "{c}"),
    }
}

/// Write a comma-separated list.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, list: &[T]) -> fmt::Result {
    for (i, entry) in list.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{entry}")?;
    }
    Ok(())
}

impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for IdentExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for StrExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.value.chars() {
            write_escaped(f, c, '"')?;
        }
        write!(f, "\"")
    }
}

impl fmt::Display for CharExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'")?;
        write_escaped(f, self.value, '\'')?;
        write!(f, "'")
    }
}

impl fmt::Display for IntExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FloatExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exprs.is_empty() {
            write!(f, "{{ }}")
        } else if self.exprs.len() > 2 {
            write!(f, "{{\n    ")?;
            for (i, expr) in self.exprs.iter().enumerate() {
                if i > 0 {
                    write!(f, "\n    ")?;
                }
                write!(f, "{expr}")?;
            }
            write!(f, "\n}}")
        } else {
            write!(f, "{{ ")?;
            for (i, expr) in self.exprs.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{expr}")?;
            }
            write!(f, " }}")
        }
    }
}

impl fmt::Display for TupleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_list(f, &self.exprs)?;
        if self.exprs.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for StructInitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.path)?;
        for (i, (name, expr)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {name}: {expr}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for SemiExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.inner)
    }
}

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op.as_str(), self.rhs)
    }
}

impl fmt::Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op.as_str(), self.rhs)
    }
}

impl fmt::Display for MemberExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}).{}", self.base, self.name)
    }
}

impl fmt::Display for OffsetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})->{}", self.base, self.name)
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})(", self.base)?;
        write_list(f, &self.args)?;
        write!(f, ")")
    }
}

impl fmt::Display for IndexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})[{}]", self.base, self.index)
    }
}

impl fmt::Display for CastExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} as {})", self.base, self.ty)
    }
}

impl fmt::Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.else_ {
            Some(else_) => write!(f, "(if {} {} else {})", self.cond, self.then, else_),
            None => write!(f, "(if {} {})", self.cond, self.then),
        }
    }
}

impl fmt::Display for WhileExpr {
    // The condition is re-parenthesized: `while` does not run the
    // struct-literal backtrack, so a bare path before `{` would read
    // back as an initializer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(while ({}) {})", self.cond, self.body)
    }
}

impl fmt::Display for ForExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(for {} in ({}) {})", self.pattern, self.iter, self.body)
    }
}

impl fmt::Display for MatchExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(match {} {{ ", self.scrutinee)?;
        for (i, (pattern, body)) in self.arms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pattern} => {body}")?;
        }
        write!(f, " }})")
    }
}

impl fmt::Display for ReturnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value}"),
            None => write!(f, "return"),
        }
    }
}

impl fmt::Display for BreakExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "break {value}"),
            None => write!(f, "break"),
        }
    }
}

impl fmt::Display for ContinueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "continue")
    }
}

impl fmt::Display for LetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {}", self.pattern)?;
        if let Some(ty) = &self.ty {
            write!(f, ": {ty}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        if let Some(else_) = &self.else_ {
            write!(f, " else {else_}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(e) => e.fmt(f),
            Expr::Path(e) => e.fmt(f),
            Expr::Str(e) => e.fmt(f),
            Expr::Char(e) => e.fmt(f),
            Expr::Int(e) => e.fmt(f),
            Expr::Float(e) => e.fmt(f),
            Expr::Block(e) => e.fmt(f),
            Expr::Tuple(e) => e.fmt(f),
            Expr::StructInit(e) => e.fmt(f),
            Expr::Unrecoverable(_) => write!(f, "{{error}}"),
            Expr::Semi(e) => e.fmt(f),
            Expr::Binary(e) => e.fmt(f),
            Expr::Prefix(e) => e.fmt(f),
            Expr::Member(e) => e.fmt(f),
            Expr::Offset(e) => e.fmt(f),
            Expr::Call(e) => e.fmt(f),
            Expr::Index(e) => e.fmt(f),
            Expr::Cast(e) => e.fmt(f),
            Expr::If(e) => e.fmt(f),
            Expr::While(e) => e.fmt(f),
            Expr::For(e) => e.fmt(f),
            Expr::Match(e) => e.fmt(f),
            Expr::Return(e) => e.fmt(f),
            Expr::Break(e) => e.fmt(f),
            Expr::Continue(e) => e.fmt(f),
            Expr::Let(e) => e.fmt(f),
            Expr::Item(item) => item.fmt(f),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.public() {
            write!(f, "pub ")?;
        }
        match self {
            Item::Function(item) => {
                write!(f, "fn {}(", item.name)?;
                for (i, (pattern, ty)) in item.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{pattern}: {ty}")?;
                }
                write!(f, ")")?;
                if let Some(ret_ty) = &item.ret_ty {
                    write!(f, " -> {ret_ty}")?;
                }
                write!(f, " {}", item.body)
            }
            Item::Use(item) => {
                write!(f, "use ")?;
                for (i, segment) in item.segments.iter().enumerate() {
                    if i > 0 {
                        write!(f, "::")?;
                    }
                    write!(f, "{segment}")?;
                }
                if let Some(alias) = &item.alias {
                    write!(f, " as {alias}")?;
                }
                Ok(())
            }
            Item::ModDecl(item) => write!(f, "mod {}", item.name),
            Item::ModDef(item) => {
                writeln!(f, "mod {} {{", item.name)?;
                for inner in &item.items {
                    writeln!(f, "{inner}")?;
                }
                write!(f, "}}")
            }
            Item::Static(item) => {
                write!(f, "static {}: {} = {}", item.name, item.ty, item.value)
            }
            Item::Const(item) => {
                write!(f, "const {}: {} = {}", item.name, item.ty, item.value)
            }
            Item::Struct(item) => {
                let sep = if matches!(item.fields, Fields::Named { .. }) {
                    " "
                } else {
                    ""
                };
                write!(f, "struct {}{}{}", item.name, sep, item.fields)
            }
            Item::Enum(item) => {
                writeln!(f, "enum {} {{", item.name)?;
                for (i, (name, fields)) in item.variants.iter().enumerate() {
                    if i > 0 {
                        writeln!(f, ",")?;
                    }
                    let sep = if matches!(fields, Fields::Named { .. }) {
                        " "
                    } else {
                        ""
                    };
                    write!(f, "{name}{sep}{fields}")?;
                }
                write!(f, "\n}}")
            }
            Item::Union(item) => {
                write!(f, "union {} {{ ", item.name)?;
                for (i, (name, ty)) in item.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fields::Unit { .. } => Ok(()),
            Fields::Tuple { tys, .. } => {
                write!(f, "(")?;
                write_list(f, tys)?;
                write!(f, ")")
            }
            Fields::Named { fields, .. } => {
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Ident(ident) => ident.fmt(f),
            Pattern::Ignore(_) => write!(f, "_"),
            Pattern::Tuple { patterns, .. } => {
                write!(f, "(")?;
                write_list(f, patterns)?;
                if patterns.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Pattern::Struct { path, fields, .. } => {
                write!(f, "{path} {{ ")?;
                for (i, (name, pattern)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {pattern}")?;
                }
                write!(f, " }}")
            }
            Pattern::Value(expr) => expr.fmt(f),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int { size, signed, .. } => {
                write!(f, "{}{}", if *signed { 'i' } else { 'u' }, size)
            }
            Ty::Size { signed, .. } => {
                write!(f, "{}", if *signed { "isize" } else { "usize" })
            }
            Ty::Float { size, .. } => write!(f, "f{size}"),
            Ty::Str { .. } => write!(f, "str"),
            Ty::Bool { .. } => write!(f, "bool"),
            Ty::Char { .. } => write!(f, "char"),
            Ty::SelfTy { .. } => write!(f, "Self"),
            Ty::Unit { .. } => write!(f, "()"),
            Ty::Ptr { ty, .. } => write!(f, "*{ty}"),
            Ty::Tuple { tys, .. } => {
                write!(f, "(")?;
                write_list(f, tys)?;
                write!(f, ")")
            }
            Ty::Array { ty, size, .. } => write!(f, "[{ty}; {size}]"),
            Ty::Slice { ty, .. } => write!(f, "[{ty}]"),
            Ty::Path { segments, .. } => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        write!(f, "::")?;
                    }
                    write!(f, "{segment}")?;
                }
                Ok(())
            }
            Ty::Unrecoverable { .. } => write!(f, "{{error}}"),
        }
    }
}
