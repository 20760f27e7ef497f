//! Terminal rendering for diagnostics.
//!
//! [`render`] turns a [`Diagnostic`] plus the source buffer into an
//! annotated snippet:
//!
//! ```text
//!   ╭─[3:9] Error: Unexpected token
//! 3 │ let x = ;
//!   ┆         ┬
//!   ┆         ╰─ Expected an expression, found this instead
//! ──╯
//! ```
//!
//! Color is carried by a [`Palette`]; the plain palette produces the same
//! layout byte-for-byte minus the escape codes, which is what the tests
//! compare against.

use super::Diagnostic;

/// ANSI codes used by the renderer.
///
/// `gutter` paints the frame, `error` the header tag, underline, and
/// pointer, `note` the note block and its highlighted prefix.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub error: &'static str,
    pub gutter: &'static str,
    pub note: &'static str,
    pub reset: &'static str,
}

impl Palette {
    /// The palette used for terminal output.
    pub const fn colored() -> Self {
        Self {
            error: "\x1b[1;31m",
            gutter: "\x1b[0;30m",
            note: "\x1b[0;32m",
            reset: "\x1b[0m",
        }
    }

    /// A palette that emits no escape codes at all.
    pub const fn plain() -> Self {
        Self {
            error: "",
            gutter: "",
            note: "",
            reset: "",
        }
    }
}

/// Compute the 1-based line and character column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// Render a diagnostic against its source buffer.
///
/// Only single-line spans get a source snippet; a span crossing a line
/// boundary renders the header and pointer rows alone.
pub fn render(source: &str, diagnostic: &Diagnostic, palette: &Palette) -> String {
    let g = palette.gutter;
    let e = palette.error;
    let n = palette.note;
    let r = palette.reset;

    let start = diagnostic.span.start.min(source.len());
    let stop = diagnostic.span.stop.min(source.len()).max(start);
    let (line, col) = line_col(source, start);

    if source[start..stop].contains('\n') {
        return format!(
            "{g}╭─{r}{e}[{line}:{col}] Error:{r} {}\n{e}╰─ {}{r}\n",
            diagnostic.message, diagnostic.label,
        );
    }

    // Locate the line and dedent it to its first non-whitespace character.
    let mut line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    while line_start < start && matches!(source.as_bytes()[line_start], b' ' | b'\t') {
        line_start += 1;
    }
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);
    let line_text = &source[line_start..line_end];

    let leading = " ".repeat(source[line_start..start].chars().count());
    let width = source[start..stop].chars().count().saturating_sub(1);
    let left = width / 2;
    let right = width - left;

    let underline = format!("{leading}{}┬{}", "─".repeat(left), "─".repeat(right));
    let pointer = format!("{leading}{}╰─ {}", " ".repeat(left), diagnostic.label);

    let line_num = line.to_string();
    let pad = " ".repeat(line_num.len() + 1);
    let rule = "─".repeat(line_num.len() + 1);

    let mut out = String::new();
    out.push_str(&format!(
        "{g}{pad}╭─{r}{e}[{line}:{col}] Error:{r} {}\n",
        diagnostic.message
    ));
    out.push_str(&format!("{g}{line_num} │ {r}{line_text}\n"));
    out.push_str(&format!("{g}{pad}┆ {r}{e}{underline}{r}\n"));
    out.push_str(&format!("{g}{pad}┆ {r}{e}{pointer}{r}\n"));

    match &diagnostic.note {
        None => out.push_str(&format!("{g}{rule}╯{r}\n")),
        Some(note) => {
            // Highlight the note up to its first colon.
            let highlighted = match note.find(':') {
                Some(i) => format!("{n}{}{r}{}", &note[..=i], &note[i + 1..]),
                None => note.clone(),
            };
            out.push_str(&format!("{g}{pad}┆{r}\n"));
            out.push_str(&format!("{n}{pad}│ {r}{highlighted}\n"));
            out.push_str(&format!("{n}{rule}╯ {r}\n"));
        }
    }
    out
}
