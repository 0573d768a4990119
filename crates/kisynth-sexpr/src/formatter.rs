//! Text output for S-expression trees.
//!
//! Trees are first written on a single line by [`format_tree`] and then
//! re-flowed by [`prettify`], which follows the rules of KiCad's own
//! `Prettify()` so generated files diff cleanly against files saved by KiCad:
//! tab indentation, one child list per line, `(xy ..)` runs kept on one line,
//! and optionally short text-property lists (`font`, `stroke`, ...) kept inline.

use crate::Sexpr;

/// Column after which consecutive atoms wrap onto a new line.
const TOKEN_WRAP_COLUMN: usize = 72;
/// Column after which a run of `(xy ..)` points wraps.
const XY_WRAP_COLUMN: usize = 99;
/// Digits kept after the decimal point for floats (KiCad stores nanometres).
const FLOAT_DECIMALS: usize = 6;

const SHORT_FORM_TOKENS: &[&[u8]] = &[
    b"font",
    b"stroke",
    b"fill",
    b"teardrop",
    b"offset",
    b"rotate",
    b"scale",
];

/// Formatting modes from KiCad's `KICAD_FORMAT::FORMAT_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    #[default]
    Normal,
    /// Keep `font`/`stroke`/`fill`-style lists on a single line.
    CompactTextProperties,
}

/// Format an S-expression tree through the KiCad-style prettifier.
///
/// The returned string includes a trailing newline.
pub fn format_tree(sexpr: &Sexpr, mode: FormatMode) -> String {
    let mut raw = String::new();
    write_compact(sexpr, &mut raw);
    prettify(&raw, mode)
}

/// Format a millimetre value the way KiCad writes it: fixed precision with
/// trailing zeros removed and no negative zero.
pub fn format_number(value: f64) -> String {
    let mut s = format!("{value:.FLOAT_DECIMALS$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn write_compact(sexpr: &Sexpr, out: &mut String) {
    match sexpr {
        Sexpr::Symbol(s) => out.push_str(s),
        Sexpr::Str(s) => out.push_str(&quote_string(s)),
        Sexpr::Int(n) => out.push_str(&n.to_string()),
        Sexpr::Float(f) => out.push_str(&format_number(*f)),
        Sexpr::List(items) => {
            out.push('(');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_compact(item, out);
            }
            out.push(')');
        }
    }
}

/// Quote a string value, escaping special characters.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Re-flow single-line S-expression text using KiCad's layout rules.
pub fn prettify(source: &str, mode: FormatMode) -> String {
    let mut state = Prettifier::new(source.as_bytes(), mode);
    state.run();
    state.finish()
}

/// Character-stream state for [`prettify`].
struct Prettifier<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    compact_text: bool,
    depth: usize,
    column: usize,
    last_significant: u8,
    in_quote: bool,
    backslashes: usize,
    space_emitted: bool,
    multi_line: bool,
    in_xy: bool,
    /// Depth at which the current short-form list opened.
    short_form: Option<usize>,
}

impl<'a> Prettifier<'a> {
    fn new(src: &'a [u8], mode: FormatMode) -> Self {
        Self {
            src,
            out: Vec::with_capacity(src.len() + src.len() / 4),
            compact_text: mode == FormatMode::CompactTextProperties,
            depth: 0,
            column: 0,
            last_significant: 0,
            in_quote: false,
            backslashes: 0,
            space_emitted: false,
            multi_line: false,
            in_xy: false,
            short_form: None,
        }
    }

    fn run(&mut self) {
        for (i, &ch) in self.src.iter().enumerate() {
            if is_whitespace(ch) && !self.in_quote {
                self.whitespace(next_significant(self.src, i + 1));
                continue;
            }

            self.space_emitted = false;
            match ch {
                b'(' if !self.in_quote => self.open(i),
                b')' if !self.in_quote => self.close(),
                _ => self.atom_byte(ch),
            }
            self.last_significant = ch;
        }
    }

    fn whitespace(&mut self, next: u8) {
        if self.space_emitted
            || self.depth == 0
            || self.last_significant == b'('
            || next == b')'
            || next == b'('
        {
            return;
        }

        if self.in_xy || self.column < TOKEN_WRAP_COLUMN {
            self.out.push(b' ');
            self.column += 1;
        } else if self.short_form.is_some() {
            self.out.push(b' ');
        } else {
            self.newline(self.depth);
            self.multi_line = true;
        }
        self.space_emitted = true;
    }

    fn open(&mut self, i: usize) {
        let is_xy = self.src[i..].starts_with(b"(xy ");
        let is_short = self.compact_text && SHORT_FORM_TOKENS.contains(&token_after(self.src, i));

        if self.out.is_empty() {
            self.out.push(b'(');
            self.column += 1;
        } else if (self.in_xy && is_xy && self.column < XY_WRAP_COLUMN) || self.short_form.is_some()
        {
            self.out.extend_from_slice(b" (");
            self.column += 2;
        } else {
            self.newline(self.depth);
            self.out.push(b'(');
            self.column += 1;
        }

        self.in_xy = is_xy;
        if is_short && self.short_form.is_none() {
            self.short_form = Some(self.depth);
        }
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);

        if self.short_form.is_some() {
            self.out.push(b')');
            self.column += 1;
        } else if self.last_significant == b')' || self.multi_line {
            self.newline(self.depth);
            self.out.push(b')');
            self.column += 1;
            self.multi_line = false;
        } else {
            self.out.push(b')');
            self.column += 1;
        }

        if self.short_form == Some(self.depth) {
            self.short_form = None;
        }
    }

    fn atom_byte(&mut self, ch: u8) {
        if ch == b'\\' {
            self.backslashes += 1;
        } else {
            if ch == b'"' && self.backslashes % 2 == 0 {
                self.in_quote = !self.in_quote;
            }
            self.backslashes = 0;
        }
        self.out.push(ch);
        self.column += 1;
    }

    fn newline(&mut self, depth: usize) {
        self.out.push(b'\n');
        self.out.extend(std::iter::repeat_n(b'\t', depth));
        self.column = depth;
    }

    fn finish(mut self) -> String {
        // POSIX newline at EOF.
        self.out.push(b'\n');
        // Only ASCII bytes are inserted and multi-byte sequences are copied whole.
        String::from_utf8(self.out)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}

fn next_significant(bytes: &[u8], idx: usize) -> u8 {
    bytes
        .get(idx..)
        .and_then(|rest| rest.iter().copied().find(|&ch| !is_whitespace(ch)))
        .unwrap_or(0)
}

fn token_after(bytes: &[u8], open: usize) -> &[u8] {
    let start = open + 1;
    let len = bytes[start..]
        .iter()
        .take_while(|ch| ch.is_ascii_alphabetic())
        .count();
    &bytes[start..start + len]
}
