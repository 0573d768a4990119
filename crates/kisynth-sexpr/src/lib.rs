//! S-expression trees for KiCad design files.
//!
//! Documents are assembled as [`Sexpr`] trees (usually through [`ListBuilder`]
//! and [`kv`]) and turned into text with [`formatter::format_tree`], which
//! applies KiCad's own indentation rules. [`parse`] reads text back into a
//! tree so generated files can be inspected structurally.

pub mod formatter;

use std::fmt;

/// One node of an S-expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// Unquoted atom such as `smd` or `F.Cu`.
    Symbol(String),
    /// Quoted text.
    Str(String),
    Int(i64),
    /// Written with at most six decimals, see [`formatter::format_number`].
    Float(f64),
    List(Vec<Sexpr>),
}

impl Sexpr {
    pub fn symbol(s: impl Into<String>) -> Self {
        Sexpr::Symbol(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Sexpr::Str(s.into())
    }

    pub fn int(n: i64) -> Self {
        Sexpr::Int(n)
    }

    pub fn float(f: f64) -> Self {
        Sexpr::Float(f)
    }

    pub fn list(items: Vec<Sexpr>) -> Self {
        Sexpr::List(items)
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Sexpr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Sexpr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of an int or float atom.
    ///
    /// KiCad writes whole millimetre values without a decimal point, so
    /// coordinates come back as either kind.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Sexpr::Int(n) => Some(n as f64),
            Sexpr::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Sexpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Leading symbol of a `(tag ...)` list.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_sym()
    }

    /// Direct children that are lists tagged `name`.
    pub fn children<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [Sexpr]> {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |item| item.tag() == Some(name))
            .filter_map(Sexpr::as_list)
    }

    /// First direct child list tagged `name`.
    pub fn find_list(&self, name: &str) -> Option<&[Sexpr]> {
        self.children(name).next()
    }

    pub fn find_all_lists(&self, name: &str) -> Vec<&[Sexpr]> {
        self.children(name).collect()
    }
}

/// `(key value)`
pub fn kv<K: Into<String>, V: Into<Sexpr>>(k: K, v: V) -> Sexpr {
    Sexpr::list(vec![Sexpr::symbol(k), v.into()])
}

/// Incremental construction of a tagged list.
///
/// The pushing methods borrow the builder, so bind it first:
///
/// ```
/// use kisynth_sexpr::{ListBuilder, kv};
///
/// let mut via = ListBuilder::node("via");
/// via.push(kv("size", 1.2)).push_if(false, kv("free", true));
/// assert_eq!(via.build().to_string(), "(via\n\t(size 1.2)\n)");
/// ```
#[derive(Debug, Default)]
pub struct ListBuilder {
    items: Vec<Sexpr>,
}

impl ListBuilder {
    pub fn node(name: &str) -> Self {
        Self {
            items: vec![Sexpr::symbol(name)],
        }
    }

    pub fn push<V: Into<Sexpr>>(&mut self, v: V) -> &mut Self {
        self.items.push(v.into());
        self
    }

    pub fn push_opt<V: Into<Sexpr>>(&mut self, value: Option<V>) -> &mut Self {
        self.items.extend(value.map(Into::into));
        self
    }

    pub fn push_if<V: Into<Sexpr>>(&mut self, cond: bool, v: V) -> &mut Self {
        if cond {
            self.items.push(v.into());
        }
        self
    }

    pub fn extend<I, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Sexpr>,
    {
        self.items.extend(iter.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Sexpr {
        Sexpr::List(self.items)
    }
}

/// Bare strings become symbols; use [`Sexpr::string`] for quoted text.
impl From<&str> for Sexpr {
    fn from(s: &str) -> Self {
        Sexpr::symbol(s)
    }
}

impl From<String> for Sexpr {
    fn from(s: String) -> Self {
        Sexpr::Symbol(s)
    }
}

impl From<i64> for Sexpr {
    fn from(n: i64) -> Self {
        Sexpr::Int(n)
    }
}

impl From<u32> for Sexpr {
    fn from(n: u32) -> Self {
        Sexpr::Int(i64::from(n))
    }
}

impl From<usize> for Sexpr {
    fn from(n: usize) -> Self {
        Sexpr::Int(n as i64)
    }
}

impl From<f64> for Sexpr {
    fn from(n: f64) -> Self {
        Sexpr::Float(n)
    }
}

/// `yes` / `no`, KiCad's boolean atoms.
impl From<bool> for Sexpr {
    fn from(b: bool) -> Self {
        Sexpr::symbol(if b { "yes" } else { "no" })
    }
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = formatter::format_tree(self, formatter::FormatMode::Normal);
        f.write_str(formatted.trim_end_matches('\n'))
    }
}

/// What went wrong while reading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedEnd,
    UnbalancedClose,
    UnterminatedString,
    TrailingInput,
}

/// A parse failure and the byte offset it was detected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ParseErrorKind::UnexpectedEnd => "unexpected end of input",
            ParseErrorKind::UnbalancedClose => "unbalanced `)`",
            ParseErrorKind::UnterminatedString => "unterminated string",
            ParseErrorKind::TrailingInput => "input continues after the expression",
        };
        write!(f, "{what} at byte {}", self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Parse exactly one expression; only whitespace and `;` comments may follow.
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    log::trace!("parsing {} bytes of S-expression text", input.len());
    let mut reader = Reader { src: input, at: 0 };
    let tree = reader.read()?;
    reader.skip_blank();
    if reader.at < input.len() {
        return Err(reader.error(ParseErrorKind::TrailingInput));
    }
    Ok(tree)
}

/// Byte cursor over the input. Lists are read with an explicit stack so deep
/// nesting cannot overflow the call stack.
struct Reader<'a> {
    src: &'a str,
    at: usize,
}

impl Reader<'_> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.at,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.at).copied()
    }

    fn skip_blank(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b';' => {
                    let rest = &self.src[self.at..];
                    self.at += rest.find('\n').unwrap_or(rest.len());
                }
                b if b.is_ascii_whitespace() => self.at += 1,
                _ => break,
            }
        }
    }

    fn read(&mut self) -> Result<Sexpr, ParseError> {
        let mut open: Vec<Vec<Sexpr>> = Vec::new();
        loop {
            self.skip_blank();
            let node = match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                Some(b'(') => {
                    self.at += 1;
                    open.push(Vec::new());
                    continue;
                }
                Some(b')') => {
                    let items = open
                        .pop()
                        .ok_or_else(|| self.error(ParseErrorKind::UnbalancedClose))?;
                    self.at += 1;
                    Sexpr::List(items)
                }
                Some(b'"') => self.read_string()?,
                Some(_) => self.read_atom(),
            };
            match open.last_mut() {
                Some(parent) => parent.push(node),
                None => return Ok(node),
            }
        }
    }

    fn read_string(&mut self) -> Result<Sexpr, ParseError> {
        let start = self.at;
        let mut text = String::new();
        let mut chars = self.src[start + 1..].char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.at = start + 1 + idx + 1;
                    return Ok(Sexpr::Str(text));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, other)) => text.push(other),
                    None => break,
                },
                _ => text.push(ch),
            }
        }
        Err(ParseError {
            kind: ParseErrorKind::UnterminatedString,
            offset: start,
        })
    }

    fn read_atom(&mut self) -> Sexpr {
        let rest = &self.src[self.at..];
        let len = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '(' || c == ')' || c == '"')
            .unwrap_or(rest.len());
        let atom = &rest[..len];
        self.at += len;

        // `inf` and `nan` are symbols, not floats
        let numeric = atom.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if !numeric {
            return Sexpr::symbol(atom);
        }
        if let Ok(n) = atom.parse::<i64>() {
            Sexpr::Int(n)
        } else if let Ok(f) = atom.parse::<f64>() {
            Sexpr::Float(f)
        } else {
            Sexpr::symbol(atom)
        }
    }
}
