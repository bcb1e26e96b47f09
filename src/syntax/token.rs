//! Lexical tokens with their leading formatting.

use std::borrow::Cow;

use smol_str::SmolStr;

/// Semantic type of a token.
///
/// Bare atoms are classified opportunistically: integer first, then
/// floating point, then plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// A double-quoted string, quotes included in the token text.
    String,
    /// A bare atom that parses as an `i64`.
    Int,
    /// A bare atom that parses as an `f64`.
    Float,
    /// Any other bare atom.
    Atom,
}

impl TokenKind {
    /// Classify raw token text.
    pub fn classify(text: &str) -> Self {
        match text {
            "(" => TokenKind::LParen,
            ")" => TokenKind::RParen,
            _ if is_quoted(text) => TokenKind::String,
            _ if text.parse::<i64>().is_ok() => TokenKind::Int,
            _ if text.parse::<f64>().is_ok() => TokenKind::Float,
            _ => TokenKind::Atom,
        }
    }

    /// Whether this is an opening or closing delimiter.
    pub fn is_delimiter(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::RParen)
    }
}

/// The typed value of a leaf token.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    /// Unquoted, unescaped string content.
    Str(Cow<'a, str>),
    /// Bare atom or delimiter text.
    Atom(&'a str),
}

/// A leaf of the tree: raw text plus the whitespace that preceded it.
///
/// The raw text is kept verbatim (numbers are not re-rendered) so that
/// serializing an untouched token reproduces the source bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: SmolStr,
    leading: SmolStr,
}

impl Token {
    /// Create a token from raw text, classifying it.
    pub fn new(text: impl Into<SmolStr>, leading: impl Into<SmolStr>) -> Self {
        let text = text.into();
        Self {
            kind: TokenKind::classify(&text),
            text,
            leading: leading.into(),
        }
    }

    /// Create a token whose kind is already known (used by the lexer).
    pub(crate) fn with_kind(kind: TokenKind, text: &str, leading: SmolStr) -> Self {
        let kind = match kind {
            TokenKind::Atom => TokenKind::classify(text),
            other => other,
        };
        Self {
            kind,
            text: SmolStr::new(text),
            leading,
        }
    }

    /// An opening delimiter.
    pub fn l_paren(leading: impl Into<SmolStr>) -> Self {
        Self::new("(", leading)
    }

    /// A closing delimiter.
    pub fn r_paren(leading: impl Into<SmolStr>) -> Self {
        Self::new(")", leading)
    }

    /// A quoted string token holding `value`.
    pub fn string(value: &str, leading: impl Into<SmolStr>) -> Self {
        Self {
            kind: TokenKind::String,
            text: SmolStr::from(quote(value)),
            leading: leading.into(),
        }
    }

    /// An integer token.
    pub fn int(value: i64, leading: impl Into<SmolStr>) -> Self {
        Self {
            kind: TokenKind::Int,
            text: smol_str::format_smolstr!("{value}"),
            leading: leading.into(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Raw token text, quotes included for strings.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace that preceded this token in the source.
    pub fn leading(&self) -> &str {
        &self.leading
    }

    pub fn set_leading(&mut self, leading: impl Into<SmolStr>) {
        self.leading = leading.into();
    }

    /// Replace the raw text, re-classifying the token.
    pub fn set_text(&mut self, text: impl Into<SmolStr>) {
        let text = text.into();
        self.kind = TokenKind::classify(&text);
        self.text = text;
    }

    /// Typed value of the token.
    pub fn value(&self) -> Value<'_> {
        match self.kind {
            TokenKind::Int => self.as_int().map_or(Value::Atom(&self.text), Value::Int),
            TokenKind::Float => self.as_float().map_or(Value::Atom(&self.text), Value::Float),
            TokenKind::String => Value::Str(unquote(&self.text)),
            TokenKind::Atom | TokenKind::LParen | TokenKind::RParen => Value::Atom(&self.text),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        self.text.parse().ok()
    }

    pub fn as_float(&self) -> Option<f64> {
        self.text.parse().ok()
    }

    /// Text content with quoting removed: unescaped for strings, raw otherwise.
    pub fn unquoted(&self) -> Cow<'_, str> {
        match self.kind {
            TokenKind::String => unquote(&self.text),
            _ => Cow::Borrowed(&self.text),
        }
    }

    /// Store `value` as content, keeping the token's quoting convention.
    ///
    /// A bare atom stays bare while the new content is itself a valid bare
    /// atom; anything else is written as a quoted string.
    pub fn set_content(&mut self, value: &str) {
        if self.kind != TokenKind::String && is_bare_atom(value) {
            self.set_text(value);
        } else {
            self.kind = TokenKind::String;
            self.text = SmolStr::from(quote(value));
        }
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Whether `text` can be written without quotes.
pub fn is_bare_atom(text: &str) -> bool {
    !text.is_empty()
        && !text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"'))
}

/// Quote `value`, escaping backslashes and double quotes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Strip the surrounding quotes of `raw` and undo [`quote`]'s escaping.
///
/// Escapes other than `\"` and `\\` (e.g. `\n`) are kept as written.
pub fn unquote(raw: &str) -> Cow<'_, str> {
    let inner = if is_quoted(raw) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
