//! Tokens produced by the character level and consumed by the token level.
//!
//! A [`Token`] is a value plus the byte span it was scanned from. The span
//! is what token-level errors are translated through: a failure at token
//! index `i` is reported at the character offset of token `i`.

use std::fmt;

use compact_str::CompactString;

/// The payload of a scanned token.
///
/// Lexical categories that the original dynamically tagged are a closed enum
/// here; grammars that need their own categories wrap the text in
/// [`TokenValue::Reserved`] or carry a mapped value through their own types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// A keyword or operator from a lexicon.
    Reserved(CompactString),
    Identifier(CompactString),
    /// An integer literal, kept as written.
    Integer(CompactString),
    /// A decimal literal, kept as written.
    Decimal(CompactString),
    /// A scientific-notation literal split at the `e`.
    Scientific {
        significand: CompactString,
        exponent: CompactString,
    },
    /// A string literal with quotes stripped and escapes resolved.
    Str(CompactString),
    Char(char),
    Long(i64),
    /// Zero-width pseudo token opening an indentation block.
    Indent,
    /// Zero-width pseudo token closing an indentation block.
    Outdent,
    /// A line feed kept as a token by indentation-aware lexers.
    Newline,
}

impl TokenValue {
    /// How this value reads in an error message.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Reserved(text)
            | Self::Identifier(text)
            | Self::Integer(text)
            | Self::Decimal(text) => text.to_string(),
            Self::Scientific { significand, exponent } => {
                format!("{significand}E{exponent}")
            }
            Self::Str(text) => format!("{text:?}"),
            Self::Char(c) => format!("{c:?}"),
            Self::Long(n) => n.to_string(),
            Self::Indent => "INDENT".to_owned(),
            Self::Outdent => "OUTDENT".to_owned(),
            Self::Newline => "newline".to_owned(),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A token with its byte span in the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    index: usize,
    len: usize,
    value: TokenValue,
}

impl Token {
    #[must_use]
    pub fn new(index: usize, len: usize, value: TokenValue) -> Self {
        Self { index, len, value }
    }

    /// Byte offset of the first matched character.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte length of the matched text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset just past the matched text.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.index + self.len
    }

    #[must_use]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> TokenValue {
        self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Resolves backslash escapes in a double-quoted literal (quotes included).
///
/// A backslash makes the following character literal; no named escapes are
/// interpreted beyond that.
#[must_use]
pub fn unescape_double_quoted(text: &str) -> CompactString {
    let inner = &text[1..text.len() - 1];
    let mut out = CompactString::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Collapses doubled quotes in a single-quoted literal (quotes included),
/// the SQL convention: `'it''s'` reads as `it's`.
#[must_use]
pub fn collapse_doubled_quotes(text: &str) -> CompactString {
    let inner = &text[1..text.len() - 1];
    let mut out = CompactString::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // The scanner guarantees quotes come doubled.
            chars.next();
        }
        out.push(c);
    }
    out
}

/// Reads a quoted character literal such as `'a'`, `'\n'` or `''''`.
#[must_use]
pub fn char_literal_value(text: &str) -> char {
    let inner = &text[1..text.len() - 1];
    match inner {
        "''" => '\'',
        _ => {
            let mut chars = inner.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some('\\'), Some(c), None) | (Some(c), None, _) => c,
                _ => panic!("malformed char literal: {text:?}"),
            }
        }
    }
}

/// Folds decimal digits into an `i64`, wrapping on overflow.
#[must_use]
pub fn dec_to_i64(text: &str) -> i64 {
    fold_digits(text, 10)
}

/// Folds octal digits (leading `0` included) into an `i64`.
#[must_use]
pub fn oct_to_i64(text: &str) -> i64 {
    fold_digits(text, 8)
}

/// Folds hex digits (after a `0x`/`0X` prefix) into an `i64`.
#[must_use]
pub fn hex_to_i64(text: &str) -> i64 {
    fold_digits(&text[2..], 16)
}

fn fold_digits(text: &str, radix: u32) -> i64 {
    let mut n: i64 = 0;
    for c in text.chars() {
        let d = c.to_digit(radix).map_or(0, i64::from);
        n = n.wrapping_mul(i64::from(radix)).wrapping_add(d);
    }
    n
}
