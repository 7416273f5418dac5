//! Pre-wired terminal vocabularies and literal parsers.
//!
//! [`Terminals`] bundles an operator lexicon with a keyword-classifying word
//! lexicon. The free functions come in pairs: a character-level tokenizer
//! producing a [`TokenValue`], and the token-level parser that consumes it.

use std::sync::Arc;

use compact_str::CompactString;

use crate::parser::{token, Parser};
use crate::scan;
use crate::token::{
    char_literal_value, collapse_doubled_quotes, dec_to_i64, hex_to_i64, oct_to_i64,
    unescape_double_quoted, Token, TokenValue,
};

use super::{Lexicon, StringCase};

/// Operators plus keyword-classified words, ready to lex and parse.
pub struct Terminals {
    lexicon: Lexicon,
}

impl Terminals {
    /// Starts from an operator vocabulary. Call [`Terminals::words`] to add
    /// keywords and identifiers, or use as-is for an operator-only grammar.
    #[must_use]
    pub fn operators(operators: &[&str]) -> Self {
        Self { lexicon: Lexicon::operators(operators) }
    }

    /// Extends the vocabulary with words recognized by `scanner`; finish
    /// with [`TerminalsBuilder::build`].
    #[must_use]
    pub fn words(self, scanner: Parser<String>) -> TerminalsBuilder {
        TerminalsBuilder {
            operators: self.lexicon,
            scanner,
            keywords: Vec::new(),
            case: StringCase::Sensitive,
            fallback: Arc::new(|text| TokenValue::Identifier(CompactString::from(text))),
        }
    }

    /// Token-level parser for the reserved word or operator `name`.
    #[must_use]
    pub fn token(&self, name: &str) -> Parser<Token> {
        self.lexicon.token(name)
    }

    /// Token-level parser matching any of `names`.
    #[must_use]
    pub fn token_among(&self, names: &[&str]) -> Parser<Token> {
        self.lexicon.token_among(names)
    }

    /// The reserved words of `names` in sequence as one atomic unit.
    #[must_use]
    pub fn phrase(&self, names: &[&str]) -> Parser<String> {
        self.lexicon.phrase(names)
    }

    /// The character-level tokenizer for this vocabulary.
    #[must_use]
    pub fn tokenizer(&self) -> Parser<TokenValue> {
        self.lexicon.tokenizer()
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

/// Configures the word side of a [`Terminals`] vocabulary.
pub struct TerminalsBuilder {
    operators: Lexicon,
    scanner: Parser<String>,
    keywords: Vec<String>,
    case: StringCase,
    fallback: Arc<dyn Fn(&str) -> TokenValue + Send + Sync>,
}

impl TerminalsBuilder {
    /// Registers case-sensitive keywords.
    #[must_use]
    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.case = StringCase::Sensitive;
        self.keywords.extend(keywords.iter().map(ToString::to_string));
        self
    }

    /// Registers case-insensitive keywords.
    #[must_use]
    pub fn case_insensitive_keywords(mut self, keywords: &[&str]) -> Self {
        self.case = StringCase::Insensitive;
        self.keywords.extend(keywords.iter().map(ToString::to_string));
        self
    }

    /// Replaces the default classification of non-keyword words (which is
    /// [`TokenValue::Identifier`]).
    #[must_use]
    pub fn tokenize_words_with(
        mut self,
        f: impl Fn(&str) -> TokenValue + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Arc::new(f);
        self
    }

    /// Panics if a keyword is also registered as an operator.
    #[must_use]
    pub fn build(self) -> Terminals {
        let keywords: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
        let fallback = self.fallback;
        let words = Lexicon::keywords(&self.scanner, &keywords, self.case, move |text| {
            fallback(text)
        });
        Terminals { lexicon: self.operators.union(words) }
    }
}

// Token-level literal parsers.

/// Any [`TokenValue::Identifier`] token, yielding its text.
#[must_use]
pub fn identifier() -> Parser<String> {
    token("identifier", |t| match t.value() {
        TokenValue::Identifier(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Any [`TokenValue::Reserved`] token, yielding its text. Prefer
/// [`Terminals::token`] to match one specific reserved word.
#[must_use]
pub fn reserved() -> Parser<String> {
    token("reserved word", |t| match t.value() {
        TokenValue::Reserved(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Any [`TokenValue::Integer`] token, yielding the literal text.
#[must_use]
pub fn integer_literal() -> Parser<String> {
    token("integer", |t| match t.value() {
        TokenValue::Integer(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Any [`TokenValue::Decimal`] token, yielding the literal text.
#[must_use]
pub fn decimal_literal() -> Parser<String> {
    token("decimal", |t| match t.value() {
        TokenValue::Decimal(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Any [`TokenValue::Str`] token, yielding the resolved text.
#[must_use]
pub fn string_literal() -> Parser<String> {
    token("string", |t| match t.value() {
        TokenValue::Str(text) => Some(text.to_string()),
        _ => None,
    })
}

/// Any [`TokenValue::Char`] token.
#[must_use]
pub fn char_literal() -> Parser<char> {
    token("char", |t| match t.value() {
        TokenValue::Char(c) => Some(*c),
        _ => None,
    })
}

/// Any [`TokenValue::Long`] token.
#[must_use]
pub fn long_literal() -> Parser<i64> {
    token("integer", |t| match t.value() {
        TokenValue::Long(n) => Some(*n),
        _ => None,
    })
}

/// Any [`TokenValue::Scientific`] token, yielding
/// `(significand, exponent)`.
#[must_use]
pub fn scientific_literal() -> Parser<(String, String)> {
    token("scientific notation", |t| match t.value() {
        TokenValue::Scientific { significand, exponent } => {
            Some((significand.to_string(), exponent.to_string()))
        }
        _ => None,
    })
}

// Character-level tokenizers for the same categories.

#[must_use]
pub fn identifier_tokenizer() -> Parser<TokenValue> {
    scan::identifier().map(|text| TokenValue::Identifier(CompactString::from(text)))
}

#[must_use]
pub fn integer_tokenizer() -> Parser<TokenValue> {
    scan::integer().map(|text| TokenValue::Integer(CompactString::from(text)))
}

#[must_use]
pub fn decimal_tokenizer() -> Parser<TokenValue> {
    scan::decimal().map(|text| TokenValue::Decimal(CompactString::from(text)))
}

/// Decimal digits tokenized to a [`TokenValue::Long`].
#[must_use]
pub fn dec_as_long_tokenizer() -> Parser<TokenValue> {
    scan::integer().map(|text| TokenValue::Long(dec_to_i64(&text)))
}

/// `0`-prefixed octal digits tokenized to a [`TokenValue::Long`].
#[must_use]
pub fn oct_as_long_tokenizer() -> Parser<TokenValue> {
    scan::oct_integer().map(|text| TokenValue::Long(oct_to_i64(&text)))
}

/// `0x`-prefixed hex digits tokenized to a [`TokenValue::Long`].
#[must_use]
pub fn hex_as_long_tokenizer() -> Parser<TokenValue> {
    scan::hex_integer().map(|text| TokenValue::Long(hex_to_i64(&text)))
}

/// Double-quoted string with backslash escapes resolved.
#[must_use]
pub fn double_quote_string_tokenizer() -> Parser<TokenValue> {
    scan::double_quote_string().map(|text| TokenValue::Str(unescape_double_quoted(&text)))
}

/// Single-quoted string with doubled quotes collapsed.
#[must_use]
pub fn single_quote_string_tokenizer() -> Parser<TokenValue> {
    scan::single_quote_string().map(|text| TokenValue::Str(collapse_doubled_quotes(&text)))
}

/// Single-quoted character literal.
#[must_use]
pub fn char_tokenizer() -> Parser<TokenValue> {
    scan::single_quote_char().map(|text| TokenValue::Char(char_literal_value(&text)))
}

/// Scientific notation split at the `e`, with an explicit `+` in the
/// exponent dropped.
#[must_use]
pub fn scientific_tokenizer() -> Parser<TokenValue> {
    scan::scientific_notation().map(|text| {
        let e = text
            .find(['e', 'E'])
            .expect("scientific-notation scanner guarantees an exponent marker");
        let significand = CompactString::from(&text[..e]);
        let exponent = text[e + 1..].trim_start_matches('+');
        TokenValue::Scientific { significand, exponent: CompactString::from(exponent) }
    })
}
