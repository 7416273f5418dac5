//! Keyword and operator dictionaries.
//!
//! A [`Lexicon`] maps literal text to its canonical [`TokenValue`] and
//! carries the character-level tokenizer that recognizes the vocabulary.
//! Grammars look reserved words up by their literal text
//! ([`Lexicon::token`]), so the same string always yields the same token
//! value. Lexicons for disjoint vocabularies combine with
//! [`Lexicon::union`], which treats a doubly-registered literal as a fatal
//! configuration error.

mod terminals;

pub use terminals::{
    char_literal, char_tokenizer, dec_as_long_tokenizer, decimal_literal, decimal_tokenizer,
    double_quote_string_tokenizer, hex_as_long_tokenizer, identifier, identifier_tokenizer,
    integer_literal, integer_tokenizer, long_literal, oct_as_long_tokenizer, reserved,
    scientific_literal, scientific_tokenizer, single_quote_string_tokenizer, string_literal,
    Terminals, TerminalsBuilder,
};

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::parser::{or, sequence, token_value, Parser};
use crate::scan;
use crate::token::{Token, TokenValue};

/// How literal text is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringCase {
    Sensitive,
    Insensitive,
}

impl StringCase {
    fn key(self, literal: &str) -> CompactString {
        match self {
            Self::Sensitive => CompactString::from(literal),
            Self::Insensitive => CompactString::from(literal.to_lowercase()),
        }
    }
}

struct Entry {
    value: TokenValue,
    case: StringCase,
}

type WordMap = HashMap<CompactString, Entry, ahash::RandomState>;

/// A vocabulary: literal → token value, plus its tokenizer.
pub struct Lexicon {
    words: WordMap,
    tokenizer: Parser<TokenValue>,
}

impl Lexicon {
    fn new(words: WordMap, tokenizer: Parser<TokenValue>) -> Self {
        Self { words, tokenizer }
    }

    /// Builds the lexicon of `operators`, scanned longest-first so that
    /// `>>>` wins over `>>` wins over `>`.
    #[must_use]
    pub fn operators(operators: &[&str]) -> Self {
        let mut sorted: Vec<&str> = operators.iter().copied().filter(|op| !op.is_empty()).collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        sorted.dedup();

        let mut words = WordMap::default();
        let mut alternatives = Vec::with_capacity(sorted.len());
        for op in &sorted {
            let value = TokenValue::Reserved(CompactString::from(*op));
            words.insert(
                CompactString::from(*op),
                Entry { value: value.clone(), case: StringCase::Sensitive },
            );
            alternatives.push(scan::string(op).to(value));
        }
        Self::new(words, or(alternatives))
    }

    /// Builds a keyword lexicon over `word_scanner`: every scanned word is
    /// classified as a reserved keyword by lookup (in `case` mode) or
    /// handed to `fallback` for a generic token value.
    #[must_use]
    pub fn keywords(
        word_scanner: &Parser<String>,
        keywords: &[&str],
        case: StringCase,
        fallback: impl Fn(&str) -> TokenValue + Send + Sync + 'static,
    ) -> Self {
        let mut words = WordMap::default();
        for kw in keywords {
            words.insert(
                case.key(kw),
                Entry { value: TokenValue::Reserved(CompactString::from(*kw)), case },
            );
        }
        let reserved: HashMap<CompactString, TokenValue, ahash::RandomState> = words
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        let tokenizer = word_scanner.map(move |text| {
            let value = match case {
                StringCase::Sensitive => reserved.get(text.as_str()),
                StringCase::Insensitive => reserved.get(text.to_lowercase().as_str()),
            };
            value.cloned().unwrap_or_else(|| fallback(&text))
        });
        Self::new(words, tokenizer)
    }

    /// The canonical token value of `name`. Panics if `name` was never
    /// registered; that is a grammar configuration error, not a parse
    /// failure.
    #[must_use]
    pub fn word(&self, name: &str) -> TokenValue {
        self.lookup(name)
            .unwrap_or_else(|| panic!("{name:?} is not a known literal in this lexicon"))
            .clone()
    }

    fn lookup(&self, name: &str) -> Option<&TokenValue> {
        if let Some(entry) = self.words.get(name) {
            return Some(&entry.value);
        }
        match self.words.get(name.to_lowercase().as_str()) {
            Some(entry) if entry.case == StringCase::Insensitive => Some(&entry.value),
            _ => None,
        }
    }

    /// A token-level parser matching the reserved token of `name`.
    #[must_use]
    pub fn token(&self, name: &str) -> Parser<Token> {
        token_value(self.word(name))
    }

    /// A token-level parser matching any of `names`.
    #[must_use]
    pub fn token_among(&self, names: &[&str]) -> Parser<Token> {
        or(names.iter().map(|name| self.token(name)).collect())
    }

    /// The reserved words of `names` in sequence, as one all-or-nothing
    /// unit. Yields the joined phrase text.
    #[must_use]
    pub fn phrase(&self, names: &[&str]) -> Parser<String> {
        let joined = names.join(" ");
        let tokens = sequence(names.iter().map(|name| self.token(name)).collect());
        let result = joined.clone();
        tokens.atomic().map(move |_| result.clone()).label(&joined)
    }

    /// The character-level tokenizer recognizing this vocabulary.
    #[must_use]
    pub fn tokenizer(&self) -> Parser<TokenValue> {
        self.tokenizer.clone()
    }

    /// Combines two lexicons for disjoint vocabularies; `self`'s tokenizer
    /// is tried first. Panics if the same literal is registered in both.
    #[must_use]
    pub fn union(mut self, other: Lexicon) -> Lexicon {
        for (key, entry) in other.words {
            if self.words.contains_key(&key) {
                panic!("literal {key:?} registered in both lexicons");
            }
            self.words.insert(key, entry);
        }
        let tokenizer = or(vec![self.tokenizer, other.tokenizer]);
        Self::new(self.words, tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op_lexicon() -> Lexicon {
        Lexicon::operators(&[">", ">>", ">>>", "+", "("])
    }

    #[test]
    fn longest_operator_scans_first() {
        let lexicon = op_lexicon();
        let tok = lexicon.tokenizer();
        assert_eq!(tok.parse(">>>").unwrap(), TokenValue::Reserved(">>>".into()));
        let shifted = tok.followed_by(&tok).parse(">>>>").unwrap();
        assert_eq!(shifted, TokenValue::Reserved(">>>".into()));
    }

    #[test]
    fn word_lookup_and_case_modes() {
        let lexicon = op_lexicon();
        assert_eq!(lexicon.word(">>"), TokenValue::Reserved(">>".into()));

        let kw = Lexicon::keywords(
            &scan::identifier(),
            &["select", "FROM"],
            StringCase::Insensitive,
            |text| TokenValue::Identifier(text.into()),
        );
        assert_eq!(kw.word("SELECT"), TokenValue::Reserved("select".into()));
        assert_eq!(kw.word("from"), TokenValue::Reserved("FROM".into()));
        assert_eq!(kw.tokenizer().parse("SeLeCt").unwrap(), TokenValue::Reserved("select".into()));
        assert_eq!(kw.tokenizer().parse("other").unwrap(), TokenValue::Identifier("other".into()));
    }

    #[test]
    #[should_panic(expected = "is not a known literal")]
    fn unknown_word_is_fatal() {
        op_lexicon().word("**");
    }

    #[test]
    #[should_panic(expected = "registered in both lexicons")]
    fn union_rejects_duplicate_literals() {
        let a = Lexicon::operators(&["+", "-"]);
        let b = Lexicon::operators(&["*", "+"]);
        let _ = a.union(b);
    }

    #[test]
    fn union_merges_disjoint_vocabularies() {
        let merged = Lexicon::operators(&["+"]).union(Lexicon::operators(&["*"]));
        assert_eq!(merged.word("+"), TokenValue::Reserved("+".into()));
        assert_eq!(merged.word("*"), TokenValue::Reserved("*".into()));
    }
}
