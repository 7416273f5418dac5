use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

/// A named predicate over a single character.
///
/// The name shows up in error messages ("`[a-zA-Z_]` expected"), so
/// factories pick names that read like character classes.
#[derive(Clone)]
pub struct CharPredicate {
    name: CompactString,
    test: Arc<dyn Fn(char) -> bool + Send + Sync>,
}

impl CharPredicate {
    pub fn new(
        name: impl Into<CompactString>,
        test: impl Fn(char) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self { name: name.into(), test: Arc::new(test) }
    }

    #[inline]
    #[must_use]
    pub fn test(&self, c: char) -> bool {
        (self.test)(c)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matches exactly `c`.
    #[must_use]
    pub fn is_char(c: char) -> Self {
        Self::new(format!("{c}"), move |x| x == c)
    }

    /// Matches any character except `c`.
    #[must_use]
    pub fn not_char(c: char) -> Self {
        Self::new(format!("^{c}"), move |x| x != c)
    }

    /// Matches any character within `[lo, hi]` inclusive.
    #[must_use]
    pub fn range(lo: char, hi: char) -> Self {
        Self::new(format!("[{lo}-{hi}]"), move |x| x >= lo && x <= hi)
    }

    /// Matches any character contained in `chars`.
    #[must_use]
    pub fn among(chars: &str) -> Self {
        let set: Vec<char> = chars.chars().collect();
        Self::new(format!("[{chars}]"), move |x| set.contains(&x))
    }

    /// Matches any character not contained in `chars`.
    #[must_use]
    pub fn not_among(chars: &str) -> Self {
        let set: Vec<char> = chars.chars().collect();
        Self::new(format!("^[{chars}]"), move |x| !set.contains(&x))
    }

    #[must_use]
    pub fn is_digit() -> Self {
        Self::new("[0-9]", |c| c.is_ascii_digit())
    }

    #[must_use]
    pub fn is_alpha() -> Self {
        Self::new("[a-zA-Z]", |c| c.is_ascii_alphabetic())
    }

    /// Letter or underscore, the leading character of a word.
    #[must_use]
    pub fn is_alpha_() -> Self {
        Self::new("[a-zA-Z_]", |c| c == '_' || c.is_ascii_alphabetic())
    }

    /// Letter, digit or underscore, the trailing characters of a word.
    #[must_use]
    pub fn is_alphanumeric_() -> Self {
        Self::new("[0-9a-zA-Z_]", |c| c == '_' || c.is_ascii_alphanumeric())
    }

    #[must_use]
    pub fn is_hex_digit() -> Self {
        Self::new("[0-9a-fA-F]", |c| c.is_ascii_hexdigit())
    }

    #[must_use]
    pub fn is_whitespace() -> Self {
        Self::new("whitespace", char::is_whitespace)
    }

    #[must_use]
    pub fn always() -> Self {
        Self::new("any character", |_| true)
    }

    #[must_use]
    pub fn never() -> Self {
        Self::new("none", |_| false)
    }

    /// Conjunction of `self` and `other`.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let (a, b) = (self.clone(), other.clone());
        Self::new(format!("{} & {}", self.name, other.name), move |c| a.test(c) && b.test(c))
    }

    /// Disjunction of `self` and `other`.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let (a, b) = (self.clone(), other.clone());
        Self::new(format!("{} | {}", self.name, other.name), move |c| a.test(c) || b.test(c))
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        let a = self.clone();
        Self::new(format!("^({})", self.name), move |c| !a.test(c))
    }
}

impl fmt::Display for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharPredicate({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_classes() {
        assert!(CharPredicate::is_char('a').test('a'));
        assert!(!CharPredicate::is_char('a').test('b'));
        assert!(CharPredicate::not_char('a').test('b'));
        assert!(CharPredicate::range('0', '7').test('5'));
        assert!(!CharPredicate::range('0', '7').test('8'));
        assert!(CharPredicate::among("+-").test('-'));
        assert!(!CharPredicate::not_among("+-").test('-'));
        assert!(CharPredicate::is_alpha_().test('_'));
        assert!(CharPredicate::is_alphanumeric_().test('9'));
    }

    #[test]
    fn combinations() {
        let digit_or_dash = CharPredicate::is_digit().or(&CharPredicate::is_char('-'));
        assert!(digit_or_dash.test('-'));
        assert!(digit_or_dash.test('3'));
        assert!(!digit_or_dash.test('x'));

        let hex_not_digit = CharPredicate::is_hex_digit().and(&CharPredicate::is_digit().negate());
        assert!(hex_not_digit.test('a'));
        assert!(!hex_not_digit.test('5'));
    }

    #[test]
    fn names_render() {
        assert_eq!(CharPredicate::range('a', 'z').to_string(), "[a-z]");
        assert_eq!(CharPredicate::among("eE").to_string(), "[eE]");
    }
}
