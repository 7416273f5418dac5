//! Allocation-light character matchers.
//!
//! A [`Pattern`] inspects `source[begin..end]` and reports either the byte
//! length of a match or a mismatch (`None`). Patterns carry no error state
//! and no cursor, which keeps scanner-level matching cheap; they are adapted
//! into full parsers only at the boundary via [`Pattern::to_scanner`], which
//! records a single error if the whole pattern mismatches.

mod predicates;

pub use predicates::CharPredicate;

use std::sync::Arc;

use crate::parser::Parser;
use crate::scan;

/// A stateless character-level matcher.
///
/// `matches` returns the number of bytes matched from `begin`, or `None` on
/// mismatch. All offsets are byte offsets on `char` boundaries.
#[derive(Clone)]
pub struct Pattern {
    run: Arc<dyn Fn(&str, usize, usize) -> Option<usize> + Send + Sync>,
}

impl Pattern {
    pub fn new(run: impl Fn(&str, usize, usize) -> Option<usize> + Send + Sync + 'static) -> Self {
        Self { run: Arc::new(run) }
    }

    /// Matches against `src[begin..end]`, returning the matched byte length.
    #[inline]
    #[must_use]
    pub fn matches(&self, src: &str, begin: usize, end: usize) -> Option<usize> {
        debug_assert!(begin <= end && end <= src.len());
        (self.run)(src, begin, end)
    }

    /// Adapts a custom matcher over the remaining input slice.
    pub fn custom(f: impl Fn(&str) -> Option<usize> + Send + Sync + 'static) -> Self {
        Self::new(move |src, begin, end| f(&src[begin..end]))
    }

    /// Matches zero characters, always.
    #[must_use]
    pub fn always() -> Self {
        Self::new(|_, _, _| Some(0))
    }

    /// Never matches.
    #[must_use]
    pub fn never() -> Self {
        Self::new(|_, _, _| None)
    }

    /// Matches any single character.
    #[must_use]
    pub fn any_char() -> Self {
        Self::has_at_least(1)
    }

    /// Matches only at the end of the range, consuming nothing.
    #[must_use]
    pub fn eof() -> Self {
        Self::new(|_, begin, end| (begin == end).then_some(0))
    }

    /// Matches (and consumes) `n` characters if at least `n` remain.
    #[must_use]
    pub fn has_at_least(n: usize) -> Self {
        Self::new(move |src, begin, end| take_chars(&src[begin..end], n))
    }

    /// Matches `n` characters if exactly `n` remain.
    #[must_use]
    pub fn has_exact(n: usize) -> Self {
        Self::new(move |src, begin, end| {
            let slice = &src[begin..end];
            (slice.chars().count() == n).then(|| slice.len())
        })
    }

    /// Matches one character satisfying `predicate`.
    #[must_use]
    pub fn is_char(predicate: CharPredicate) -> Self {
        Self::new(move |src, begin, end| match src[begin..end].chars().next() {
            Some(c) if predicate.test(c) => Some(c.len_utf8()),
            _ => None,
        })
    }

    /// Matches one character equal to `c`.
    #[must_use]
    pub fn ch(c: char) -> Self {
        Self::is_char(CharPredicate::is_char(c))
    }

    /// Matches one character within `[lo, hi]`.
    #[must_use]
    pub fn range(lo: char, hi: char) -> Self {
        Self::is_char(CharPredicate::range(lo, hi))
    }

    /// Matches one character contained in `chars`.
    #[must_use]
    pub fn among(chars: &str) -> Self {
        Self::is_char(CharPredicate::among(chars))
    }

    /// Matches the literal `string`.
    #[must_use]
    pub fn string(string: &str) -> Self {
        let string = string.to_owned();
        Self::new(move |src, begin, end| {
            src[begin..end].starts_with(string.as_str()).then(|| string.len())
        })
    }

    /// Matches the literal `string`, ignoring case.
    #[must_use]
    pub fn string_case_insensitive(string: &str) -> Self {
        let string = string.to_owned();
        Self::new(move |src, begin, end| match_caseless(&string, &src[begin..end]))
    }

    /// Matches one character as long as the input here does not start with
    /// `string`.
    #[must_use]
    pub fn not_string(string: &str) -> Self {
        let string = string.to_owned();
        Self::new(move |src, begin, end| {
            let slice = &src[begin..end];
            let c = slice.chars().next()?;
            if slice.starts_with(string.as_str()) {
                None
            } else {
                Some(c.len_utf8())
            }
        })
    }

    /// Matches one character as long as the input here does not start with
    /// `string`, ignoring case.
    #[must_use]
    pub fn not_string_case_insensitive(string: &str) -> Self {
        let string = string.to_owned();
        Self::new(move |src, begin, end| {
            let slice = &src[begin..end];
            let c = slice.chars().next()?;
            if match_caseless(&string, slice).is_some() {
                None
            } else {
                Some(c.len_utf8())
            }
        })
    }

    /// A backslash followed by any character.
    #[must_use]
    pub fn escaped() -> Self {
        Self::ch('\\').next(Self::any_char())
    }

    /// `begin` followed by everything up to (not including) the next line
    /// feed.
    #[must_use]
    pub fn line_comment(begin: &str) -> Self {
        Self::string(begin).next(Self::many(CharPredicate::not_char('\n')))
    }

    /// Zero or more characters satisfying `predicate`.
    #[must_use]
    pub fn many(predicate: CharPredicate) -> Self {
        Self::new(move |src, begin, end| Some(match_while(&predicate, &src[begin..end], usize::MAX)))
    }

    /// At least `min` characters satisfying `predicate`, then greedily more.
    #[must_use]
    pub fn at_least_chars(min: usize, predicate: CharPredicate) -> Self {
        Self::new(move |src, begin, end| {
            let slice = &src[begin..end];
            let head = match_repeat(&predicate, slice, min)?;
            Some(head + match_while(&predicate, &slice[head..], usize::MAX))
        })
    }

    /// One or more characters satisfying `predicate`.
    #[must_use]
    pub fn many1(predicate: CharPredicate) -> Self {
        Self::at_least_chars(1, predicate)
    }

    /// Exactly `n` characters satisfying `predicate`.
    #[must_use]
    pub fn repeat_chars(n: usize, predicate: CharPredicate) -> Self {
        Self::new(move |src, begin, end| match_repeat(&predicate, &src[begin..end], n))
    }

    /// Sequences `self` then `next`, summing the matched lengths.
    #[must_use]
    pub fn next(&self, next: Self) -> Self {
        let first = self.clone();
        Self::new(move |src, begin, end| {
            let l1 = first.matches(src, begin, end)?;
            let l2 = next.matches(src, begin + l1, end)?;
            Some(l1 + l2)
        })
    }

    /// Tries `self`, falling back to `other` on mismatch.
    #[must_use]
    pub fn or(&self, other: Self) -> Self {
        let first = self.clone();
        Self::new(move |src, begin, end| {
            first.matches(src, begin, end).or_else(|| other.matches(src, begin, end))
        })
    }

    /// Matches `self`, or zero characters.
    #[must_use]
    pub fn optional(&self) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| Some(p.matches(src, begin, end).unwrap_or(0)))
    }

    /// Matches `self` zero or more times greedily. A zero-length match
    /// terminates the loop.
    #[must_use]
    pub fn many_self(&self) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| {
            let mut at = begin;
            loop {
                match p.matches(src, at, end) {
                    None | Some(0) => return Some(at - begin),
                    Some(l) => at += l,
                }
            }
        })
    }

    /// Matches `self` at least `min` times, then greedily more.
    #[must_use]
    pub fn at_least(&self, min: usize) -> Self {
        self.times(min).next(self.many_self())
    }

    /// Matches `self` exactly `n` times.
    #[must_use]
    pub fn times(&self, n: usize) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| {
            let mut at = begin;
            for _ in 0..n {
                at += p.matches(src, at, end)?;
            }
            Some(at - begin)
        })
    }

    /// Matches `self` at most `max` times greedily.
    #[must_use]
    pub fn at_most(&self, max: usize) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| {
            let mut at = begin;
            for _ in 0..max {
                match p.matches(src, at, end) {
                    None | Some(0) => break,
                    Some(l) => at += l,
                }
            }
            Some(at - begin)
        })
    }

    /// Matches `self` between `min` and `max` times.
    #[must_use]
    pub fn times_between(&self, min: usize, max: usize) -> Self {
        assert!(min <= max, "min > max");
        self.times(min).next(self.at_most(max - min))
    }

    /// Succeeds (matching zero characters) iff `self` mismatches.
    #[must_use]
    pub fn not(&self) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| match p.matches(src, begin, end) {
            Some(_) => None,
            None => Some(0),
        })
    }

    /// Matches `self` but consumes nothing.
    #[must_use]
    pub fn peek(&self) -> Self {
        let p = self.clone();
        Self::new(move |src, begin, end| p.matches(src, begin, end).map(|_| 0))
    }

    /// Runs `consequence` after `self` if `self` matches, `alternative`
    /// otherwise.
    #[must_use]
    pub fn if_else(&self, consequence: Self, alternative: Self) -> Self {
        let cond = self.clone();
        Self::new(move |src, begin, end| match cond.matches(src, begin, end) {
            Some(l) => consequence.matches(src, begin + l, end).map(|l2| l + l2),
            None => alternative.matches(src, begin, end),
        })
    }

    /// All of `patterns` must match here; the longest match length wins.
    #[must_use]
    pub fn and(patterns: Vec<Self>) -> Self {
        Self::new(move |src, begin, end| {
            let mut ret = 0;
            for p in &patterns {
                let l = p.matches(src, begin, end)?;
                ret = ret.max(l);
            }
            Some(ret)
        })
    }

    /// First match among `patterns` wins.
    #[must_use]
    pub fn or_of(patterns: Vec<Self>) -> Self {
        Self::new(move |src, begin, end| {
            patterns.iter().find_map(|p| p.matches(src, begin, end))
        })
    }

    /// Sequences `patterns` left to right.
    #[must_use]
    pub fn sequence_of(patterns: Vec<Self>) -> Self {
        Self::new(move |src, begin, end| {
            let mut at = begin;
            for p in &patterns {
                at += p.matches(src, at, end)?;
            }
            Some(at - begin)
        })
    }

    /// Runs every pattern and picks the longest match.
    #[must_use]
    pub fn longest(patterns: Vec<Self>) -> Self {
        Self::new(move |src, begin, end| {
            patterns
                .iter()
                .filter_map(|p| p.matches(src, begin, end))
                .max()
        })
    }

    /// Runs every pattern and picks the shortest match.
    #[must_use]
    pub fn shortest(patterns: Vec<Self>) -> Self {
        Self::new(move |src, begin, end| {
            patterns
                .iter()
                .filter_map(|p| p.matches(src, begin, end))
                .min()
        })
    }

    /// Adapts this pattern into a scanner parser that records
    /// "`name` expected" if the whole pattern mismatches.
    #[must_use]
    pub fn to_scanner(&self, name: impl Into<String>) -> Parser<()> {
        scan::pattern(self.clone(), name)
    }

    // Pre-built lexical patterns.

    /// `[a-zA-Z_][0-9a-zA-Z_]*`
    #[must_use]
    pub fn word() -> Self {
        Self::is_char(CharPredicate::is_alpha_())
            .next(Self::many(CharPredicate::is_alphanumeric_()))
    }

    /// `[0-9]+`
    #[must_use]
    pub fn integer() -> Self {
        Self::many1(CharPredicate::is_digit())
    }

    /// `[1-9][0-9]*`
    #[must_use]
    pub fn dec_integer() -> Self {
        Self::range('1', '9').next(Self::many(CharPredicate::is_digit()))
    }

    /// `0[0-7]*`
    #[must_use]
    pub fn oct_integer() -> Self {
        Self::ch('0').next(Self::many(CharPredicate::range('0', '7')))
    }

    /// `0x`/`0X` followed by one or more hex digits.
    #[must_use]
    pub fn hex_integer() -> Self {
        Self::string("0x")
            .or(Self::string("0X"))
            .next(Self::many1(CharPredicate::is_hex_digit()))
    }

    /// Digits with an optional fraction: `1`, `1.`, `1.5`.
    #[must_use]
    pub fn strict_decimal() -> Self {
        Self::integer().next(
            Self::ch('.').next(Self::many(CharPredicate::is_digit())).optional(),
        )
    }

    /// `.5` style fraction with no integral part.
    #[must_use]
    pub fn fraction() -> Self {
        Self::ch('.').next(Self::integer())
    }

    /// A strict decimal or a bare fraction.
    #[must_use]
    pub fn decimal() -> Self {
        Self::strict_decimal().or(Self::fraction())
    }

    /// Decimal significand, `e`/`E`, optional sign, integer exponent.
    #[must_use]
    pub fn scientific_notation() -> Self {
        Self::sequence_of(vec![
            Self::decimal(),
            Self::among("eE"),
            Self::among("+-").optional(),
            Self::integer(),
        ])
    }
}

/// Byte length of the first `n` characters of `slice`, or `None` if fewer
/// remain.
fn take_chars(slice: &str, n: usize) -> Option<usize> {
    let mut len = 0;
    let mut chars = slice.chars();
    for _ in 0..n {
        len += chars.next()?.len_utf8();
    }
    Some(len)
}

/// Byte length of the longest prefix of `slice` (at most `max` chars)
/// satisfying `predicate`.
fn match_while(predicate: &CharPredicate, slice: &str, max: usize) -> usize {
    let mut len = 0;
    for (n, c) in slice.chars().enumerate() {
        if n == max || !predicate.test(c) {
            break;
        }
        len += c.len_utf8();
    }
    len
}

/// Byte length of exactly `n` characters satisfying `predicate`.
fn match_repeat(predicate: &CharPredicate, slice: &str, n: usize) -> Option<usize> {
    let mut len = 0;
    let mut chars = slice.chars();
    for _ in 0..n {
        let c = chars.next()?;
        if !predicate.test(c) {
            return None;
        }
        len += c.len_utf8();
    }
    Some(len)
}

/// Case-insensitive prefix match; returns the byte length matched in
/// `slice`.
fn match_caseless(wanted: &str, slice: &str) -> Option<usize> {
    let mut len = 0;
    let mut have = slice.chars();
    for w in wanted.chars() {
        let c = have.next()?;
        if !c.to_lowercase().eq(w.to_lowercase()) {
            return None;
        }
        len += c.len_utf8();
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(p: &Pattern, src: &str) -> Option<usize> {
        p.matches(src, 0, src.len())
    }

    #[test]
    fn literals_and_chars() {
        assert_eq!(full(&Pattern::string("abc"), "abcdef"), Some(3));
        assert_eq!(full(&Pattern::string("abc"), "abd"), None);
        assert_eq!(full(&Pattern::ch('a'), "abc"), Some(1));
        assert_eq!(full(&Pattern::ch('a'), "xbc"), None);
        assert_eq!(full(&Pattern::string_case_insensitive("select"), "SELECT *"), Some(6));
        assert_eq!(full(&Pattern::not_string("*/"), "*/"), None);
        assert_eq!(full(&Pattern::not_string("*/"), "*x"), Some(1));
    }

    #[test]
    fn repetition_terminates_on_empty_match() {
        let nullable = Pattern::always();
        assert_eq!(full(&nullable.many_self(), "aaa"), Some(0));

        let a = Pattern::ch('a');
        assert_eq!(full(&a.many_self(), "aaab"), Some(3));
        assert_eq!(full(&a.at_least(2), "aaab"), Some(3));
        assert_eq!(full(&a.at_least(4), "aaab"), None);
        assert_eq!(full(&a.times(2), "aaab"), Some(2));
        assert_eq!(full(&a.times_between(1, 2), "aaab"), Some(2));
        assert_eq!(full(&a.at_most(10), "aab"), Some(2));
    }

    #[test]
    fn negation_and_peek() {
        let a = Pattern::ch('a');
        assert_eq!(full(&a.not(), "b"), Some(0));
        assert_eq!(full(&a.not(), "a"), None);
        assert_eq!(full(&a.peek(), "a"), Some(0));
        assert_eq!(full(&a.peek(), "b"), None);
    }

    #[test]
    fn longest_picks_longer_even_when_listed_second() {
        let p = Pattern::longest(vec![Pattern::string("a"), Pattern::string("ab")]);
        assert_eq!(full(&p, "ab"), Some(2));
        let p = Pattern::shortest(vec![Pattern::string("ab"), Pattern::string("a")]);
        assert_eq!(full(&p, "ab"), Some(1));
    }

    #[test]
    fn numeric_patterns() {
        assert_eq!(full(&Pattern::integer(), "123x"), Some(3));
        assert_eq!(full(&Pattern::decimal(), "1.25+"), Some(4));
        assert_eq!(full(&Pattern::decimal(), ".5"), Some(2));
        assert_eq!(full(&Pattern::hex_integer(), "0xFF;"), Some(4));
        assert_eq!(full(&Pattern::oct_integer(), "017"), Some(3));
        assert_eq!(full(&Pattern::dec_integer(), "017"), None);
        assert_eq!(full(&Pattern::scientific_notation(), "1.2e3"), Some(5));
        assert_eq!(full(&Pattern::scientific_notation(), "1.2e+3"), Some(6));
        assert_eq!(full(&Pattern::scientific_notation(), "1.2"), None);
    }

    #[test]
    fn word_pattern() {
        assert_eq!(full(&Pattern::word(), "foo_bar1 baz"), Some(8));
        assert_eq!(full(&Pattern::word(), "1foo"), None);
        assert_eq!(full(&Pattern::word(), "_x"), Some(2));
    }

    #[test]
    fn eof_and_bounds() {
        assert_eq!(full(&Pattern::eof(), ""), Some(0));
        assert_eq!(Pattern::eof().matches("ab", 2, 2), Some(0));
        assert_eq!(Pattern::eof().matches("ab", 1, 2), None);
        assert_eq!(Pattern::has_at_least(2).matches("abc", 1, 3), Some(2));
        assert_eq!(Pattern::has_at_least(3).matches("abc", 1, 3), None);
        assert_eq!(Pattern::has_exact(2).matches("abc", 1, 3), Some(2));
    }

    #[test]
    fn line_comment_stops_at_newline() {
        let p = Pattern::line_comment("//");
        assert_eq!(full(&p, "// hi\nx"), Some(5));
        assert_eq!(full(&p, "/x"), None);
    }

    #[test]
    fn multibyte_input() {
        assert_eq!(full(&Pattern::any_char(), "λx"), Some(2));
        let p = Pattern::many(CharPredicate::not_char('\n'));
        assert_eq!(full(&p, "αβ\nγ"), Some(4));
    }
}
