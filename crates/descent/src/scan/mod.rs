//! Character-level scanners.
//!
//! Everything here is an ordinary [`Parser`] that runs over character input,
//! built by adapting [`Pattern`]s at the boundary: the pattern does the
//! matching, the scanner records a single "`name` expected" when the whole
//! pattern mismatches. Pre-wired scanners cover the usual lexical fare:
//! whitespace, identifiers, numeric literals, quoted literals and comments.

use crate::parser::{or, Parser};
use crate::pattern::{CharPredicate, Pattern};

/// The scanner primitive: matches `p` at the cursor or records
/// "`name` expected".
pub fn pattern(p: Pattern, name: impl Into<String>) -> Parser<()> {
    let name = name.into();
    Parser::wrap(move |ctx| {
        let src = ctx.chars();
        match p.matches(src, ctx.at, src.len()) {
            Some(len) => {
                ctx.advance_bytes(len);
                Some(())
            }
            None => {
                ctx.expected(&name);
                None
            }
        }
    })
}

/// Matches exactly the character `c`.
#[must_use]
pub fn is_char(c: char) -> Parser<()> {
    pattern(Pattern::ch(c), c.to_string())
}

/// Matches one character satisfying `predicate`; the predicate's name is the
/// error message.
#[must_use]
pub fn matching(predicate: CharPredicate) -> Parser<()> {
    let name = predicate.name().to_owned();
    pattern(Pattern::is_char(predicate), name)
}

/// Matches any character except `c`.
#[must_use]
pub fn not_char(c: char) -> Parser<()> {
    matching(CharPredicate::not_char(c))
}

/// Matches one character contained in `chars`.
#[must_use]
pub fn among(chars: &str) -> Parser<()> {
    matching(CharPredicate::among(chars))
}

/// Matches one character not contained in `chars`.
#[must_use]
pub fn not_among(chars: &str) -> Parser<()> {
    matching(CharPredicate::not_among(chars))
}

/// Matches any single character.
#[must_use]
pub fn any_char() -> Parser<()> {
    pattern(Pattern::any_char(), "any character")
}

/// Matches the literal `s`.
#[must_use]
pub fn string(s: &str) -> Parser<()> {
    pattern(Pattern::string(s), s)
}

/// Matches the literal `s`, ignoring case.
#[must_use]
pub fn string_case_insensitive(s: &str) -> Parser<()> {
    pattern(Pattern::string_case_insensitive(s), s)
}

/// Zero or more characters satisfying `predicate`; never fails.
#[must_use]
pub fn many(predicate: CharPredicate) -> Parser<()> {
    let name = format!("{predicate}*");
    pattern(Pattern::many(predicate), name)
}

/// One or more characters satisfying `predicate`.
#[must_use]
pub fn many1(predicate: CharPredicate) -> Parser<()> {
    let name = format!("{predicate}+");
    pattern(Pattern::many1(predicate), name)
}

/// One or more whitespace characters.
#[must_use]
pub fn whitespaces() -> Parser<()> {
    pattern(Pattern::many1(CharPredicate::is_whitespace()), "whitespaces")
}

/// `[a-zA-Z_][0-9a-zA-Z_]*`, yielding the matched text.
#[must_use]
pub fn identifier() -> Parser<String> {
    pattern(Pattern::word(), "word").source()
}

/// One or more digits, yielding the matched text.
#[must_use]
pub fn integer() -> Parser<String> {
    pattern(Pattern::integer(), "integer").source()
}

/// An integer with no leading zero, yielding the matched text.
#[must_use]
pub fn dec_integer() -> Parser<String> {
    pattern(Pattern::dec_integer(), "decimal integer").source()
}

/// `0` followed by octal digits, yielding the matched text.
#[must_use]
pub fn oct_integer() -> Parser<String> {
    pattern(Pattern::oct_integer(), "octal integer").source()
}

/// `0x`/`0X` hex literal, yielding the matched text.
#[must_use]
pub fn hex_integer() -> Parser<String> {
    pattern(Pattern::hex_integer(), "hexadecimal integer").source()
}

/// A decimal number (`1`, `1.5` or `.5`), yielding the matched text.
#[must_use]
pub fn decimal() -> Parser<String> {
    pattern(Pattern::decimal(), "decimal number").source()
}

/// A scientific-notation literal, yielding the matched text.
#[must_use]
pub fn scientific_notation() -> Parser<String> {
    pattern(Pattern::scientific_notation(), "scientific notation").source()
}

/// `begin` up to (not including) the next line feed.
#[must_use]
pub fn line_comment(begin: &str) -> Parser<()> {
    pattern(Pattern::line_comment(begin), begin)
}

/// A non-nesting block comment between `open` and `close`.
#[must_use]
pub fn block_comment(open: &str, close: &str) -> Parser<()> {
    block_comment_with(open, close, Pattern::not_string(close).many_self())
}

/// A block comment whose body is matched by `commented`.
#[must_use]
pub fn block_comment_with(open: &str, close: &str, commented: Pattern) -> Parser<()> {
    let p = Pattern::string(open).next(commented).next(Pattern::string(close));
    pattern(p, format!("{open}...{close}"))
}

/// A nestable block comment: every `open` inside the body must be balanced
/// by a `close`.
#[must_use]
pub fn nestable_block_comment(open: &str, close: &str) -> Parser<()> {
    nestable_block_comment_with(open, close, &Pattern::any_char())
}

/// A nestable block comment whose non-delimiter content is matched by
/// `commented` one unit at a time.
#[must_use]
pub fn nestable_block_comment_with(open: &str, close: &str, commented: &Pattern) -> Parser<()> {
    let open_pat = Pattern::string(open);
    let close_pat = Pattern::string(close);
    let commented = commented.clone();
    let (open, close) = (open.to_owned(), close.to_owned());
    Parser::wrap(move |ctx| {
        let src = ctx.chars();
        let end = src.len();
        match open_pat.matches(src, ctx.at, end) {
            Some(len) => ctx.advance_bytes(len),
            None => {
                ctx.expected(&open);
                return None;
            }
        }
        let mut level = 1usize;
        while level > 0 {
            let at = ctx.at;
            if let Some(len) = close_pat.matches(src, at, end) {
                level -= 1;
                ctx.advance_bytes(len);
            } else if let Some(len) = open_pat.matches(src, at, end) {
                level += 1;
                ctx.advance_bytes(len);
            } else {
                match commented.matches(src, at, end) {
                    Some(len) if len > 0 => ctx.advance_bytes(len),
                    _ => {
                        ctx.expected(&close);
                        return None;
                    }
                }
            }
        }
        Some(())
    })
}

/// A double-quoted string with backslash escapes, quotes included in the
/// yielded text.
#[must_use]
pub fn double_quote_string() -> Parser<String> {
    let body = Pattern::escaped().or(Pattern::is_char(CharPredicate::not_among("\"\\")));
    let p = Pattern::ch('"').next(body.many_self()).next(Pattern::ch('"'));
    pattern(p, "double-quoted string").source()
}

/// A single-quoted string where a quote is escaped by doubling, quotes
/// included in the yielded text.
#[must_use]
pub fn single_quote_string() -> Parser<String> {
    let body = Pattern::string("''").or(Pattern::is_char(CharPredicate::not_char('\'')));
    let p = Pattern::ch('\'').next(body.many_self()).next(Pattern::ch('\''));
    pattern(p, "single-quoted string").source()
}

/// A single-quoted character literal (`'a'`, `'\n'` or `''''`), quotes
/// included in the yielded text.
#[must_use]
pub fn single_quote_char() -> Parser<String> {
    let body = Pattern::string("''")
        .or(Pattern::escaped())
        .or(Pattern::is_char(CharPredicate::not_char('\'')));
    let p = Pattern::ch('\'').next(body).next(Pattern::ch('\''));
    pattern(p, "char literal").source()
}

/// Anything between `open` and `close` on one nesting level, delimiters
/// included in the yielded text.
#[must_use]
pub fn quoted(open: char, close: char) -> Parser<String> {
    let p = Pattern::ch(open)
        .next(Pattern::many(CharPredicate::not_char(close)))
        .next(Pattern::ch(close));
    pattern(p, format!("quoted by {open} and {close}")).source()
}

/// Runs `outer`, then re-scans exactly the text it matched with `inner`,
/// which must consume all of it. The cursor ends where `outer` left it.
#[must_use]
pub fn nested_scanner<A: 'static, T: 'static>(outer: &Parser<A>, inner: &Parser<T>) -> Parser<T> {
    let (outer, inner) = (outer.clone(), inner.clone());
    Parser::wrap(move |ctx| {
        let from = ctx.at;
        outer.run(ctx)?;
        let to = ctx.at;
        let step = ctx.step;
        let value = ctx.truncated(to, |ctx| {
            ctx.set(from, step);
            let value = inner.run(ctx)?;
            ctx.expect_eof().then_some(value)
        })?;
        ctx.set(to, ctx.step);
        Some(value)
    })
}

/// Whitespace, `//` line comments and `/* */` block comments, any number of
/// times. The usual token delimiter for C-family grammars.
#[must_use]
pub fn java_delimiter() -> Parser<()> {
    or(vec![whitespaces(), line_comment("//"), block_comment("/*", "*/")]).skip_many()
}

/// Whitespace, `--` line comments and `/* */` block comments.
#[must_use]
pub fn sql_delimiter() -> Parser<()> {
    or(vec![whitespaces(), line_comment("--"), block_comment("/*", "*/")]).skip_many()
}

/// Whitespace, `--` line comments and nestable `{- -}` block comments.
#[must_use]
pub fn haskell_delimiter() -> Parser<()> {
    or(vec![whitespaces(), line_comment("--"), nestable_block_comment("{-", "-}")]).skip_many()
}
