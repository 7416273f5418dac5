//! The mutable state of one parse.
//!
//! Combinators communicate through a [`ParseContext`]: a cursor into either
//! character or token input, a logical step counter, the furthest-progress
//! error accumulator, and the optional trace arena. Result values are
//! returned by the combinators themselves; only position, step and error
//! state live here.
//!
//! The step counter is what distinguishes a safe fallback from a committed
//! branch: it advances once per consumed input element (and once per
//! successful `atomic` unit), so an alternative that failed without moving
//! the step can be rolled back, while one that stepped has committed.

use compact_str::CompactString;

use crate::error::{ErrorKind, ErrorState, ParseError};
use crate::token::Token;
use crate::tree::TraceArena;

/// What the cursor indexes: source characters or scanned tokens.
pub(crate) enum Input<'s> {
    Chars(&'s str),
    Tokens(Vec<Token>),
}

/// All mutable state of a single parse.
pub struct ParseContext<'s> {
    /// The original character source, kept for locating errors even at the
    /// token level.
    src: &'s str,
    input: Input<'s>,
    /// Cursor: byte offset into `src` at the character level, token index at
    /// the token level.
    pub(crate) at: usize,
    /// Logical progress; see the module docs.
    pub(crate) step: usize,
    pub(crate) error: ErrorState,
    /// Description of the input at the error, captured when a token-level
    /// error is translated to a character offset.
    encountered: Option<String>,
    suppressed: bool,
    delimiting: bool,
    pub(crate) trace: Option<TraceArena>,
}

impl<'s> ParseContext<'s> {
    pub(crate) fn new(src: &'s str, traced: bool) -> Self {
        Self {
            src,
            input: Input::Chars(src),
            at: 0,
            step: 0,
            error: ErrorState::new(),
            encountered: None,
            suppressed: false,
            delimiting: false,
            trace: traced.then(TraceArena::new),
        }
    }

    fn over_tokens(src: &'s str, tokens: Vec<Token>, traced: bool) -> Self {
        Self {
            src,
            input: Input::Tokens(tokens),
            at: 0,
            step: 0,
            error: ErrorState::new(),
            encountered: None,
            suppressed: false,
            delimiting: false,
            trace: traced.then(TraceArena::new),
        }
    }

    #[must_use]
    pub fn at(&self) -> usize {
        self.at
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    pub(crate) fn src(&self) -> &'s str {
        self.src
    }

    /// Restores cursor and step, typically to a snapshot taken before an
    /// alternative ran.
    pub(crate) fn set(&mut self, at: usize, step: usize) {
        self.at = at;
        self.step = step;
    }

    /// True if no logical step was made since the snapshot; rolls the
    /// physical cursor back when so.
    pub(crate) fn still_there(&mut self, at: usize, step: usize) -> bool {
        if self.step == step {
            self.at = at;
            return true;
        }
        false
    }

    // Character-level access. Calling these on token input is a grammar
    // configuration bug and panics.

    pub(crate) fn chars(&self) -> &'s str {
        match &self.input {
            Input::Chars(src) => src,
            Input::Tokens(_) => {
                panic!("character-level parser applied to token input; wrap it with from_lexer")
            }
        }
    }

    /// Consumes `len` bytes of character input; consuming anything counts
    /// as one logical step, a zero-length match counts as none.
    pub(crate) fn advance_bytes(&mut self, len: usize) {
        debug_assert!(matches!(self.input, Input::Chars(_)));
        self.at += len;
        if len > 0 {
            self.step += 1;
        }
    }

    // Token-level access. Calling these on character input panics.

    pub(crate) fn tokens(&self) -> &[Token] {
        match &self.input {
            Input::Tokens(tokens) => tokens,
            Input::Chars(_) => {
                panic!("token-level parser applied to character input; run it through from_lexer")
            }
        }
    }

    pub(crate) fn peek_token(&self) -> Option<&Token> {
        self.tokens().get(self.at)
    }

    /// Consumes one token as one logical step.
    pub(crate) fn advance_token(&mut self) {
        debug_assert!(matches!(self.input, Input::Tokens(_)));
        self.at += 1;
        self.step += 1;
    }

    pub(crate) fn end(&self) -> usize {
        match &self.input {
            Input::Chars(src) => src.len(),
            Input::Tokens(tokens) => tokens.len(),
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.at >= self.end()
    }

    /// Translates a cursor position to a byte offset in the original source.
    pub(crate) fn to_offset(&self, at: usize) -> usize {
        match &self.input {
            Input::Chars(_) => at.min(self.src.len()),
            Input::Tokens(tokens) => match tokens.get(at) {
                Some(token) => token.index(),
                None => tokens.last().map_or(0, Token::end_index),
            },
        }
    }

    /// Human description of the input element at `at`.
    pub(crate) fn describe_at(&self, at: usize) -> String {
        match &self.input {
            Input::Chars(src) => match src[at.min(src.len())..].chars().next() {
                Some(c) => c.to_string(),
                None => "EOF".to_owned(),
            },
            Input::Tokens(tokens) => match tokens.get(at) {
                Some(token) => token.value().describe(),
                None => "EOF".to_owned(),
            },
        }
    }

    // Error recording.

    pub(crate) fn raise(&mut self, kind: ErrorKind, what: Option<&str>) {
        if self.suppressed {
            return;
        }
        let kind = if self.delimiting { ErrorKind::Trap } else { kind };
        if self.error.raise(kind, self.at, what) {
            // The description of the input at the old error no longer
            // applies.
            self.encountered = None;
        }
    }

    pub(crate) fn expected(&mut self, what: &str) {
        self.raise(ErrorKind::Expected, Some(what));
    }

    pub(crate) fn unexpected(&mut self, what: &str) {
        self.raise(ErrorKind::Unexpected, Some(what));
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.raise(ErrorKind::Failure, Some(message));
    }

    pub(crate) fn trap(&mut self) {
        self.raise(ErrorKind::Trap, None);
    }

    /// Records "`name` expected" at the current cursor. `Expect` outranks
    /// the body's own `Expected` at the same position, so the label name
    /// displaces it; higher kinds (an explicit failure) survive, and
    /// sibling labels at the same position merge.
    pub(crate) fn expect_label(&mut self, name: &str) {
        self.raise(ErrorKind::Expect, Some(name));
    }

    /// Runs `f` with error recording turned off, restoring the previous
    /// setting on the way out.
    pub(crate) fn suppressing<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.suppressed;
        self.suppressed = true;
        let out = f(self);
        self.suppressed = saved;
        out
    }

    /// Runs `f` in delimiter mode: its errors are demoted to the lowest
    /// priority and its logical step is reset on success, so a matched
    /// delimiter never commits the surrounding repetition.
    pub(crate) fn delimiting<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved_mode = self.delimiting;
        let saved_step = self.step;
        self.delimiting = true;
        let out = f(self);
        self.delimiting = saved_mode;
        if out.is_some() {
            self.step = saved_step;
        }
        out
    }

    /// Runs `f` with the character input truncated to `end`, restoring the
    /// full view afterwards. Used for nested scanning of an already-matched
    /// range.
    pub(crate) fn truncated<T>(
        &mut self,
        end: usize,
        f: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let full = self.chars();
        self.input = Input::Chars(&full[..end]);
        let out = f(self);
        self.input = Input::Chars(full);
        out
    }

    /// Human description of the input between two cursor positions.
    pub(crate) fn describe_span(&self, from: usize, to: usize) -> String {
        match &self.input {
            Input::Chars(src) => src[from.min(src.len())..to.min(src.len())].to_owned(),
            Input::Tokens(tokens) => tokens
                .get(from..to.min(tokens.len()))
                .unwrap_or_default()
                .iter()
                .map(|t| t.value().describe())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    // Trace hooks, no-ops outside debug mode.

    pub(crate) fn trace_push(&mut self, name: &str) {
        let offset = self.to_offset(self.at);
        if let Some(trace) = &mut self.trace {
            trace.push(name, offset);
        }
    }

    pub(crate) fn trace_ok(&mut self, value: Option<String>) {
        let offset = self.to_offset(self.at);
        if let Some(trace) = &mut self.trace {
            trace.pop_success(offset, value);
        }
    }

    pub(crate) fn trace_fail(&mut self) {
        if let Some(trace) = &mut self.trace {
            trace.pop_failure();
        }
    }

    /// Lexes already happened in `self`; runs `f` over the produced tokens
    /// in a child context and translates its outcome back. On failure the
    /// child's error arrives at the character offset of the offending token.
    pub(crate) fn nested<T>(
        &mut self,
        tokens: Vec<Token>,
        f: impl FnOnce(&mut ParseContext<'s>) -> Option<T>,
    ) -> Option<T> {
        let mut child = ParseContext::over_tokens(self.src, tokens, false);
        child.trace = self.trace.take();
        let out = f(&mut child);
        self.trace = child.trace.take();
        if out.is_some() {
            self.step += child.step;
        } else {
            let offset = child.to_offset(child.error.at);
            let encountered = child.describe_at(child.error.at);
            self.absorb_child_error(&child.error, offset, encountered);
        }
        out
    }

    /// The child's failure replaces the outer error state unconditionally:
    /// whatever the lexer recorded while scanning (typically a rolled-back
    /// attempt at end of input) describes positions the token grammar
    /// already parsed past.
    fn absorb_child_error(&mut self, child: &ErrorState, offset: usize, encountered: String) {
        if self.suppressed {
            return;
        }
        self.error.at = offset;
        self.error.kind = child.kind;
        self.error.candidates = child.candidates.clone();
        self.encountered = Some(encountered);
    }

    /// Raises "EOF expected" if input remains; used by the entry points.
    pub(crate) fn expect_eof(&mut self) -> bool {
        if self.is_eof() {
            return true;
        }
        let what = CompactString::from(self.describe_at(self.at));
        self.raise(ErrorKind::Unexpected, Some(&what));
        false
    }

    /// Resolves the accumulated error state into a public error.
    pub(crate) fn into_error(mut self) -> ParseError {
        let offset = self.to_offset(self.error.at);
        let encountered = self
            .encountered
            .take()
            .unwrap_or_else(|| self.describe_at(self.error.at));
        let tree = self.trace.take().map(|trace| trace.freeze(self.src, offset));
        ParseError::resolve(&self.error, self.src, offset, encountered, tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenValue;

    #[test]
    fn char_cursor_and_steps() {
        let mut ctx = ParseContext::new("abc", false);
        assert_eq!(ctx.describe_at(ctx.at()), "a");
        ctx.advance_bytes(1);
        assert_eq!(ctx.at(), 1);
        assert_eq!(ctx.step(), 1);
        assert!(!ctx.is_eof());
        ctx.advance_bytes(2);
        assert!(ctx.is_eof());
    }

    #[test]
    fn still_there_rolls_back_only_without_steps() {
        let mut ctx = ParseContext::new("abcd", false);
        let (at, step) = (ctx.at(), ctx.step());
        ctx.at = 2;
        assert!(ctx.still_there(at, step));
        assert_eq!(ctx.at(), 0);

        ctx.advance_bytes(1);
        assert!(!ctx.still_there(at, step));
        assert_eq!(ctx.at(), 1);
    }

    #[test]
    fn suppression_scopes() {
        let mut ctx = ParseContext::new("abc", false);
        ctx.suppressing(|ctx| ctx.expected("digit"));
        assert_eq!(ctx.error.kind, ErrorKind::None);
        ctx.expected("digit");
        assert_eq!(ctx.error.kind, ErrorKind::Expected);
    }

    #[test]
    fn delimiting_demotes_and_resets_step() {
        let mut ctx = ParseContext::new("abc", false);
        let out: Option<()> = ctx.delimiting(|ctx| {
            ctx.advance_bytes(1);
            ctx.expected("comma");
            Some(())
        });
        assert!(out.is_some());
        assert_eq!(ctx.step(), 0);
        assert_eq!(ctx.error.kind, ErrorKind::Trap);
        assert_eq!(ctx.at(), 1);
    }

    #[test]
    #[should_panic(expected = "token-level parser applied to character input")]
    fn token_access_on_chars_panics() {
        let ctx = ParseContext::new("abc", false);
        let _ = ctx.tokens();
    }

    #[test]
    fn nested_error_translates_to_char_offset() {
        let mut ctx = ParseContext::new("foo bar", false);
        let tokens = vec![
            Token::new(0, 3, TokenValue::Identifier("foo".into())),
            Token::new(4, 3, TokenValue::Identifier("bar".into())),
        ];
        let out: Option<()> = ctx.nested(tokens, |child| {
            child.advance_token();
            child.expected("operator");
            None
        });
        assert!(out.is_none());
        assert_eq!(ctx.error.at, 4);
        assert_eq!(ctx.encountered.as_deref(), Some("bar"));
    }
}
