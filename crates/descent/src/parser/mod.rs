//! The combinator algebra.
//!
//! A [`Parser<T>`] is an immutable, cheaply cloneable handle around a run
//! function over [`ParseContext`]. Parsers own no parse state, so one parser
//! graph can be shared across threads and reused for any number of
//! independent parses.
//!
//! # Overview
//!
//! Three ideas carry the whole module:
//!
//! - a parser either returns `Some(value)` with the cursor advanced past
//!   what it matched, or `None` with its failure recorded in the context;
//! - the logical step counter separates rollback-safe failures from
//!   committed ones: [`Parser::or`] falls back unconditionally,
//!   [`Parser::otherwise`] and the repetition loops only when the failed
//!   attempt made no step, and [`Parser::atomic`] collapses a whole
//!   sub-parse into a single step;
//! - character-level and token-level parsers are the same type, bridged by
//!   [`Parser::from_lexer`]; mixing levels without the bridge is a
//!   configuration bug and panics.

mod combinators;
mod context;

pub use combinators::{
    always, any_token, between, constant, eof, fail, index, longest, never, or, plus, sequence,
    shortest, token, token_value, ParserRef,
};
pub use context::ParseContext;

use std::fmt;
use std::sync::Arc;

use crate::error::ParseError;
use crate::token::{Token, TokenValue};
use crate::tree::ParseTree;

/// Whether a parse records a trace tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No tracing; the fast path.
    Production,
    /// Labeled productions are recorded; errors carry a partial parse tree.
    Debug,
}

/// A unary operator as parsed by an operator table.
pub type Unary<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
/// A binary operator as parsed by an operator table.
pub type Binary<T> = Arc<dyn Fn(T, T) -> T + Send + Sync>;

/// A composable parser producing a `T`.
pub struct Parser<T> {
    run: Arc<dyn for<'s> Fn(&mut ParseContext<'s>) -> Option<T> + Send + Sync>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self { run: Arc::clone(&self.run) }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser")
    }
}

impl<T: 'static> Parser<T> {
    pub(crate) fn wrap(
        run: impl for<'s> Fn(&mut ParseContext<'s>) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self { run: Arc::new(run) }
    }

    #[inline]
    pub(crate) fn run(&self, ctx: &mut ParseContext<'_>) -> Option<T> {
        (self.run)(ctx)
    }

    // Entry points.

    /// Parses `src` completely, reporting the furthest-progress error on
    /// failure. Trailing unconsumed input is an error.
    pub fn parse(&self, src: &str) -> Result<T, ParseError> {
        self.parse_in_mode(src, Mode::Production)
    }

    /// Like [`Parser::parse`], optionally recording a trace tree that a
    /// failed parse carries in [`ParseError::tree`].
    pub fn parse_in_mode(&self, src: &str, mode: Mode) -> Result<T, ParseError> {
        let _span = tracing::trace_span!("parse", len = src.len()).entered();
        let mut ctx = ParseContext::new(src, mode == Mode::Debug);
        match self.run(&mut ctx) {
            Some(value) if ctx.expect_eof() => Ok(value),
            _ => Err(ctx.into_error()),
        }
    }

    /// Parses `src` in debug mode and returns the trace tree of the
    /// successful parse.
    pub fn parse_tree(&self, src: &str) -> Result<ParseTree, ParseError> {
        let mut ctx = ParseContext::new(src, true);
        match self.run(&mut ctx) {
            Some(_) if ctx.expect_eof() => {
                let offset = ctx.to_offset(ctx.at);
                let trace = ctx.trace.take().unwrap_or_else(crate::tree::TraceArena::new);
                Ok(trace.freeze(ctx.src(), offset))
            }
            _ => Err(ctx.into_error()),
        }
    }

    // Sequencing.

    /// Runs `self`, discards its value and runs `next`.
    #[must_use]
    pub fn then<U: 'static>(&self, next: &Parser<U>) -> Parser<U> {
        let (first, second) = (self.clone(), next.clone());
        Parser::wrap(move |ctx| {
            first.run(ctx)?;
            second.run(ctx)
        })
    }

    /// Runs `self`, then `next`, keeping the first value.
    #[must_use]
    pub fn followed_by<U: 'static>(&self, next: &Parser<U>) -> Parser<T> {
        let (first, second) = (self.clone(), next.clone());
        Parser::wrap(move |ctx| {
            let value = first.run(ctx)?;
            second.run(ctx)?;
            Some(value)
        })
    }

    /// Succeeds with `self`'s value only if `next` cannot match afterwards;
    /// the lookahead consumes nothing.
    #[must_use]
    pub fn not_followed_by<U: 'static>(&self, next: &Parser<U>) -> Parser<T> {
        self.followed_by(&next.clone().not())
    }

    /// Monadic sequencing: the second parser depends on the first value.
    #[must_use]
    pub fn bind<U: 'static>(
        &self,
        f: impl Fn(T) -> Parser<U> + Send + Sync + 'static,
    ) -> Parser<U> {
        let first = self.clone();
        Parser::wrap(move |ctx| {
            let value = first.run(ctx)?;
            f(value).run(ctx)
        })
    }

    /// Replaces the value with `value`.
    #[must_use]
    pub fn to<U>(&self, value: U) -> Parser<U>
    where
        U: Clone + Send + Sync + 'static,
    {
        self.map(move |_| value.clone())
    }

    /// `open`, then `self`, then `close`, keeping `self`'s value.
    #[must_use]
    pub fn between<A: 'static, B: 'static>(&self, open: &Parser<A>, close: &Parser<B>) -> Parser<T> {
        open.then(&self.followed_by(close))
    }

    /// Character-level only: `open`, then `self` over the shortest tail that
    /// lets `close` match, scanning backward from the end of input for the
    /// closing delimiter.
    ///
    /// Quadratic in the worst case and unable to see past the last
    /// plausible closer. Prefer [`Parser::between`] with an unambiguous
    /// grammar.
    #[deprecated(note = "best-effort matching; prefer `between`")]
    #[must_use]
    pub fn reluctant_between<A: 'static, B: 'static>(
        &self,
        open: &Parser<A>,
        close: &Parser<B>,
    ) -> Parser<T> {
        let (open, inner, close) = (open.clone(), self.clone(), close.clone());
        Parser::wrap(move |ctx| {
            open.run(ctx)?;
            let begin = ctx.at;
            let step = ctx.step;
            let src = ctx.chars();
            for i in (begin..=src.len()).rev() {
                if !src.is_char_boundary(i) {
                    continue;
                }
                ctx.set(i, step);
                let closed = ctx.suppressing(|ctx| close.run(ctx)).is_some();
                if !closed {
                    continue;
                }
                let (close_at, close_step) = (ctx.at, ctx.step);
                ctx.set(begin, step);
                let value = ctx.suppressing(|ctx| {
                    ctx.truncated(i, |ctx| {
                        let value = inner.run(ctx)?;
                        ctx.is_eof().then_some(value)
                    })
                });
                if let Some(value) = value {
                    ctx.set(close_at, close_step);
                    return Some(value);
                }
            }
            ctx.set(begin, step);
            ctx.expected("closing delimiter");
            None
        })
    }

    // Repetition. Loops snapshot the cursor and step per iteration: a
    // failing iteration that made no step rolls back and ends the loop, one
    // that stepped propagates the failure. A zero-width match also ends the
    // loop, dropping its value.

    #[must_use]
    pub fn many(&self) -> Parser<Vec<T>> {
        self.at_least(0)
    }

    #[must_use]
    pub fn many1(&self) -> Parser<Vec<T>> {
        self.at_least(1)
    }

    #[must_use]
    pub fn at_least(&self, min: usize) -> Parser<Vec<T>> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let mut out = Vec::new();
            run_exactly(&p, ctx, min, &mut out)?;
            run_greedy(&p, ctx, usize::MAX, &mut out)?;
            Some(out)
        })
    }

    /// Exactly `n` occurrences.
    #[must_use]
    pub fn times(&self, n: usize) -> Parser<Vec<T>> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let mut out = Vec::new();
            run_exactly(&p, ctx, n, &mut out)?;
            Some(out)
        })
    }

    /// Between `min` and `max` occurrences.
    #[must_use]
    pub fn times_between(&self, min: usize, max: usize) -> Parser<Vec<T>> {
        assert!(min <= max, "min > max");
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let mut out = Vec::new();
            run_exactly(&p, ctx, min, &mut out)?;
            run_greedy(&p, ctx, max - min, &mut out)?;
            Some(out)
        })
    }

    #[must_use]
    pub fn skip_many(&self) -> Parser<()> {
        self.skip_at_least(0)
    }

    #[must_use]
    pub fn skip_many1(&self) -> Parser<()> {
        self.skip_at_least(1)
    }

    #[must_use]
    pub fn skip_at_least(&self, min: usize) -> Parser<()> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            skip_exactly(&p, ctx, min)?;
            skip_greedy(&p, ctx)
        })
    }

    #[must_use]
    pub fn skip_times(&self, n: usize) -> Parser<()> {
        let p = self.clone();
        Parser::wrap(move |ctx| skip_exactly(&p, ctx, n))
    }

    /// One or more occurrences separated by `delim`. The delimiter runs in
    /// delimiter mode, so a trailing delimiter rolls back instead of
    /// committing the list.
    #[must_use]
    pub fn sep_by1<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        let (item, rest) = (self.clone(), self.delimited_unit(delim));
        Parser::wrap(move |ctx| {
            let mut out = vec![item.run(ctx)?];
            run_greedy(&rest, ctx, usize::MAX, &mut out)?;
            Some(out)
        })
    }

    /// Zero or more occurrences separated by `delim`.
    #[must_use]
    pub fn sep_by<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        or_empty(self.sep_by1(delim))
    }

    /// One or more occurrences, each followed by `delim`.
    #[must_use]
    pub fn end_by1<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        self.followed_by(delim).many1()
    }

    /// Zero or more occurrences, each followed by `delim`.
    #[must_use]
    pub fn end_by<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        self.followed_by(delim).many()
    }

    /// Like [`Parser::sep_by1`] but tolerating one trailing delimiter.
    #[must_use]
    pub fn sep_end_by1<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        let (list, delim) = (self.sep_by1(delim), delim.clone());
        Parser::wrap(move |ctx| {
            let out = list.run(ctx)?;
            let (at, step) = (ctx.at, ctx.step);
            if ctx.delimiting(|ctx| delim.run(ctx)).is_none() {
                ctx.set(at, step);
            }
            Some(out)
        })
    }

    /// Like [`Parser::sep_by`] but tolerating one trailing delimiter.
    #[must_use]
    pub fn sep_end_by<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<T>> {
        or_empty(self.sep_end_by1(delim))
    }

    /// Repeats `self` until `cond` matches ahead; `cond` is not consumed.
    #[must_use]
    pub fn until<U: 'static>(&self, cond: &Parser<U>) -> Parser<Vec<T>> {
        cond.clone().not().then(self).many().followed_by(&cond.clone().peek())
    }

    fn delimited_unit<D: 'static>(&self, delim: &Parser<D>) -> Parser<T> {
        let (item, delim) = (self.clone(), delim.clone());
        Parser::wrap(move |ctx| {
            ctx.delimiting(|ctx| delim.run(ctx))?;
            item.run(ctx)
        })
    }

    // Alternation.

    /// Tries `self`; on failure restores the cursor unconditionally and
    /// tries `other`.
    #[must_use]
    pub fn or(&self, other: &Parser<T>) -> Parser<T> {
        or(vec![self.clone(), other.clone()])
    }

    /// Tries `self`; falls back to `other` only if the failure made no
    /// logical step. A partial match propagates its own error instead of
    /// being masked by the alternative.
    #[must_use]
    pub fn otherwise(&self, other: &Parser<T>) -> Parser<T> {
        plus(vec![self.clone(), other.clone()])
    }

    /// `self`, or `default` without consuming anything.
    #[must_use]
    pub fn optional(&self, default: T) -> Parser<T>
    where
        T: Clone + Send + Sync,
    {
        self.or(&constant(default))
    }

    /// `self` wrapped in `Option`, succeeding either way.
    #[must_use]
    pub fn opt(&self) -> Parser<Option<T>> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            match p.run(ctx) {
                Some(value) => Some(Some(value)),
                None => {
                    ctx.set(at, step);
                    Some(None)
                }
            }
        })
    }

    /// True if `self` matches here (consuming its match), false otherwise.
    /// Never fails; the probe records no errors.
    #[must_use]
    pub fn succeeds(&self) -> Parser<bool> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            match ctx.suppressing(|ctx| p.run(ctx)) {
                Some(_) => Some(true),
                None => {
                    ctx.set(at, step);
                    Some(false)
                }
            }
        })
    }

    /// True if `self` cannot match here. Consumes nothing either way.
    #[must_use]
    pub fn fails(&self) -> Parser<bool> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            let matched = ctx.suppressing(|ctx| p.run(ctx)).is_some();
            ctx.set(at, step);
            Some(!matched)
        })
    }

    /// Runs `self`; on success continues with `consequence` applied to the
    /// value, otherwise restores the cursor and runs `alternative`.
    #[must_use]
    pub fn if_else<U: 'static>(
        &self,
        consequence: impl Fn(T) -> Parser<U> + Send + Sync + 'static,
        alternative: &Parser<U>,
    ) -> Parser<U> {
        let (cond, alternative) = (self.clone(), alternative.clone());
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            match cond.run(ctx) {
                Some(value) => consequence(value).run(ctx),
                None => {
                    ctx.set(at, step);
                    alternative.run(ctx)
                }
            }
        })
    }

    // Lookahead and backtracking.

    /// Runs `self` and restores the cursor on success. Failures propagate
    /// with their errors.
    #[must_use]
    pub fn peek(&self) -> Parser<T> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            let value = p.run(ctx)?;
            ctx.set(at, step);
            Some(value)
        })
    }

    /// Succeeds (consuming nothing) only if `self` fails here. A match is
    /// reported as "unexpected" with the matched input quoted.
    #[must_use]
    pub fn not(&self) -> Parser<()> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            let matched = ctx.suppressing(|ctx| p.run(ctx)).is_some();
            let matched_to = ctx.at;
            ctx.set(at, step);
            if matched {
                let what = ctx.describe_span(at, matched_to);
                ctx.unexpected(&what);
                None
            } else {
                Some(())
            }
        })
    }

    /// Like [`Parser::not`] with a fixed name in the error message.
    #[must_use]
    pub fn not_labeled(&self, name: &str) -> Parser<()> {
        let (p, name) = (self.clone(), name.to_owned());
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            let matched = ctx.suppressing(|ctx| p.run(ctx)).is_some();
            ctx.set(at, step);
            if matched {
                ctx.unexpected(&name);
                None
            } else {
                Some(())
            }
        })
    }

    /// Makes `self` all-or-nothing: on failure the cursor and step roll
    /// back to the start, on success the whole match counts as one step.
    #[must_use]
    pub fn atomic(&self) -> Parser<T> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let (at, step) = (ctx.at, ctx.step);
            match p.run(ctx) {
                Some(value) => {
                    ctx.set(ctx.at, step + 1);
                    Some(value)
                }
                None => {
                    ctx.set(at, step);
                    None
                }
            }
        })
    }

    // Transformation.

    #[must_use]
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Parser<U> {
        let p = self.clone();
        Parser::wrap(move |ctx| p.run(ctx).map(&f))
    }

    /// Discards the value and yields the matched source text instead.
    #[must_use]
    pub fn source(&self) -> Parser<String> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let from = ctx.to_offset(ctx.at);
            p.run(ctx)?;
            let to = ctx.to_offset(ctx.at);
            Some(ctx.src()[from..to].to_owned())
        })
    }

    /// Pairs the value with the matched source text.
    #[must_use]
    pub fn with_source(&self) -> Parser<(T, String)> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let from = ctx.to_offset(ctx.at);
            let value = p.run(ctx)?;
            let to = ctx.to_offset(ctx.at);
            Some((value, ctx.src()[from..to].to_owned()))
        })
    }

    /// Names this production. On failure without a logical step the
    /// recorded error becomes "`name` expected"; in debug mode the
    /// production shows up as a node in the trace tree.
    #[must_use]
    pub fn label(&self, name: &str) -> Parser<T>
    where
        T: fmt::Debug,
    {
        let (p, name) = (self.clone(), name.to_owned());
        Parser::wrap(move |ctx| {
            let _span = tracing::trace_span!("production", name = name.as_str()).entered();
            let (at, step) = (ctx.at, ctx.step);
            ctx.trace_push(&name);
            match p.run(ctx) {
                Some(value) => {
                    ctx.trace_ok(Some(format!("{value:?}")));
                    Some(value)
                }
                None => {
                    ctx.trace_fail();
                    if ctx.still_there(at, step) {
                        ctx.expect_label(&name);
                    }
                    None
                }
            }
        })
    }

    // Level bridge.

    /// Runs `lexer` over the characters, then `self` over the produced
    /// tokens. `self` must consume every token; token-level errors are
    /// reported at the character offset of the offending token.
    #[must_use]
    pub fn from_lexer(&self, lexer: &Parser<Vec<Token>>) -> Parser<T> {
        let (parser, lexer) = (self.clone(), lexer.clone());
        Parser::wrap(move |ctx| {
            let tokens = lexer.run(ctx)?;
            let parser = parser.clone();
            ctx.nested(tokens, move |child| {
                let value = parser.run(child)?;
                child.expect_eof().then_some(value)
            })
        })
    }

    /// Convenience for [`Parser::from_lexer`] over
    /// `tokenizer.lexer(delim)`.
    #[must_use]
    pub fn from_tokenizer<D: 'static>(
        &self,
        tokenizer: &Parser<Token>,
        delim: &Parser<D>,
    ) -> Parser<T> {
        self.from_lexer(&tokenizer.lexer(delim))
    }

    // Operator shapes. All of them parse without left recursion and fold
    // the collected operators around the operand.

    /// `op* operand`, applying prefix operators inside-out.
    #[must_use]
    pub fn prefix(&self, op: &Parser<Unary<T>>) -> Parser<T> {
        let (operand, ops) = (self.clone(), op.many());
        Parser::wrap(move |ctx| {
            let fs = ops.run(ctx)?;
            let mut value = operand.run(ctx)?;
            for f in fs.into_iter().rev() {
                value = f(value);
            }
            Some(value)
        })
    }

    /// `operand op*`, applying postfix operators left to right.
    #[must_use]
    pub fn postfix(&self, op: &Parser<Unary<T>>) -> Parser<T> {
        let (operand, ops) = (self.clone(), op.many());
        Parser::wrap(move |ctx| {
            let mut value = operand.run(ctx)?;
            for f in ops.run(ctx)? {
                value = f(value);
            }
            Some(value)
        })
    }

    /// Left-associative infix: `a op b op c` folds as `(a op b) op c`.
    #[must_use]
    pub fn infixl(&self, op: &Parser<Binary<T>>) -> Parser<T> {
        let (operand, op) = (self.clone(), op.clone());
        Parser::wrap(move |ctx| {
            let mut acc = operand.run(ctx)?;
            loop {
                let (at, step) = (ctx.at, ctx.step);
                let Some(f) = op.run(ctx) else {
                    return ctx.still_there(at, step).then_some(acc);
                };
                match operand.run(ctx) {
                    Some(rhs) => acc = f(acc, rhs),
                    None => return ctx.still_there(at, step).then_some(acc),
                }
            }
        })
    }

    /// Right-associative infix: `a op b op c` folds as `a op (b op c)`.
    #[must_use]
    pub fn infixr(&self, op: &Parser<Binary<T>>) -> Parser<T> {
        let (operand, op) = (self.clone(), op.clone());
        Parser::wrap(move |ctx| {
            let seed = operand.run(ctx)?;
            let mut values = vec![seed];
            let mut ops: Vec<Binary<T>> = Vec::new();
            loop {
                let (at, step) = (ctx.at, ctx.step);
                let Some(f) = op.run(ctx) else {
                    if !ctx.still_there(at, step) {
                        return None;
                    }
                    break;
                };
                match operand.run(ctx) {
                    Some(rhs) => {
                        ops.push(f);
                        values.push(rhs);
                    }
                    None => {
                        if !ctx.still_there(at, step) {
                            return None;
                        }
                        break;
                    }
                }
            }
            let mut acc = values.pop()?;
            while let Some(f) = ops.pop() {
                let lhs = values.pop()?;
                acc = f(lhs, acc);
            }
            Some(acc)
        })
    }

    /// Non-associative infix: at most one operator; `a op b op c` stops
    /// after `a op b`.
    #[must_use]
    pub fn infixn(&self, op: &Parser<Binary<T>>) -> Parser<T> {
        let (operand, op) = (self.clone(), op.clone());
        Parser::wrap(move |ctx| {
            let lhs = operand.run(ctx)?;
            let (at, step) = (ctx.at, ctx.step);
            let shifted = (|| {
                let f = op.run(ctx)?;
                let rhs = operand.run(ctx)?;
                Some((f, rhs))
            })();
            match shifted {
                Some((f, rhs)) => Some(f(lhs, rhs)),
                None => {
                    ctx.set(at, step);
                    Some(lhs)
                }
            }
        })
    }
}

impl Parser<TokenValue> {
    /// Wraps the scanned value with the span it was scanned from.
    #[must_use]
    pub fn token(&self) -> Parser<Token> {
        let p = self.clone();
        Parser::wrap(move |ctx| {
            let from = ctx.at;
            let value = p.run(ctx)?;
            Some(Token::new(from, ctx.at - from, value))
        })
    }
}

impl Parser<Token> {
    /// Turns a tokenizer into a whole-input lexer: `delim* (token delim*)*`.
    #[must_use]
    pub fn lexer<D: 'static>(&self, delim: &Parser<D>) -> Parser<Vec<Token>> {
        let skip = delim.skip_many();
        skip.then(&self.followed_by(&skip).many())
    }
}

// Repetition engines shared by the list and skip variants.

fn run_exactly<T: 'static>(
    p: &Parser<T>,
    ctx: &mut ParseContext<'_>,
    n: usize,
    out: &mut Vec<T>,
) -> Option<()> {
    for _ in 0..n {
        out.push(p.run(ctx)?);
    }
    Some(())
}

fn run_greedy<T: 'static>(
    p: &Parser<T>,
    ctx: &mut ParseContext<'_>,
    max: usize,
    out: &mut Vec<T>,
) -> Option<()> {
    for _ in 0..max {
        let (at, step) = (ctx.at, ctx.step);
        match p.run(ctx) {
            None => return ctx.still_there(at, step).then_some(()),
            Some(_) if ctx.at == at => return Some(()),
            Some(value) => out.push(value),
        }
    }
    Some(())
}

fn skip_exactly<T: 'static>(p: &Parser<T>, ctx: &mut ParseContext<'_>, n: usize) -> Option<()> {
    for _ in 0..n {
        p.run(ctx)?;
    }
    Some(())
}

fn skip_greedy<T: 'static>(p: &Parser<T>, ctx: &mut ParseContext<'_>) -> Option<()> {
    loop {
        let (at, step) = (ctx.at, ctx.step);
        match p.run(ctx) {
            None => return ctx.still_there(at, step).then_some(()),
            Some(_) if ctx.at == at => return Some(()),
            Some(_) => {}
        }
    }
}

fn or_empty<T: 'static>(p: Parser<Vec<T>>) -> Parser<Vec<T>> {
    Parser::wrap(move |ctx| {
        let (at, step) = (ctx.at, ctx.step);
        match p.run(ctx) {
            Some(out) => Some(out),
            None => {
                ctx.set(at, step);
                Some(Vec::new())
            }
        }
    })
}
