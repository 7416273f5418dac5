//! Free-function combinators and the lazy reference for recursive grammars.

use std::sync::{Arc, OnceLock};

use crate::token::{Token, TokenValue};

use super::{ParseContext, Parser};

/// Always succeeds with a clone of `value`, consuming nothing.
pub fn constant<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::wrap(move |_| Some(value.clone()))
}

/// Always succeeds with `()`, consuming nothing.
#[must_use]
pub fn always() -> Parser<()> {
    Parser::wrap(|_| Some(()))
}

/// Always fails, recording only a lowest-priority trap so real grammar
/// errors are not displaced.
#[must_use]
pub fn never<T: 'static>() -> Parser<T> {
    Parser::wrap(|ctx| {
        ctx.trap();
        None
    })
}

/// Always fails with `message`, reported verbatim at the failure point.
pub fn fail<T: 'static>(message: &str) -> Parser<T> {
    let message = message.to_owned();
    Parser::wrap(move |ctx| {
        ctx.fail(&message);
        None
    })
}

/// Succeeds at end of input only.
#[must_use]
pub fn eof() -> Parser<()> {
    Parser::wrap(|ctx| {
        if ctx.is_eof() {
            Some(())
        } else {
            ctx.expected("EOF");
            None
        }
    })
}

/// Yields the current byte offset in the original source.
#[must_use]
pub fn index() -> Parser<usize> {
    Parser::wrap(|ctx| Some(ctx.to_offset(ctx.at)))
}

/// First succeeding alternative wins; each failed alternative is rolled
/// back unconditionally before the next is tried.
pub fn or<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    Parser::wrap(move |ctx| {
        let (at, step) = (ctx.at, ctx.step);
        for p in &alternatives {
            if let Some(value) = p.run(ctx) {
                return Some(value);
            }
            ctx.set(at, step);
        }
        None
    })
}

/// Like [`or`], but an alternative that failed after making a logical step
/// has committed: its failure propagates and later alternatives never run.
pub fn plus<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    Parser::wrap(move |ctx| {
        let (at, step) = (ctx.at, ctx.step);
        for p in &alternatives {
            if let Some(value) = p.run(ctx) {
                return Some(value);
            }
            if !ctx.still_there(at, step) {
                return None;
            }
        }
        None
    })
}

/// Runs every alternative from the same start and keeps the one that
/// consumed the most input.
pub fn longest<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    best(alternatives, |candidate, best| candidate > best)
}

/// Runs every alternative from the same start and keeps the one that
/// consumed the least input.
pub fn shortest<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    best(alternatives, |candidate, best| candidate < best)
}

fn best<T: 'static>(
    alternatives: Vec<Parser<T>>,
    better: impl Fn(usize, usize) -> bool + Send + Sync + 'static,
) -> Parser<T> {
    Parser::wrap(move |ctx| {
        let (at, step) = (ctx.at, ctx.step);
        let mut found: Option<(T, usize, usize)> = None;
        for p in &alternatives {
            ctx.set(at, step);
            if let Some(value) = p.run(ctx) {
                let replace = match &found {
                    None => true,
                    Some((_, best_at, _)) => better(ctx.at, *best_at),
                };
                if replace {
                    found = Some((value, ctx.at, ctx.step));
                }
            }
        }
        match found {
            Some((value, best_at, best_step)) => {
                ctx.set(best_at, best_step);
                Some(value)
            }
            None => {
                ctx.set(at, step);
                None
            }
        }
    })
}

/// Runs `parsers` in order, collecting their values.
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<Vec<T>> {
    Parser::wrap(move |ctx| {
        let mut out = Vec::with_capacity(parsers.len());
        for p in &parsers {
            out.push(p.run(ctx)?);
        }
        Some(out)
    })
}

/// `open`, then `item`, then `close`, keeping `item`'s value.
#[must_use]
pub fn between<A: 'static, T: 'static, B: 'static>(
    open: &Parser<A>,
    item: &Parser<T>,
    close: &Parser<B>,
) -> Parser<T> {
    item.between(open, close)
}

/// The token-level primitive: reads one token through `f`, failing with
/// "`name` expected" when `f` rejects it or at end of input.
pub fn token<T: 'static>(
    name: impl Into<String>,
    f: impl Fn(&Token) -> Option<T> + Send + Sync + 'static,
) -> Parser<T> {
    let name = name.into();
    Parser::wrap(move |ctx| {
        match ctx.peek_token().and_then(&f) {
            Some(value) => {
                ctx.advance_token();
                Some(value)
            }
            None => {
                ctx.expected(&name);
                None
            }
        }
    })
}

/// Matches one token whose value equals `value` exactly.
#[must_use]
pub fn token_value(value: TokenValue) -> Parser<Token> {
    let name = value.describe();
    token(name, move |t| (*t.value() == value).then(|| t.clone()))
}

/// Matches any one token.
#[must_use]
pub fn any_token() -> Parser<Token> {
    token("token", |t| Some(t.clone()))
}

/// A set-once cell that lets a grammar refer to a parser before it is
/// defined, closing recursive cycles.
///
/// ```
/// use descent::parser::{self, ParserRef};
/// use descent::scan;
///
/// let expr_ref: ParserRef<i64> = ParserRef::new();
/// let atom = scan::integer().map(|s| s.parse::<i64>().unwrap_or(0));
/// let parens = expr_ref.parser().between(&scan::is_char('('), &scan::is_char(')'));
/// expr_ref.set(parser::or(vec![atom, parens]));
/// assert_eq!(expr_ref.parser().parse("((42))").unwrap(), 42);
/// ```
pub struct ParserRef<T> {
    cell: Arc<OnceLock<Parser<T>>>,
}

impl<T> Clone for ParserRef<T> {
    fn clone(&self) -> Self {
        Self { cell: Arc::clone(&self.cell) }
    }
}

impl<T: 'static> ParserRef<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { cell: Arc::new(OnceLock::new()) }
    }

    /// Defines the referenced parser. Panics if called twice.
    pub fn set(&self, parser: Parser<T>) {
        assert!(
            self.cell.set(parser).is_ok(),
            "lazy parser reference set twice"
        );
    }

    /// A parser that delegates to the definition. Using it in a parse
    /// before [`ParserRef::set`] panics.
    #[must_use]
    pub fn parser(&self) -> Parser<T> {
        let cell = Arc::clone(&self.cell);
        Parser::wrap(move |ctx: &mut ParseContext<'_>| {
            let parser = cell.get().expect("lazy parser reference used before it was set");
            parser.run(ctx)
        })
    }
}

impl<T: 'static> Default for ParserRef<T> {
    fn default() -> Self {
        Self::new()
    }
}
