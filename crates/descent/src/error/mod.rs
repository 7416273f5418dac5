//! Error taxonomy, merge policy and reporting.
//!
//! During a parse a single [`ErrorState`] tracks the most relevant failure
//! seen so far: the one furthest into the input, with kind priority breaking
//! ties and same-kind mergeable errors accumulating their candidate
//! messages. At the end of a failed parse the state is resolved against the
//! source into a [`ParseError`] with a 1-based line/column [`Location`].

mod locate;

pub use locate::locate;

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;
use thiserror::Error;

/// Failure categories, ordered by reporting priority (lowest first).
///
/// When two errors sit at the same input offset the higher kind wins;
/// `Expected` and `Expect` additionally merge their candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKind {
    /// No error recorded.
    None,
    /// Lowest-priority failure: programmatic `never()` and delimiter-mode
    /// mismatches, which should not displace real grammar errors.
    Trap,
    /// An input element that should not be here ("unexpected X").
    Unexpected,
    /// A named alternative that failed to match ("X expected").
    Expected,
    /// A labeled production that failed ("X expected", raised by `label`).
    Expect,
    /// An explicit `fail(message)`, reported verbatim.
    Failure,
}

impl ErrorKind {
    /// Same-offset, same-kind errors of these kinds accumulate candidates.
    #[must_use]
    pub const fn mergeable(self) -> bool {
        matches!(self, Self::Expected | Self::Expect)
    }
}

/// The furthest-progress error accumulator threaded through a parse.
#[derive(Debug, Clone)]
pub(crate) struct ErrorState {
    pub(crate) kind: ErrorKind,
    pub(crate) at: usize,
    /// Candidate messages for the mergeable kinds, first-seen order.
    pub(crate) candidates: SmallVec<[CompactString; 4]>,
}

impl ErrorState {
    pub(crate) fn new() -> Self {
        Self { kind: ErrorKind::None, at: 0, candidates: SmallVec::new() }
    }

    /// Records a failure of `kind` at `at` with message `what`, keeping
    /// whichever of the old and new errors ranks higher. Returns whether
    /// the recorded error was displaced, so callers can drop descriptions
    /// tied to the old one.
    pub(crate) fn raise(&mut self, kind: ErrorKind, at: usize, what: Option<&str>) -> bool {
        if at < self.at {
            return false;
        }
        if at > self.at || kind > self.kind {
            self.at = at;
            self.kind = kind;
            self.candidates.clear();
            if let Some(what) = what {
                self.candidates.push(CompactString::from(what));
            }
            return true;
        }
        if kind == self.kind && kind.mergeable() {
            if let Some(what) = what {
                self.candidates.push(CompactString::from(what));
            }
        }
        false
    }
}

/// 1-based line and column of an offset in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong, mirroring the error kinds that survive to the end of a
/// parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetails {
    /// One or more alternatives were expected here.
    Expected(Vec<String>),
    /// The input element here should not appear.
    Unexpected(String),
    /// An explicit failure message.
    Failure(String),
    /// The parse failed without recording any error.
    Incomplete,
}

/// A failed parse, located and described.
///
/// `Display` renders the location header followed by the failure line, e.g.
///
/// ```text
/// line 1, column 5:
/// digit, ( expected, ; encountered.
/// ```
#[derive(Debug, Clone, Error)]
#[error("{}:\n{}", .location, render(.details, .encountered))]
pub struct ParseError {
    /// Byte offset of the failure in the original source.
    pub offset: usize,
    pub location: Location,
    /// Description of the input found at the failure point, or `"EOF"`.
    pub encountered: String,
    pub details: ErrorDetails,
    /// Partial parse tree, present when parsing in debug mode.
    pub tree: Option<crate::tree::ParseTree>,
}

impl ParseError {
    pub(crate) fn resolve(
        state: &ErrorState,
        src: &str,
        offset: usize,
        encountered: String,
        tree: Option<crate::tree::ParseTree>,
    ) -> Self {
        let details = match state.kind {
            ErrorKind::None => ErrorDetails::Incomplete,
            ErrorKind::Failure => ErrorDetails::Failure(
                state.candidates.first().map(ToString::to_string).unwrap_or_default(),
            ),
            ErrorKind::Unexpected => ErrorDetails::Unexpected(
                state.candidates.first().map(ToString::to_string).unwrap_or_default(),
            ),
            ErrorKind::Trap | ErrorKind::Expected | ErrorKind::Expect => {
                let candidates = dedup(&state.candidates);
                if candidates.is_empty() {
                    ErrorDetails::Incomplete
                } else {
                    ErrorDetails::Expected(candidates)
                }
            }
        };
        Self { offset, location: locate(src, offset), encountered, details, tree }
    }
}

#[cfg(feature = "diagnostics")]
impl miette::Diagnostic for ParseError {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let label = match &self.details {
            ErrorDetails::Expected(names) => format!("{} expected", join(names)),
            ErrorDetails::Unexpected(what) => format!("unexpected {what}"),
            ErrorDetails::Failure(message) => message.clone(),
            ErrorDetails::Incomplete => "parse failed here".to_owned(),
        };
        Some(Box::new(std::iter::once(miette::LabeledSpan::at(
            self.offset..self.offset,
            label,
        ))))
    }
}

fn dedup(candidates: &[CompactString]) -> Vec<String> {
    let mut seen = Vec::new();
    for c in candidates {
        if !seen.iter().any(|s| s == c.as_str()) {
            seen.push(c.to_string());
        }
    }
    seen
}

/// Joins candidates as `a, b or c`.
fn join(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn render(details: &ErrorDetails, encountered: &str) -> String {
    match details {
        ErrorDetails::Expected(names) => {
            format!("{} expected, {encountered} encountered.", join(names))
        }
        ErrorDetails::Unexpected(what) => format!("unexpected {what}."),
        ErrorDetails::Failure(message) => message.clone(),
        ErrorDetails::Incomplete => format!("cannot parse, {encountered} encountered."),
    }
}
