//! Indentation-sensitive lexing (the off-side rule).
//!
//! [`lexer`] interleaves line-feed tokens into an ordinary token stream,
//! then rewrites it: the column of the first token on each line is compared
//! against a stack of open indentation levels, emitting zero-width
//! [`TokenValue::Indent`] / [`TokenValue::Outdent`] pseudo tokens on every
//! push and pop. Grammars match them with [`indent`] and [`outdent`].
//!
//! Blank lines never affect indentation. A line that dedents to a column
//! not on the stack closes the deeper levels and clamps to the enclosing
//! one instead of opening a new level.

use crate::parser::{or, token_value, Parser};
use crate::pattern::{CharPredicate, Pattern};
use crate::scan;
use crate::token::{Token, TokenValue};

/// Whitespace other than line feed.
#[must_use]
pub fn inline_whitespace() -> CharPredicate {
    CharPredicate::new("whitespace", |c| c != '\n' && c.is_whitespace())
}

/// One or more inline whitespaces or line continuations (a backslash,
/// optional inline whitespace, then a line feed). The token delimiter for
/// indentation-aware grammars: it never swallows a bare line feed.
#[must_use]
pub fn whitespaces() -> Parser<()> {
    let continuation = Pattern::sequence_of(vec![
        Pattern::ch('\\'),
        Pattern::many(inline_whitespace()),
        Pattern::ch('\n'),
    ]);
    let p = Pattern::many1(inline_whitespace()).or(continuation).at_least(1);
    scan::pattern(p, "whitespaces")
}

/// Matches one synthetic indent token.
#[must_use]
pub fn indent() -> Parser<Token> {
    token_value(TokenValue::Indent)
}

/// Matches one synthetic outdent token.
#[must_use]
pub fn outdent() -> Parser<Token> {
    token_value(TokenValue::Outdent)
}

/// Runs `tokenizer` (or a line feed) repeatedly, separated by `delim`, and
/// rewrites the stream with indent/outdent structure.
#[must_use]
pub fn lexer<D: 'static>(tokenizer: &Parser<Token>, delim: &Parser<D>) -> Parser<Vec<Token>> {
    let newline = scan::is_char('\n').map(|()| TokenValue::Newline).token();
    or(vec![tokenizer.clone(), newline]).lexer(delim).map(analyze)
}

/// Inserts indent/outdent pseudo tokens and drops the line-feed markers.
fn analyze(tokens: Vec<Token>) -> Vec<Token> {
    let Some(last) = tokens.last() else {
        return tokens;
    };
    let input_end = last.end_index();
    let mut result = Vec::with_capacity(tokens.len() + tokens.len() / 16);
    let mut stack: Vec<usize> = Vec::new();
    let mut fresh_line = true;
    let mut lf_index = 0;
    for token in tokens {
        if *token.value() == TokenValue::Newline {
            fresh_line = true;
            lf_index = token.end_index();
            continue;
        }
        if fresh_line {
            let column = token.index() - lf_index;
            new_line(column, token.index(), &mut stack, &mut result);
            fresh_line = false;
        }
        result.push(token);
    }
    // Close every still-open level except the outermost.
    for _ in 1..stack.len() {
        result.push(Token::new(input_end, 0, TokenValue::Outdent));
    }
    result
}

fn new_line(column: usize, at: usize, stack: &mut Vec<usize>, result: &mut Vec<Token>) {
    // The first line establishes the base level without emitting anything;
    // so does a dedent below every open level.
    if stack.is_empty() {
        stack.push(column);
        return;
    }
    let mut popped = false;
    while stack.last().is_some_and(|&top| top > column) {
        stack.pop();
        result.push(Token::new(at, 0, TokenValue::Outdent));
        popped = true;
    }
    match stack.last().copied() {
        None => stack.push(column),
        Some(top) if top < column && !popped => {
            stack.push(column);
            result.push(Token::new(at, 0, TokenValue::Indent));
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon;

    fn word_tokenizer() -> Parser<Token> {
        lexicon::identifier_tokenizer().token()
    }

    fn lex(src: &str) -> Vec<TokenValue> {
        let tokens = lexer(&word_tokenizer(), &whitespaces()).parse(src).unwrap();
        tokens.into_iter().map(Token::into_value).collect()
    }

    fn word(text: &str) -> TokenValue {
        TokenValue::Identifier(text.into())
    }

    #[test]
    fn column_sequence_marks_transitions() {
        // Columns 0, 2, 2, 4, 1.
        let got = lex("a\n  b\n  c\n    d\n e");
        let want = vec![
            word("a"),
            TokenValue::Indent,
            word("b"),
            word("c"),
            TokenValue::Indent,
            word("d"),
            TokenValue::Outdent,
            TokenValue::Outdent,
            word("e"),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn indents_and_outdents_balance_when_fully_dedented() {
        let got = lex("a\n  b\n    c\nd");
        let indents = got.iter().filter(|v| **v == TokenValue::Indent).count();
        let outdents = got.iter().filter(|v| **v == TokenValue::Outdent).count();
        assert_eq!(indents, 2);
        assert_eq!(indents, outdents);
    }

    #[test]
    fn trailing_levels_are_closed_at_the_end() {
        let got = lex("a\n  b\n    c");
        assert_eq!(
            &got[got.len() - 2..],
            &[TokenValue::Outdent, TokenValue::Outdent]
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        let got = lex("a\n  b\n\n  c");
        let want = vec![word("a"), TokenValue::Indent, word("b"), word("c")];
        // One trailing outdent closes the open level.
        assert_eq!(&got[..4], &want[..]);
        assert_eq!(got[4], TokenValue::Outdent);
    }

    #[test]
    fn indented_first_line_sets_the_base_level() {
        let got = lex("  a\n  b\nc");
        // No INDENT for the base level; dedenting below it closes nothing
        // it never opened.
        let want = vec![word("a"), word("b"), TokenValue::Outdent, word("c")];
        assert_eq!(got, want);
    }

    #[test]
    fn line_continuation_joins_lines() {
        let got = lex("a \\\n b");
        assert_eq!(got, vec![word("a"), word("b")]);
    }

    #[test]
    fn grammar_matches_pseudo_tokens() {
        let block = lexicon::identifier()
            .followed_by(&indent())
            .then(&lexicon::identifier())
            .followed_by(&outdent());
        let p = block.from_lexer(&lexer(&word_tokenizer(), &whitespaces()));
        assert_eq!(p.parse("a\n  b").unwrap(), "b");
    }
}
