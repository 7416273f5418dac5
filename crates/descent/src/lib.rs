//! # Descent
//!
//! Recursive-descent parser combinators with two-level lexing, precise
//! error reporting, and an operator-precedence builder.
//!
//! ## Overview
//!
//! Grammars are built by composing [`Parser<T>`](parser::Parser) values:
//!
//! - **Two levels, one type**: character-level scanners produce tokens, a
//!   token-level grammar consumes them, bridged by
//!   [`from_lexer`](parser::Parser::from_lexer). Errors at either level are
//!   reported against the original source with 1-based line and column.
//! - **Controlled backtracking**: a logical step counter distinguishes
//!   failures that are safe to roll back from partial matches that must
//!   commit; [`or`](parser::Parser::or),
//!   [`otherwise`](parser::Parser::otherwise) and
//!   [`atomic`](parser::Parser::atomic) pick the policy per grammar site.
//! - **Furthest-progress errors**: across any depth of alternation the
//!   reported failure is the one that got furthest into the input, with
//!   same-position expectations merged into one "a, b or c expected" list.
//! - **Expression grammars without left recursion**: register operators
//!   with precedence and associativity in an
//!   [`OperatorTable`](ops::OperatorTable) and fold them around an operand.
//! - **Off-side rule**: the [`indent`] module rewrites a token stream with
//!   synthetic indent/outdent tokens for indentation-sensitive grammars.
//! - **Debug parse trees**: parse in [`Mode::Debug`](parser::Mode) and a
//!   failed parse carries the tree of labeled productions up to the error.
//!
//! ## Quick Start
//!
//! An arithmetic evaluator over a tokenized input:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use descent::lexicon::{self, Terminals};
//! use descent::ops::OperatorTable;
//! use descent::parser::{or, Binary, ParserRef};
//! use descent::scan;
//!
//! // Vocabulary and lexer: longs, operators, whitespace in between.
//! let terms = Terminals::operators(&["+", "*", "(", ")"]);
//! let tokenizer = or(vec![lexicon::dec_as_long_tokenizer(), terms.tokenizer()]);
//! let lexer = tokenizer.token().lexer(&scan::whitespaces());
//!
//! // Token-level grammar: numbers, parentheses, then operator bands.
//! let expr_ref: ParserRef<i64> = ParserRef::new();
//! let atom = lexicon::long_literal()
//!     .or(&expr_ref.parser().between(&terms.token("("), &terms.token(")")));
//!
//! let add: Binary<i64> = Arc::new(|a, b| a + b);
//! let mul: Binary<i64> = Arc::new(|a, b| a * b);
//! let expr = OperatorTable::new()
//!     .infixl(terms.token("+").to(add), 10)
//!     .infixl(terms.token("*").to(mul), 20)
//!     .build(atom);
//! expr_ref.set(expr.clone());
//!
//! let parser = expr.from_lexer(&lexer);
//! assert_eq!(parser.parse("1 + 2 * (3 + 4)").unwrap(), 15);
//!
//! let err = parser.parse("1 + ").unwrap_err();
//! assert_eq!(err.location.line, 1);
//! assert_eq!(err.location.column, 4);
//! assert_eq!(err.encountered, "EOF");
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - the combinator core: `Parser<T>`, free functions, `Mode`
//! - [`pattern`] - allocation-light character matchers for scanners
//! - [`scan`] - pre-wired character-level scanners
//! - [`token`] - tokens, token values and literal translators
//! - [`lexicon`] - keyword/operator dictionaries and `Terminals`
//! - [`ops`] - operator-precedence table
//! - [`indent`] - indentation-sensitive lexing
//! - [`error`] - `ParseError`, locations, the error taxonomy
//! - [`tree`] - debug parse trees

pub mod error;
pub mod indent;
pub mod lexicon;
pub mod ops;
pub mod parser;
pub mod pattern;
pub mod scan;
pub mod token;
pub mod tree;

// Re-export the types almost every grammar touches.
pub use error::{ErrorDetails, ErrorKind, Location, ParseError};
pub use lexicon::{Lexicon, StringCase, Terminals};
pub use ops::OperatorTable;
pub use parser::{Mode, Parser, ParserRef};
pub use pattern::{CharPredicate, Pattern};
pub use token::{Token, TokenValue};
pub use tree::ParseTree;
