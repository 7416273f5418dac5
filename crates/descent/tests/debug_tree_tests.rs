//! Tests of debug-mode trace trees through whole parses.

use descent::lexicon;
use descent::parser::Mode;
use descent::scan;
use pretty_assertions::assert_eq;

fn pair() -> descent::Parser<String> {
    let key = scan::identifier().label("key");
    let value = scan::integer().label("value");
    key.followed_by(&scan::is_char('=')).then(&value).label("pair")
}

#[test]
fn successful_parse_tree_tiles_the_input() {
    let tree = pair().parse_tree("x=42").unwrap();
    assert_eq!(tree.name, "root");
    assert_eq!((tree.begin, tree.end), (0, 4));

    let pair = &tree.children[0];
    assert_eq!(pair.name, "pair");
    let names: Vec<&str> = pair.children.iter().map(|c| c.name.as_str()).collect();
    // The unlabeled `=` shows up as an anonymous filler between the
    // labeled children.
    assert_eq!(names, ["key", "", "value"]);
    assert_eq!(pair.children[1].value.as_deref(), Some("="));

    let mut cursor = pair.begin;
    for child in &pair.children {
        assert_eq!(child.begin, cursor);
        cursor = child.end;
    }
    assert_eq!(cursor, pair.end);
}

#[test]
fn labeled_values_are_captured() {
    let tree = pair().parse_tree("x=42").unwrap();
    let pair = &tree.children[0];
    let value = pair.children.iter().find(|c| c.name == "value").unwrap();
    assert_eq!(value.value.as_deref(), Some("\"42\""));
}

#[test]
fn production_mode_records_no_tree() {
    let err = pair().parse("x=!").unwrap_err();
    assert!(err.tree.is_none());
}

#[test]
fn failed_parse_carries_the_tree_up_to_the_error() {
    // The pair itself parses; the junk after it fails the eof check while
    // the root is still open.
    let err = pair().parse_in_mode("x=1 junk", Mode::Debug).unwrap_err();
    let tree = err.tree.expect("debug mode records a tree");
    assert_eq!(tree.end, 3);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].name, "pair");
    assert_eq!((tree.children[0].begin, tree.children[0].end), (0, 3));
}

#[test]
fn backtracked_branches_leave_no_nodes() {
    let quoted = scan::quoted('[', ']').label("bracketed");
    let word = scan::identifier().label("word");
    let tree = quoted.or(&word).parse_tree("hello").unwrap();
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["word"]);
}

#[test]
fn token_level_labels_map_to_character_offsets() {
    let lexer = lexicon::identifier_tokenizer().token().lexer(&scan::whitespaces());
    let word = lexicon::identifier().label("word");
    let p = word
        .times(2)
        .map(|words| words.join(" "))
        .label("pair")
        .from_lexer(&lexer);

    let tree = p.parse_tree("foo bar").unwrap();
    let pair = &tree.children[0];
    assert_eq!((pair.begin, pair.end), (0, 7));
    let words: Vec<_> = pair.children.iter().filter(|c| c.name == "word").collect();
    assert_eq!(words.len(), 2);
    // A token-level node ends where the next token begins.
    assert_eq!((words[0].begin, words[0].end), (0, 4));
    assert_eq!((words[1].begin, words[1].end), (4, 7));
}
