//! Debug parse trees.
//!
//! In debug mode every labeled production pushes a node into a flat arena on
//! entry and pops it on exit. Nodes address each other by index; a parent's
//! children vector doubles as the undo log, so backtracking out of a failed
//! production just truncates that vector and leaves the dead nodes orphaned
//! in the arena. When the parse finishes (or fails) the arena is frozen into
//! an immutable [`ParseTree`].

use compact_str::CompactString;

/// One node of the frozen tree.
///
/// Children tile the node's span: gaps between labeled children are filled
/// with anonymous nodes (empty `name`) covering the skipped text. Leaves
/// carry the matched source text as their `value` unless the production
/// recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseTree {
    pub name: String,
    /// Byte offset where the production began.
    pub begin: usize,
    /// Byte offset just past the matched text.
    pub end: usize,
    /// `Debug` rendering of the production's value, or the matched text for
    /// leaves, or `None` for an unfinished node in an error tree.
    pub value: Option<String>,
    pub children: Vec<ParseTree>,
}

struct TraceNode {
    name: CompactString,
    begin: usize,
    end: Option<usize>,
    value: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// The mutable arena a parse writes trace nodes into.
pub(crate) struct TraceArena {
    nodes: Vec<TraceNode>,
    current: usize,
}

impl TraceArena {
    pub(crate) fn new() -> Self {
        let root = TraceNode {
            name: CompactString::const_new("root"),
            begin: 0,
            end: None,
            value: None,
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root], current: 0 }
    }

    /// Opens a labeled production at `begin` and descends into it.
    pub(crate) fn push(&mut self, name: &str, begin: usize) {
        let index = self.nodes.len();
        self.nodes.push(TraceNode {
            name: CompactString::from(name),
            begin,
            end: None,
            value: None,
            parent: Some(self.current),
            children: Vec::new(),
        });
        self.nodes[self.current].children.push(index);
        self.current = index;
    }

    /// Closes the current production successfully.
    pub(crate) fn pop_success(&mut self, end: usize, value: Option<String>) {
        let node = &mut self.nodes[self.current];
        node.end = Some(end);
        node.value = value;
        if let Some(parent) = node.parent {
            self.current = parent;
        }
    }

    /// Abandons the current production: detaches it from its parent and
    /// climbs back out. The node and its subtree stay orphaned in the arena.
    pub(crate) fn pop_failure(&mut self) {
        let abandoned = self.current;
        if let Some(parent) = self.nodes[abandoned].parent {
            self.current = parent;
            let children = &mut self.nodes[parent].children;
            if children.last() == Some(&abandoned) {
                children.pop();
            }
        }
    }

    /// Closes every still-open node at `offset` and materializes the tree.
    /// For an error tree the partially-built current chain is kept, ending
    /// at the failure offset.
    pub(crate) fn freeze(mut self, src: &str, offset: usize) -> ParseTree {
        let mut index = Some(self.current);
        while let Some(i) = index {
            if self.nodes[i].end.is_none() {
                self.nodes[i].end = Some(offset);
            }
            index = self.nodes[i].parent;
        }
        self.materialize(0, src)
    }

    fn materialize(&self, index: usize, src: &str) -> ParseTree {
        let node = &self.nodes[index];
        let begin = node.begin;
        let end = node.end.unwrap_or(begin).max(begin);
        let mut children = Vec::new();
        let mut cursor = begin;
        for &child in &node.children {
            let built = self.materialize(child, src);
            if built.begin > cursor {
                children.push(stub(src, cursor, built.begin));
            }
            cursor = built.end.max(cursor);
            children.push(built);
        }
        if !children.is_empty() && cursor < end {
            children.push(stub(src, cursor, end));
        }
        let value = match &node.value {
            Some(v) => Some(v.clone()),
            None if children.is_empty() && end > begin => Some(src[begin..end].to_owned()),
            None => None,
        };
        ParseTree { name: node.name.to_string(), begin, end, value, children }
    }
}

fn stub(src: &str, begin: usize, end: usize) -> ParseTree {
    ParseTree {
        name: String::new(),
        begin,
        end,
        value: Some(src[begin..end].to_owned()),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_tile_the_span_with_stubs() {
        let src = "ab cd!";
        let mut arena = TraceArena::new();
        arena.push("first", 0);
        arena.pop_success(2, None);
        arena.push("second", 3);
        arena.pop_success(5, Some("CD".to_owned()));
        let tree = arena.freeze(src, 6);

        assert_eq!(tree.name, "root");
        assert_eq!((tree.begin, tree.end), (0, 6));
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["first", "", "second", ""]);
        assert_eq!(tree.children[0].value.as_deref(), Some("ab"));
        assert_eq!(tree.children[1].value.as_deref(), Some(" "));
        assert_eq!(tree.children[2].value.as_deref(), Some("CD"));
        assert_eq!(tree.children[3].value.as_deref(), Some("!"));

        let mut cursor = tree.begin;
        for child in &tree.children {
            assert_eq!(child.begin, cursor);
            cursor = child.end;
        }
        assert_eq!(cursor, tree.end);
    }

    #[test]
    fn backtracking_discards_the_failed_branch() {
        let mut arena = TraceArena::new();
        arena.push("kept", 0);
        arena.pop_success(1, None);
        arena.push("failed", 1);
        arena.push("inner", 1);
        arena.pop_success(2, None);
        arena.pop_failure();
        let tree = arena.freeze("abc", 1);

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "kept");
    }

    #[test]
    fn error_tree_keeps_the_open_chain() {
        let mut arena = TraceArena::new();
        arena.push("stmt", 0);
        arena.push("expr", 2);
        let tree = arena.freeze("ab cdef", 4);

        assert_eq!(tree.end, 4);
        let stmt = &tree.children[0];
        assert_eq!(stmt.name, "stmt");
        assert_eq!(stmt.end, 4);
        let expr = stmt.children.iter().find(|c| c.name == "expr").unwrap();
        assert_eq!((expr.begin, expr.end), (2, 4));
    }
}
