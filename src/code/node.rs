use std::fmt;
use std::ops::Range;

/// Read-only view of a node in a parsed tree together with the source text
/// it was parsed from.
///
/// Copying a `SourceNode` copies the handle, never the tree.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SourceNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> SourceNode<'t> {
    pub fn new(node: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    /// Grammar node kind, e.g. `variable_name`.
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<SourceNode<'t>> {
        self.node
            .child_by_field_name(name)
            .map(|node| SourceNode::new(node, self.source))
    }

    /// First named child of the given kind.
    pub fn child_of_kind(&self, kind: &str) -> Option<SourceNode<'t>> {
        self.named_children().into_iter().find(|c| c.kind() == kind)
    }

    pub fn named_children(&self) -> Vec<SourceNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| SourceNode::new(node, self.source))
            .collect()
    }

    pub fn parent(&self) -> Option<SourceNode<'t>> {
        self.node
            .parent()
            .map(|node| SourceNode::new(node, self.source))
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// 1-based line and column of the first character.
    pub fn start_point(&self) -> (usize, usize) {
        let point = self.node.start_position();
        (point.row + 1, point.column + 1)
    }

    /// The underlying tree-sitter node.
    pub fn raw(&self) -> tree_sitter::Node<'t> {
        self.node
    }
}

impl fmt::Debug for SourceNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.start_point();
        write!(f, "{}@{}:{} {:?}", self.kind(), line, column, self.text())
    }
}
