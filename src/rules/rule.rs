use crate::code::node::SourceNode;
use std::fmt;

/// Tests whether a node has the exact shape a rule stands for.
pub type NodePredicate = for<'t> fn(SourceNode<'t>) -> bool;

/// Pulls the value an optional parameter is compared against out of a node.
pub type FieldExtractor = for<'t> fn(SourceNode<'t>) -> Option<&'t str>;

/// An extra parameter a rule understands beyond its `name`.
#[derive(Clone, Copy)]
pub struct OptionalParam {
    pub name: &'static str,
    extract: FieldExtractor,
}

impl OptionalParam {
    pub const fn new(name: &'static str, extract: FieldExtractor) -> Self {
        Self { name, extract }
    }

    pub fn value<'t>(&self, node: SourceNode<'t>) -> Option<&'t str> {
        (self.extract)(node)
    }
}

/// A named operator shape.
///
/// Rules are plain values: a predicate plus the optional parameters it
/// accepts. They carry no state and are shared freely between threads.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    description: &'static str,
    predicate: NodePredicate,
    optional: &'static [OptionalParam],
}

impl Rule {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        predicate: NodePredicate,
        optional: &'static [OptionalParam],
    ) -> Self {
        Self {
            name,
            description,
            predicate,
            optional,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// The shape test for this rule.
    pub fn predicate(&self) -> NodePredicate {
        self.predicate
    }

    /// Names of the optional parameters this rule supports.
    pub fn allowed_optional_filter(&self) -> impl Iterator<Item = &'static str> {
        self.optional.iter().map(|param| param.name)
    }

    pub fn optional_param(&self, name: &str) -> Option<&'static OptionalParam> {
        self.optional.iter().find(|param| param.name == name)
    }

    pub fn matches(&self, node: SourceNode<'_>) -> bool {
        (self.predicate)(node)
    }
}

impl fmt::Debug for OptionalParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalParam")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}
