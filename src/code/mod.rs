//! Querying parsed PHP code.
//!
//! Trees come from tree-sitter's PHP grammar. Nothing in this module edits
//! or copies a tree: [`SourceNode`] is a borrowed handle and every query
//! returns handles into the tree owned by [`Code`].

pub mod errors;
pub mod finder;
pub mod node;
pub mod parser;
pub mod php;
pub mod pseudo;
pub mod source;

pub use errors::{QueryCategory, QueryError, SourceError};
pub use finder::{NodeFinder, Params};
pub use node::SourceNode;
pub use parser::{php_language, PhpParser, SyntaxErrorNode};
pub use pseudo::{Pseudo, PseudoFilter, PSEUDO_NAMES};
pub use source::Code;
