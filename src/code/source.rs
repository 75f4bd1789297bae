use crate::code::errors::{QueryError, SourceError};
use crate::code::finder::NodeFinder;
use crate::code::node::SourceNode;
use crate::code::parser::{collect_error_nodes, SyntaxErrorNode};
use crate::pool::with_parser;
use crate::selector::{parse_selector, Filter};
use std::fmt;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

/// A parsed PHP source file, ready to be queried with selectors.
///
/// # Example
///
/// ```no_run
/// use code_proof::Code;
///
/// let code = Code::from_source("<?php\n$count = 1;\necho $count;\n")?;
/// assert_eq!(code.count("variable[name=count]")?, 2);
/// assert!(code.has("construct[name=echo]")?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Code {
    path: Option<PathBuf>,
    source: String,
    tree: Tree,
}

impl Code {
    pub fn from_source(source: impl Into<String>) -> Result<Self, SourceError> {
        let source = source.into();
        let tree = with_parser(|parser| parser.parse(&source))??;
        Ok(Self {
            path: None,
            source,
            tree,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut code = Self::from_source(source)?;
        code.path = Some(path.to_path_buf());
        Ok(code)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> SourceNode<'_> {
        SourceNode::new(self.tree.root_node(), &self.source)
    }

    /// Top-level statements: the candidates a query starts from.
    pub fn nodes(&self) -> Vec<SourceNode<'_>> {
        self.root().named_children()
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn syntax_errors(&self) -> Vec<SyntaxErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    pub fn find(&self, selector: &str) -> Result<Vec<SourceNode<'_>>, QueryError> {
        let filter = parse_selector(selector)?;
        self.find_filter(&filter)
    }

    pub fn find_filter(&self, filter: &Filter) -> Result<Vec<SourceNode<'_>>, QueryError> {
        NodeFinder::new().find(&self.nodes(), filter)
    }

    pub fn has(&self, selector: &str) -> Result<bool, QueryError> {
        Ok(!self.find(selector)?.is_empty())
    }

    pub fn count(&self, selector: &str) -> Result<usize, QueryError> {
        Ok(self.find(selector)?.len())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code")
            .field("path", &self.path)
            .field("bytes", &self.source.len())
            .finish()
    }
}
