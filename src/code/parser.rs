use crate::code::errors::SourceError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// The PHP grammar bundled with ast-grep-language.
pub fn php_language() -> SupportLang {
    SupportLang::Php
}

/// Tree-sitter parser wrapper for PHP source code.
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    pub fn new() -> Result<Self, SourceError> {
        let mut parser = Parser::new();
        let ts_lang = php_language().get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| SourceError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, SourceError> {
        self.parser
            .parse(source, None)
            .ok_or(SourceError::ParseFailed)
    }
}

/// Location of an ERROR or MISSING node in a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
    pub missing: bool,
}

pub(crate) fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<SyntaxErrorNode>) {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        errors.push(SyntaxErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            line: start.row + 1,
            column: start.column + 1,
            missing: node.is_missing(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
