//! Thread-local parser pooling.
//!
//! Creating a tree-sitter parser and loading the PHP grammar is not free.
//! Each thread lazily creates one [`PhpParser`] and reuses it for every
//! file it parses afterwards.

use crate::code::{PhpParser, SourceError};
use std::cell::RefCell;

thread_local! {
    static PHP_PARSER: RefCell<Option<PhpParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use code_proof::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("<?php echo 1;"))??;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, SourceError>
where
    F: FnOnce(&mut PhpParser) -> R,
{
    PHP_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => PhpParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
