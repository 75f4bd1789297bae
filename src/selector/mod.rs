//! Selector text to query descriptor.
//!
//! A selector is a compact description of the nodes to look for:
//!
//! ```text
//! variable[name=count]          every $count variable
//! operator[name=equal]:first    the first `==` comparison
//! >construct[name=echo]         echo statements at the top level only
//! ```
//!
//! Lexing is a chain of [`TokenHandler`]s over a [`SourceReader`]; the
//! [`SelectorParser`] assembles the resulting [`TokenStream`] into a
//! [`Filter`].

pub mod errors;
pub mod filter;
pub mod handler;
pub mod parser;
pub mod reader;
pub mod token;

pub use errors::SelectorError;
pub use filter::{Filter, PseudoSpec};
pub use handler::{
    default_handlers, IdentifierHandler, NumberHandler, StringHandler, SymbolHandler,
    TokenHandler, WhitespaceHandler,
};
pub use parser::{parse_selector, SelectorParser};
pub use reader::SourceReader;
pub use token::{Token, TokenStream, TokenType};
