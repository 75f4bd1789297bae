//! Code Proof: selector-driven queries over PHP syntax trees
//!
//! Source is parsed with tree-sitter into a concrete syntax tree; compact
//! selectors such as `operator[name=equal]:first` pick nodes out of it.
//! Proof files bundle selectors into pass/fail checks for inspecting
//! submitted code.
//!
//! # Architecture
//!
//! - [`selector`] turns selector text into a [`Filter`] via a chain of
//!   token handlers and a small state machine.
//! - [`rules`] holds the named query targets: operator rules, language
//!   constructs and built-in functions, resolved through a [`Registry`].
//! - [`code`] parses PHP and runs filters with the [`NodeFinder`].
//! - [`config`] loads proof files and runtime [`Settings`].
//!
//! # Example
//!
//! ```no_run
//! use code_proof::Code;
//!
//! let code = Code::from_source("<?php\nif ($a == $b) { echo $a; }\n")?;
//! let comparisons = code.find("operator[name=equal,left=a]")?;
//! assert_eq!(comparisons.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod code;
pub mod config;
pub mod pool;
pub mod rules;
pub mod selector;

// Re-exports
pub use code::{
    Code, NodeFinder, Params, PhpParser, Pseudo, PseudoFilter, QueryCategory, QueryError,
    SourceError, SourceNode, SyntaxErrorNode,
};
pub use config::{
    load_from_path, load_from_str, run_checks, CheckOutcome, CheckStatus, ConfigError,
    ProofFile, Settings,
};
pub use rules::{Action, Registry, Rule};
pub use selector::{parse_selector, Filter, PseudoSpec, SelectorError, SelectorParser};
