use crate::selector::SelectorError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures producing a tree from source text.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to set PHP language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which registry a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    NodeKind,
    Operator,
    Construct,
    BuiltInFunction,
    Pseudo,
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryCategory::NodeKind => "node kind",
            QueryCategory::Operator => "operator",
            QueryCategory::Construct => "language construct",
            QueryCategory::BuiltInFunction => "built-in function",
            QueryCategory::Pseudo => "pseudo-filter",
        })
    }
}

/// Failures running a query. All of them abort the query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("unknown {category} '{name}'. Supported: [{}]{}", .valid.join(", "), hint(.suggestion))]
    UnknownQueryName {
        category: QueryCategory,
        name: String,
        valid: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("unknown method '{method}' for NodeFinder. Supported: [{}]{}", .supported.join(", "), hint(.suggestion))]
    UnknownAction {
        method: String,
        supported: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("{action} does not accept parameter '{name}'. Accepted: [{}]", .accepted.join(", "))]
    UnsupportedParameter {
        action: String,
        name: String,
        accepted: Vec<String>,
    },

    #[error("{action} requires parameter '{param}'. Valid values: [{}]", .valid.join(", "))]
    MissingParameter {
        action: String,
        param: String,
        valid: Vec<String>,
    },

    #[error("invalid argument {argument:?} for pseudo-filter '{pseudo}': {message}")]
    InvalidPseudoArgument {
        pseudo: String,
        argument: Option<String>,
        message: String,
    },
}

impl QueryError {
    pub(crate) fn unknown_name<I, S>(category: QueryCategory, name: &str, valid: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let valid: Vec<String> = valid.into_iter().map(Into::into).collect();
        let suggestion = closest(name, &valid);
        QueryError::UnknownQueryName {
            category,
            name: name.to_string(),
            valid,
            suggestion,
        }
    }

    pub(crate) fn unknown_action<I, S>(method: &str, supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported: Vec<String> = supported.into_iter().map(Into::into).collect();
        let suggestion = closest(method, &supported);
        QueryError::UnknownAction {
            method: method.to_string(),
            supported,
            suggestion,
        }
    }
}

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Closest candidate within a small edit distance.
fn closest(name: &str, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .map(|c| (strsim::levenshtein(name, c), c))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, c)| c.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_lists_valid_set() {
        let err = QueryError::unknown_name(
            QueryCategory::Operator,
            "xor",
            ["equal", "addition", "assignment"],
        );
        assert_eq!(
            err.to_string(),
            "unknown operator 'xor'. Supported: [equal, addition, assignment]"
        );
    }

    #[test]
    fn unknown_name_suggests_close_match() {
        let err = QueryError::unknown_name(QueryCategory::NodeKind, "varable", ["variable", "string"]);
        match &err {
            QueryError::UnknownQueryName { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("variable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().ends_with("(did you mean 'variable'?)"));
    }

    #[test]
    fn unknown_action_names_method() {
        let err = QueryError::unknown_action("find_everything", ["find_variable"]);
        assert!(err.to_string().contains("unknown method 'find_everything'"));
    }
}
