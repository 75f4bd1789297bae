use crate::code::errors::{QueryCategory, QueryError};
use crate::code::php;
use crate::rules::operators::operator_rules;
use crate::rules::rule::Rule;
use std::fmt;
use std::sync::OnceLock;

/// The traversal strategies a query can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Variable,
    Operator,
    Function,
    Construct,
    BuiltInFunction,
    String,
    Interpolation,
    EncapsedString,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Variable,
        Action::Operator,
        Action::Function,
        Action::Construct,
        Action::BuiltInFunction,
        Action::String,
        Action::Interpolation,
        Action::EncapsedString,
    ];

    /// Name used as the node kind in selectors.
    pub fn kind_name(self) -> &'static str {
        match self {
            Action::Variable => "variable",
            Action::Operator => "operator",
            Action::Function => "function",
            Action::Construct => "construct",
            Action::BuiltInFunction => "builtin",
            Action::String => "string",
            Action::Interpolation => "interpolation",
            Action::EncapsedString => "encapsed-string",
        }
    }

    /// Name used for method-style dispatch.
    pub fn method_name(self) -> &'static str {
        match self {
            Action::Variable => "find_variable",
            Action::Operator => "find_operator",
            Action::Function => "find_function",
            Action::Construct => "find_construct",
            Action::BuiltInFunction => "find_builtin_function",
            Action::String => "find_string",
            Action::Interpolation => "find_interpolation",
            Action::EncapsedString => "find_encapsed_string",
        }
    }

    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.method_name() == method)
    }

    /// Parameters the strategy itself understands. Operator rules may add more.
    pub fn accepted_params(self) -> &'static [&'static str] {
        match self {
            Action::Variable
            | Action::Operator
            | Action::Function
            | Action::Construct
            | Action::BuiltInFunction => &["name"],
            Action::String | Action::EncapsedString => &["value"],
            Action::Interpolation => &[],
        }
    }

    /// Whether `name` must be given and resolve in a registry.
    pub fn requires_name(self) -> bool {
        matches!(
            self,
            Action::Operator | Action::Construct | Action::BuiltInFunction
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// A language construct and the grammar node that represents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Construct {
    pub name: &'static str,
    pub node_kind: &'static str,
}

const CONSTRUCTS: &[Construct] = &[
    Construct {
        name: "echo",
        node_kind: php::ECHO_STATEMENT,
    },
    Construct {
        name: "print",
        node_kind: php::PRINT_INTRINSIC,
    },
    Construct {
        name: "unset",
        node_kind: php::UNSET_STATEMENT,
    },
];

const BUILTIN_FUNCTIONS: &[&str] = &[
    "count",
    "strlen",
    "str_replace",
    "implode",
    "explode",
    "array_push",
    "printf",
    "var_dump",
];

/// Every name a query can resolve against.
///
/// Built once per process by [`Registry::standard`] and never mutated.
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: Vec<Action>,
    operators: Vec<Rule>,
    constructs: Vec<Construct>,
    builtin_functions: Vec<&'static str>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            kinds: Action::ALL.to_vec(),
            operators: operator_rules(),
            constructs: CONSTRUCTS.to_vec(),
            builtin_functions: BUILTIN_FUNCTIONS.to_vec(),
        }
    }

    /// Replace the operator table, keeping registration order.
    pub fn with_operators(mut self, operators: Vec<Rule>) -> Self {
        self.operators = operators;
        self
    }

    /// The process-wide registry.
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Registry::new)
    }

    pub fn action(&self, kind: &str) -> Result<Action, QueryError> {
        self.kinds
            .iter()
            .copied()
            .find(|a| a.kind_name() == kind)
            .ok_or_else(|| {
                QueryError::unknown_name(QueryCategory::NodeKind, kind, self.kind_names())
            })
    }

    pub fn operator(&self, name: &str) -> Result<&Rule, QueryError> {
        self.operators
            .iter()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| {
                QueryError::unknown_name(QueryCategory::Operator, name, self.operator_names())
            })
    }

    pub fn construct(&self, name: &str) -> Result<&Construct, QueryError> {
        self.constructs
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                QueryError::unknown_name(QueryCategory::Construct, name, self.construct_names())
            })
    }

    pub fn builtin_function(&self, name: &str) -> Result<&'static str, QueryError> {
        self.builtin_functions
            .iter()
            .copied()
            .find(|f| *f == name)
            .ok_or_else(|| {
                QueryError::unknown_name(
                    QueryCategory::BuiltInFunction,
                    name,
                    self.builtin_function_names(),
                )
            })
    }

    /// Names valid for the required `name` parameter of `action`.
    pub fn names_for(&self, action: Action) -> Vec<&'static str> {
        match action {
            Action::Operator => self.operator_names(),
            Action::Construct => self.construct_names(),
            Action::BuiltInFunction => self.builtin_function_names(),
            _ => Vec::new(),
        }
    }

    pub fn kind_names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|a| a.kind_name()).collect()
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|a| a.method_name()).collect()
    }

    pub fn operator_names(&self) -> Vec<&'static str> {
        self.operators.iter().map(Rule::name).collect()
    }

    pub fn operators(&self) -> &[Rule] {
        &self.operators
    }

    pub fn construct_names(&self) -> Vec<&'static str> {
        self.constructs.iter().map(|c| c.name).collect()
    }

    pub fn builtin_function_names(&self) -> Vec<&'static str> {
        self.builtin_functions.clone()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
