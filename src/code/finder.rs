use crate::code::errors::QueryError;
use crate::code::node::SourceNode;
use crate::code::php;
use crate::code::pseudo::PseudoFilter;
use crate::rules::{Action, Registry};
use crate::selector::Filter;
use std::collections::BTreeMap;

/// Named query parameters, e.g. `name=count`.
pub type Params = BTreeMap<String, String>;

/// Finds nodes matching a [`Filter`].
///
/// Results are in pre-order document order. With `traverse_children` off only
/// the nodes passed in are candidates, never their descendants.
#[derive(Debug, Clone, Copy)]
pub struct NodeFinder<'r> {
    registry: &'r Registry,
}

impl NodeFinder<'static> {
    /// Finder over the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }
}

impl Default for NodeFinder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> NodeFinder<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Run a parsed selector against `nodes`.
    ///
    /// Names are resolved and pseudo-filters validated before any traversal,
    /// so a bad query fails even when there is nothing to search.
    pub fn find<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        filter: &Filter,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        let action = self.registry.action(&filter.node_kind)?;
        let pseudo = PseudoFilter::new(&filter.pseudo)?;

        let matched = self.dispatch(action, nodes, &filter.params, filter.traverse_children)?;
        log::debug!("{filter} matched {} node(s) before pseudo-filters", matched.len());

        if matched.is_empty() || pseudo.is_identity() {
            return Ok(matched);
        }
        Ok(pseudo.filter(matched))
    }

    /// Dispatch by method name, e.g. `find_variable`. No pseudo-filtering.
    pub fn invoke<'t>(
        &self,
        method: &str,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        let action = Action::from_method(method)
            .ok_or_else(|| QueryError::unknown_action(method, self.registry.method_names()))?;
        self.dispatch(action, nodes, params, traverse_children)
    }

    pub fn dispatch<'t>(
        &self,
        action: Action,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        match action {
            Action::Variable => self.find_variable(nodes, params, traverse_children),
            Action::Operator => self.find_operator(nodes, params, traverse_children),
            Action::Function => self.find_function(nodes, params, traverse_children),
            Action::Construct => self.find_construct(nodes, params, traverse_children),
            Action::BuiltInFunction => {
                self.find_builtin_function(nodes, params, traverse_children)
            }
            Action::String => self.find_string(nodes, params, traverse_children),
            Action::Interpolation => self.find_interpolation(nodes, params, traverse_children),
            Action::EncapsedString => self.find_encapsed_string(nodes, params, traverse_children),
        }
    }

    /// Variables, optionally by name (`count` or `$count`).
    pub fn find_variable<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        check_params(Action::Variable, params, &[])?;
        let name = params.get("name").map(|n| n.trim_start_matches('$'));

        Ok(collect(nodes, traverse_children, |node| {
            let identifier = php::variable_identifier(node);
            identifier.is_some() && matches_param(name, identifier)
        }))
    }

    /// Operators by rule name, narrowed by the rule's optional parameters.
    pub fn find_operator<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        let name = self.require_name(Action::Operator, params)?;
        let rule = self.registry.operator(name)?;
        let optional_names: Vec<&str> = rule.allowed_optional_filter().collect();
        check_params(Action::Operator, params, &optional_names)?;

        let optional: Vec<_> = params
            .iter()
            .filter_map(|(key, value)| {
                rule.optional_param(key)
                    .map(|param| (param, value.as_str()))
            })
            .collect();
        let predicate = rule.predicate();

        Ok(collect(nodes, traverse_children, |node| {
            predicate(node)
                && optional
                    .iter()
                    .all(|(param, expected)| param.value(node) == Some(*expected))
        }))
    }

    /// Function definitions, optionally by name.
    pub fn find_function<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        check_params(Action::Function, params, &[])?;
        let name = params.get("name").map(String::as_str);

        Ok(collect(nodes, traverse_children, |node| {
            let defined = php::function_name(node);
            defined.is_some() && matches_param(name, defined)
        }))
    }

    /// Language constructs such as `echo`.
    pub fn find_construct<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        let name = self.require_name(Action::Construct, params)?;
        let construct = self.registry.construct(name)?;
        check_params(Action::Construct, params, &[])?;

        Ok(collect(nodes, traverse_children, |node| {
            node.kind() == construct.node_kind
        }))
    }

    /// Calls to a registered built-in function, in any letter case and
    /// with or without a leading `\`.
    pub fn find_builtin_function<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        let name = self.require_name(Action::BuiltInFunction, params)?;
        let function = self.registry.builtin_function(name)?;
        check_params(Action::BuiltInFunction, params, &[])?;

        Ok(collect(nodes, traverse_children, |node| {
            php::callee_name(node).is_some_and(|callee| callee.eq_ignore_ascii_case(function))
        }))
    }

    /// String literals without interpolation, optionally by contents.
    pub fn find_string<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        check_params(Action::String, params, &[])?;
        let value = params.get("value").map(String::as_str);

        Ok(collect(nodes, traverse_children, |node| {
            let literal = node.kind() == php::STRING
                || (node.kind() == php::ENCAPSED_STRING && !php::is_interpolated(node));
            literal && matches_param(value, Some(php::string_value(node)))
        }))
    }

    /// Interpolated strings such as `"Hello $name"`, heredocs included.
    ///
    /// To check which variable is interpolated, run a variable query over
    /// the result.
    pub fn find_interpolation<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        check_params(Action::Interpolation, params, &[])?;
        Ok(collect(nodes, traverse_children, php::is_interpolated))
    }

    /// Literal fragments of interpolated strings, optionally by contents.
    pub fn find_encapsed_string<'t>(
        &self,
        nodes: &[SourceNode<'t>],
        params: &Params,
        traverse_children: bool,
    ) -> Result<Vec<SourceNode<'t>>, QueryError> {
        check_params(Action::EncapsedString, params, &[])?;
        let value = params.get("value").map(String::as_str);

        Ok(collect(nodes, traverse_children, |node| {
            node.kind() == php::STRING_CONTENT
                && php::in_interpolated_string(node)
                && matches_param(value, Some(node.text()))
        }))
    }

    fn require_name<'p>(&self, action: Action, params: &'p Params) -> Result<&'p str, QueryError> {
        params
            .get("name")
            .map(String::as_str)
            .ok_or_else(|| QueryError::MissingParameter {
                action: action.kind_name().to_string(),
                param: "name".to_string(),
                valid: self
                    .registry
                    .names_for(action)
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
    }
}

/// Unsupplied parameters impose no constraint.
fn matches_param(expected: Option<&str>, actual: Option<&str>) -> bool {
    match expected {
        Some(expected) => actual == Some(expected),
        None => true,
    }
}

fn check_params(action: Action, params: &Params, extra: &[&str]) -> Result<(), QueryError> {
    let accepted = action.accepted_params();
    match params
        .keys()
        .find(|key| !accepted.contains(&key.as_str()) && !extra.contains(&key.as_str()))
    {
        Some(key) => Err(QueryError::UnsupportedParameter {
            action: action.kind_name().to_string(),
            name: key.clone(),
            accepted: accepted
                .iter()
                .chain(extra.iter())
                .map(|s| s.to_string())
                .collect(),
        }),
        None => Ok(()),
    }
}

/// Pre-order walk collecting every node `predicate` accepts.
fn collect<'t, P>(nodes: &[SourceNode<'t>], traverse_children: bool, mut predicate: P) -> Vec<SourceNode<'t>>
where
    P: FnMut(SourceNode<'t>) -> bool,
{
    let mut matched = Vec::new();
    for &root in nodes {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if predicate(node) {
                matched.push(node);
            }
            if traverse_children {
                stack.extend(node.named_children().into_iter().rev());
            }
        }
    }
    matched
}
