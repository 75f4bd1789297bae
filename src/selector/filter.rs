use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A position-based refinement, e.g. `first` or `eq(2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PseudoSpec {
    pub name: String,
    pub arg: Option<String>,
}

impl PseudoSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
        }
    }

    pub fn with_arg(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: Some(arg.into()),
        }
    }
}

impl fmt::Display for PseudoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, ":{}({})", self.name, quote_if_needed(arg)),
            None => write!(f, ":{}", self.name),
        }
    }
}

/// Structured form of a selector.
///
/// `node_kind` is not checked here; the finder resolves it against its
/// registry and fails with the list of valid kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub node_kind: String,
    pub params: BTreeMap<String, String>,
    pub traverse_children: bool,
    pub pseudo: Vec<PseudoSpec>,
}

impl Filter {
    pub fn new(node_kind: impl Into<String>) -> Self {
        Self {
            node_kind: node_kind.into(),
            params: BTreeMap::new(),
            traverse_children: true,
            pseudo: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_traverse_children(mut self, traverse: bool) -> Self {
        self.traverse_children = traverse;
        self
    }

    pub fn with_pseudo(mut self, spec: PseudoSpec) -> Self {
        self.pseudo.push(spec);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.traverse_children {
            f.write_str(">")?;
        }
        f.write_str(&self.node_kind)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{k}={}", quote_if_needed(v)))
                .collect();
            write!(f, "[{}]", params.join(","))?;
        }
        for spec in &self.pseudo {
            write!(f, "{spec}")?;
        }
        Ok(())
    }
}

fn quote_if_needed(value: &str) -> String {
    let bare_identifier = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let bare_number = !value.is_empty()
        && value
            .strip_prefix('-')
            .unwrap_or(value)
            .chars()
            .all(|c| c.is_ascii_digit())
        && value != "-";

    if bare_identifier || bare_number {
        value.to_string()
    } else {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_canonical_selector() {
        let filter = Filter::new("operator")
            .with_param("name", "equal")
            .with_pseudo(PseudoSpec::new("first"));
        assert_eq!(filter.to_string(), "operator[name=equal]:first");

        let filter = Filter::new("string")
            .with_traverse_children(false)
            .with_param("value", "hello world")
            .with_pseudo(PseudoSpec::with_arg("eq", "0"));
        assert_eq!(filter.to_string(), ">string[value=\"hello world\"]:eq(0)");
    }

    #[test]
    fn defaults_traverse_children() {
        let filter = Filter::new("variable");
        assert!(filter.traverse_children);
        assert!(filter.params.is_empty());
        assert_eq!(filter.param("name"), None);
    }
}
