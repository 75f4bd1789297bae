//! Operator shapes for `operator[name=...]` queries.

use crate::code::node::SourceNode;
use crate::code::php;
use crate::rules::rule::{OptionalParam, Rule};

const LEFT: OptionalParam = OptionalParam::new("left", left_operand);
const RIGHT: OptionalParam = OptionalParam::new("right", right_operand);
const VARIABLE: OptionalParam = OptionalParam::new("variable", assigned_variable);

pub const EQUAL: Rule = Rule::new("equal", "`==` comparison", is_equal, &[LEFT, RIGHT]);
pub const ADDITION: Rule = Rule::new("addition", "`+` addition", is_addition, &[LEFT, RIGHT]);
pub const ASSIGNMENT: Rule = Rule::new(
    "assignment",
    "`=` assignment",
    is_assignment,
    &[VARIABLE],
);

/// All operator rules in registration order.
pub fn operator_rules() -> Vec<Rule> {
    vec![EQUAL, ADDITION, ASSIGNMENT]
}

fn binary_with(node: SourceNode<'_>, operator: &str) -> bool {
    node.kind() == php::BINARY_EXPRESSION
        && node
            .field("operator")
            .is_some_and(|op| op.kind() == operator)
}

fn is_equal(node: SourceNode<'_>) -> bool {
    binary_with(node, "==")
}

fn is_addition(node: SourceNode<'_>) -> bool {
    binary_with(node, "+")
}

fn is_assignment(node: SourceNode<'_>) -> bool {
    node.kind() == php::ASSIGNMENT_EXPRESSION
}

fn left_operand<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    node.field("left").map(|left| left.text())
}

fn right_operand<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    node.field("right").map(|right| right.text())
}

fn assigned_variable<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    node.field("left").and_then(php::variable_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;

    fn first_of_kind<'t>(code: &'t Code, kind: &str) -> SourceNode<'t> {
        let mut stack = vec![code.root()];
        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                return node;
            }
            stack.extend(node.named_children().into_iter().rev());
        }
        panic!("no {kind} node in {:?}", code.source());
    }

    #[test]
    fn equal_rule_only_matches_loose_equality() {
        let code = Code::from_source("<?php\n$a == 1;\n$b === 2;\n").unwrap();
        let nodes: Vec<_> = code
            .nodes()
            .into_iter()
            .flat_map(|n| n.named_children())
            .collect();
        let matched: Vec<_> = nodes.iter().filter(|n| EQUAL.matches(**n)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].text(), "$a == 1");
    }

    #[test]
    fn addition_is_not_assignment() {
        let code = Code::from_source("<?php\n$total = $a + $b;\n").unwrap();
        let assignment = first_of_kind(&code, "assignment_expression");
        let addition = first_of_kind(&code, "binary_expression");

        assert!(ASSIGNMENT.matches(assignment));
        assert!(!ADDITION.matches(assignment));
        assert!(ADDITION.matches(addition));
        assert!(!EQUAL.matches(addition));
    }

    #[test]
    fn optional_params_extract_operands() {
        let code = Code::from_source("<?php\n$total = $a + 10;\n").unwrap();
        let assignment = first_of_kind(&code, "assignment_expression");
        let addition = first_of_kind(&code, "binary_expression");

        let variable = ASSIGNMENT.optional_param("variable").unwrap();
        assert_eq!(variable.value(assignment), Some("total"));
        assert_eq!(EQUAL.optional_param("left").unwrap().value(addition), Some("$a"));
        assert_eq!(ADDITION.optional_param("right").unwrap().value(addition), Some("10"));
        assert!(ADDITION.optional_param("variable").is_none());
    }

    #[test]
    fn allowed_optional_filters() {
        assert_eq!(
            EQUAL.allowed_optional_filter().collect::<Vec<_>>(),
            vec!["left", "right"]
        );
        assert_eq!(
            ASSIGNMENT.allowed_optional_filter().collect::<Vec<_>>(),
            vec!["variable"]
        );
    }
}
