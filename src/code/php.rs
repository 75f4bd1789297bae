//! Node kinds and field conventions of the tree-sitter PHP grammar.

use crate::code::node::SourceNode;

pub const VARIABLE_NAME: &str = "variable_name";
pub const NAME: &str = "name";
pub const QUALIFIED_NAME: &str = "qualified_name";
pub const BINARY_EXPRESSION: &str = "binary_expression";
pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
pub const FUNCTION_DEFINITION: &str = "function_definition";
pub const FUNCTION_CALL_EXPRESSION: &str = "function_call_expression";
pub const ECHO_STATEMENT: &str = "echo_statement";
pub const PRINT_INTRINSIC: &str = "print_intrinsic";
pub const UNSET_STATEMENT: &str = "unset_statement";
pub const STRING: &str = "string";
pub const ENCAPSED_STRING: &str = "encapsed_string";
pub const STRING_CONTENT: &str = "string_content";
pub const ESCAPE_SEQUENCE: &str = "escape_sequence";
pub const HEREDOC: &str = "heredoc";
pub const HEREDOC_BODY: &str = "heredoc_body";

/// `count` for `$count`.
pub fn variable_identifier<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    if node.kind() != VARIABLE_NAME {
        return None;
    }
    match node.child_of_kind(NAME) {
        Some(name) => Some(name.text()),
        None => Some(node.text().trim_start_matches('$')),
    }
}

/// Name of the called function for `foo(...)` and global `\foo(...)` calls,
/// as written. PHP compares function names case-insensitively.
pub fn callee_name<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    if node.kind() != FUNCTION_CALL_EXPRESSION {
        return None;
    }
    let callee = node.field("function")?;
    match callee.kind() {
        NAME => Some(callee.text()),
        QUALIFIED_NAME => callee
            .text()
            .strip_prefix('\\')
            .filter(|name| !name.is_empty() && !name.contains('\\')),
        _ => None,
    }
}

/// Name given in a `function foo() {}` definition.
pub fn function_name<'t>(node: SourceNode<'t>) -> Option<&'t str> {
    if node.kind() != FUNCTION_DEFINITION {
        return None;
    }
    node.field("name").map(|name| name.text())
}

/// A double quoted string or heredoc with at least one `$var` or `{$expr}`
/// part.
pub fn is_interpolated(node: SourceNode<'_>) -> bool {
    match node.kind() {
        ENCAPSED_STRING => has_interpolated_part(node),
        HEREDOC => node
            .child_of_kind(HEREDOC_BODY)
            .is_some_and(has_interpolated_part),
        _ => false,
    }
}

/// Whether a literal fragment sits directly inside an interpolated string.
pub fn in_interpolated_string(node: SourceNode<'_>) -> bool {
    match node.parent() {
        Some(parent) if parent.kind() == HEREDOC_BODY => {
            parent.parent().is_some_and(is_interpolated)
        }
        Some(parent) => is_interpolated(parent),
        None => false,
    }
}

fn has_interpolated_part(node: SourceNode<'_>) -> bool {
    node.named_children()
        .iter()
        .any(|child| !is_literal_part(child.kind()))
}

fn is_literal_part(kind: &str) -> bool {
    kind == STRING_CONTENT || kind == ESCAPE_SEQUENCE
}

/// Contents of a string literal without its quotes (escapes left as written).
pub fn string_value<'t>(node: SourceNode<'t>) -> &'t str {
    let text = node.text();
    let text = text
        .strip_prefix(|c: char| c == 'b' || c == 'B')
        .filter(|rest| rest.starts_with(|c: char| c == '\'' || c == '"'))
        .unwrap_or(text);
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '\'' || open == '"') => {
            chars.as_str()
        }
        _ => text,
    }
}
