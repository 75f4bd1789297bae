//! End-to-end selector queries over parsed PHP sources.

use code_proof::code::{NodeFinder, QueryCategory, QueryError};
use code_proof::{parse_selector, Code, Filter, PseudoSpec, SelectorError};
use std::collections::BTreeMap;

const COMPARISONS: &str = r#"<?php
if ($a == 1) {
    echo "one";
}
if ($b == 2) {
    echo "two";
}
if ($c == 3) {
    print "three";
}
"#;

fn texts(code: &Code, selector: &str) -> Vec<String> {
    code.find(selector)
        .unwrap()
        .into_iter()
        .map(|node| node.text().to_string())
        .collect()
}

#[test]
fn variables_by_name_in_document_order() {
    let code = Code::from_source("<?php\n$count = 0;\n$total = $count + 1;\n").unwrap();
    let found = code.find("variable[name=count]").unwrap();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|node| node.text() == "$count"));
    assert!(found[0].start_point() < found[1].start_point());
}

#[test]
fn first_equality_comparison() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert_eq!(code.count("operator[name=equal]").unwrap(), 3);
    assert_eq!(texts(&code, "operator[name=equal]:first"), vec!["$a == 1"]);
    assert_eq!(texts(&code, "operator[name=equal]:last"), vec!["$c == 3"]);
    assert_eq!(texts(&code, "operator[name=equal]:eq(1)"), vec!["$b == 2"]);
}

#[test]
fn pseudo_index_out_of_range_is_empty() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert!(code.find("operator[name=equal]:eq(7)").unwrap().is_empty());
    assert!(code.find("operator[name=equal]:eq(-1)").unwrap().is_empty());
    assert!(code
        .find("operator[name=equal]:eq(99999999999999999999999)")
        .unwrap()
        .is_empty());
    assert_eq!(code.count("operator[name=equal]:gt(-1)").unwrap(), 3);
}

#[test]
fn chained_pseudo_filters_apply_left_to_right() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert_eq!(texts(&code, "operator[name=equal]:gt(0):first"), vec!["$b == 2"]);
    assert_eq!(texts(&code, "operator[name=equal]:odd"), vec!["$b == 2"]);
}

#[test]
fn operator_optional_params() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert_eq!(texts(&code, "operator[name=equal,left=\"$b\"]"), vec!["$b == 2"]);
    assert_eq!(texts(&code, "operator[name=equal,right=3]"), vec!["$c == 3"]);

    let code = Code::from_source("<?php\n$sum = $x + $y;\n$other = 4;\n").unwrap();
    assert_eq!(code.count("operator[name=assignment]").unwrap(), 2);
    assert_eq!(
        texts(&code, "operator[name=assignment,variable=sum]"),
        vec!["$sum = $x + $y"]
    );
    assert_eq!(code.count("operator[name=addition,left=\"$x\"]").unwrap(), 1);
}

#[test]
fn top_level_only_without_child_traversal() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert_eq!(code.count("construct[name=echo]").unwrap(), 2);
    assert_eq!(code.count(">construct[name=echo]").unwrap(), 0);

    let code = Code::from_source("<?php\necho 1;\nif (true) { echo 2; }\n").unwrap();
    assert_eq!(texts(&code, ">construct[name=echo]"), vec!["echo 1;"]);
}

#[test]
fn functions_and_builtins() {
    let code = Code::from_source(
        "<?php\nfunction total(array $xs) {\n    return count($xs);\n}\nvar_dump(total([1, 2]));\n",
    )
    .unwrap();

    assert_eq!(code.count("function").unwrap(), 1);
    assert!(code.has("function[name=total]").unwrap());
    assert!(!code.has("function[name=sum]").unwrap());
    assert_eq!(texts(&code, "builtin[name=count]"), vec!["count($xs)"]);
    assert_eq!(code.count("builtin[name=var_dump]").unwrap(), 1);
    assert_eq!(code.count("builtin[name=strlen]").unwrap(), 0);
}

#[test]
fn strings_and_interpolation() {
    let code = Code::from_source(
        "<?php\n$greeting = 'hello';\n$plain = \"world\";\n$message = \"Hi $name, welcome\";\n",
    )
    .unwrap();

    assert_eq!(code.count("string").unwrap(), 2);
    assert!(code.has("string[value=hello]").unwrap());
    assert!(code.has("string[value=world]").unwrap());
    assert_eq!(code.count("interpolation").unwrap(), 1);
    assert!(code.has("encapsed-string").unwrap());
    assert!(!code.has("encapsed-string[value=hello]").unwrap());
}

#[test]
fn empty_node_list_returns_empty() {
    let filter = parse_selector("operator[name=equal]:first").unwrap();
    let found = NodeFinder::new().find(&[], &filter).unwrap();
    assert!(found.is_empty());
}

#[test]
fn unknown_names_fail_before_traversal() {
    let finder = NodeFinder::new();

    let filter = parse_selector("operator[name=modulo]").unwrap();
    match finder.find(&[], &filter).unwrap_err() {
        QueryError::UnknownQueryName {
            category, valid, ..
        } => {
            assert_eq!(category, QueryCategory::Operator);
            assert_eq!(valid, vec!["equal", "addition", "assignment"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let filter = parse_selector("varaible").unwrap();
    let err = finder.find(&[], &filter).unwrap_err();
    assert!(err.to_string().contains("did you mean 'variable'"), "{err}");

    let filter = Filter::new("variable").with_pseudo(PseudoSpec::new("middle"));
    assert!(matches!(
        finder.find(&[], &filter).unwrap_err(),
        QueryError::UnknownQueryName {
            category: QueryCategory::Pseudo,
            ..
        }
    ));
}

#[test]
fn unsupported_and_missing_params() {
    let code = Code::from_source(COMPARISONS).unwrap();

    assert!(matches!(
        code.find("variable[value=x]").unwrap_err(),
        QueryError::UnsupportedParameter { .. }
    ));
    assert!(matches!(
        code.find("operator[name=assignment,left=a]").unwrap_err(),
        QueryError::UnsupportedParameter { .. }
    ));
    assert!(matches!(
        code.find("construct").unwrap_err(),
        QueryError::MissingParameter { .. }
    ));
}

#[test]
fn method_dispatch_by_name() {
    let code = Code::from_source(COMPARISONS).unwrap();
    let finder = NodeFinder::new();
    let mut params = BTreeMap::new();
    params.insert("name".to_string(), "a".to_string());

    let found = finder
        .invoke("find_variable", &code.nodes(), &params, true)
        .unwrap();
    assert_eq!(found.len(), 1);

    assert!(matches!(
        finder
            .invoke("find_class", &code.nodes(), &params, true)
            .unwrap_err(),
        QueryError::UnknownAction { .. }
    ));
}

#[test]
fn selector_errors_surface_through_queries() {
    let code = Code::from_source(COMPARISONS).unwrap();
    assert!(matches!(
        code.find("variable[name=count").unwrap_err(),
        QueryError::Selector(SelectorError::Malformed { .. })
    ));
    assert!(matches!(
        code.find("variable@").unwrap_err(),
        QueryError::Selector(SelectorError::Lexical { character: '@', .. })
    ));
}

#[test]
fn broken_source_still_queryable() {
    let code = Code::from_source("<?php\n$a = ;\n$b == 2;\n").unwrap();
    assert!(code.has_errors());
    assert!(!code.syntax_errors().is_empty());
    assert!(code.has("variable[name=b]").unwrap());
}
