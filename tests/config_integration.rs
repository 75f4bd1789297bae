//! Proof files loaded from disk and run against submitted sources.

use code_proof::config::{
    all_passed, load_from_path, run_checks, CheckStatus, ConfigError, ValidationIssue,
};
use code_proof::Code;
use std::fs;
use tempfile::TempDir;

const ANSWER: &str = r#"<?php
function greet(string $name) {
    return "Hello $name!";
}

$names = explode(",", "ada,grace");
foreach ($names as $name) {
    echo greet($name);
}
"#;

const PROOF: &str = r#"[meta]
name = "greeting"
description = "Greets every name in a list"

[[checks]]
id = "defines-greet"
selector = "function[name=greet]"

[[checks]]
id = "interpolates"
selector = "interpolation"
min = 1
max = 1

[[checks]]
id = "splits-input"
method = "find_builtin_function"
params = { name = "explode" }

[[checks]]
id = "top-level-echo"
selector = ">construct[name=echo]"
max = 0
"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn passing_proof() {
    let dir = TempDir::new().unwrap();
    let proof_path = write_fixture(&dir, "greeting.toml", PROOF);
    let answer_path = write_fixture(&dir, "greeting.php", ANSWER);

    let proof = load_from_path(&proof_path).unwrap();
    assert_eq!(proof.meta.name, "greeting");

    let code = Code::from_path(&answer_path).unwrap();
    assert_eq!(code.path(), Some(answer_path.as_path()));

    let outcomes = run_checks(&code, &proof);
    let ids: Vec<_> = outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["defines-greet", "interpolates", "splits-input", "top-level-echo"]
    );
    assert!(all_passed(&outcomes), "{outcomes:#?}");
}

#[test]
fn failing_proof_reports_expectation() {
    let dir = TempDir::new().unwrap();
    let proof = load_from_path(&write_fixture(&dir, "greeting.toml", PROOF)).unwrap();

    let code = Code::from_source("<?php\necho 'Hello';\n").unwrap();
    let outcomes = run_checks(&code, &proof);

    assert!(!all_passed(&outcomes));
    assert_eq!(
        outcomes[0].status,
        CheckStatus::Failed {
            expected: "at least 1".to_string()
        }
    );
    assert_eq!(outcomes[3].matched, 1);
    assert_eq!(
        outcomes[3].status,
        CheckStatus::Failed {
            expected: "none".to_string()
        }
    );
}

#[test]
fn invalid_proof_lists_all_issues() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "broken.toml",
        r#"
[[checks]]
id = "both"
selector = "variable"
method = "find_variable"

[[checks]]
id = "neither"

[[checks]]
id = "bad-selector"
selector = "variable[name="
"#,
    );

    match load_from_path(&path).unwrap_err() {
        ConfigError::Validation { path: at, source } => {
            assert_eq!(at.as_deref(), Some(path.as_path()));
            assert_eq!(source.issues.len(), 3);
            assert!(matches!(
                source.issues[1],
                ValidationIssue::MissingField {
                    field: "selector",
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}
