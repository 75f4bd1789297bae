use crate::code::{Code, NodeFinder, QueryError};
use crate::config::schema::{CheckDefinition, ProofFile};
use crate::selector::parse_selector;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    Passed,
    Failed { expected: String },
    Error(QueryError),
    /// The check names neither or both of `selector` and `method`.
    Invalid { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub id: String,
    pub matched: usize,
    pub status: CheckStatus,
    pub message: Option<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.status, CheckStatus::Passed)
    }
}

/// Run every check of `proof` against `code`, in declaration order.
///
/// A check whose query is invalid fails on its own; the remaining checks
/// still run.
pub fn run_checks(code: &Code, proof: &ProofFile) -> Vec<CheckOutcome> {
    let finder = NodeFinder::new();
    proof
        .checks
        .iter()
        .map(|check| run_check(&finder, code, check))
        .collect()
}

pub fn run_check(finder: &NodeFinder<'_>, code: &Code, check: &CheckDefinition) -> CheckOutcome {
    let result = match (&check.selector, &check.method) {
        (Some(selector), None) => parse_selector(selector)
            .map_err(QueryError::from)
            .and_then(|filter| finder.find(&code.nodes(), &filter))
            .map(|nodes| nodes.len()),
        (None, Some(method)) => finder
            .invoke(
                method,
                &code.nodes(),
                &check.params,
                check.traverse_children.unwrap_or(true),
            )
            .map(|nodes| nodes.len()),
        (Some(_), Some(_)) => {
            return invalid(check, "selector and method are mutually exclusive");
        }
        (None, None) => return invalid(check, "check has neither a selector nor a method"),
    };

    let (matched, status) = match result {
        Ok(count) if check.accepts(count) => (count, CheckStatus::Passed),
        Ok(count) => (
            count,
            CheckStatus::Failed {
                expected: check.expectation(),
            },
        ),
        Err(err) => (0, CheckStatus::Error(err)),
    };
    log::debug!("check '{}' matched {matched}: {status:?}", check.id);

    CheckOutcome {
        id: check.id.clone(),
        matched,
        status,
        message: check.message.clone(),
    }
}

fn invalid(check: &CheckDefinition, reason: &str) -> CheckOutcome {
    log::debug!("check '{}' not run: {reason}", check.id);
    CheckOutcome {
        id: check.id.clone(),
        matched: 0,
        status: CheckStatus::Invalid {
            reason: reason.to_string(),
        },
        message: check.message.clone(),
    }
}

pub fn all_passed(outcomes: &[CheckOutcome]) -> bool {
    outcomes.iter().all(CheckOutcome::passed)
}
