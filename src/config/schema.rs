use crate::selector::parse_selector;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A set of checks to run against one submitted source file.
///
/// ```toml
/// [meta]
/// name = "loops-exercise"
///
/// [[checks]]
/// id = "declares-count"
/// selector = "operator[name=assignment,variable=count]"
///
/// [[checks]]
/// id = "no-echo"
/// selector = "construct[name=echo]"
/// max = 0
/// message = "Return the value instead of echoing it"
/// ```
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ProofFile {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub checks: Vec<CheckDefinition>,
}

impl ProofFile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        if self.checks.is_empty() {
            issues.push(ValidationIssue::EmptyCheckList);
        }

        for check in &self.checks {
            let check_id = (!check.id.trim().is_empty()).then(|| check.id.clone());
            if check_id.is_none() {
                issues.push(ValidationIssue::MissingField {
                    check_id: None,
                    field: "id",
                });
            } else if !seen.insert(check.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    check_id: check.id.clone(),
                });
            }

            match (&check.selector, &check.method) {
                (Some(_), Some(_)) => issues.push(ValidationIssue::InvalidCombo {
                    check_id: check_id.clone(),
                    message: "selector and method are mutually exclusive".to_string(),
                }),
                (None, None) => issues.push(ValidationIssue::MissingField {
                    check_id: check_id.clone(),
                    field: "selector",
                }),
                (Some(selector), None) => {
                    if let Err(error) = parse_selector(selector) {
                        issues.push(ValidationIssue::InvalidSelector {
                            check_id: check_id.clone(),
                            message: error.to_string(),
                        });
                    }
                    if !check.params.is_empty() || check.traverse_children.is_some() {
                        issues.push(ValidationIssue::InvalidCombo {
                            check_id: check_id.clone(),
                            message: "params and traverse_children only apply to method checks; \
                                      put them in the selector instead"
                                .to_string(),
                        });
                    }
                }
                (None, Some(method)) => {
                    if method.trim().is_empty() {
                        issues.push(ValidationIssue::MissingField {
                            check_id: check_id.clone(),
                            field: "method",
                        });
                    }
                }
            }

            if let (Some(min), Some(max)) = (check.min, check.max) {
                if min > max {
                    issues.push(ValidationIssue::InvalidCombo {
                        check_id: check_id.clone(),
                        message: format!("min ({min}) is greater than max ({max})"),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckDefinition {
    pub id: String,
    #[serde(default)]
    pub selector: Option<String>,
    /// Method-style dispatch, e.g. `find_variable`.
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub traverse_children: Option<bool>,
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
    /// Shown when the check fails.
    #[serde(default)]
    pub message: Option<String>,
}

impl CheckDefinition {
    /// At least one match is expected unless only a maximum was given.
    pub fn min_count(&self) -> usize {
        match (self.min, self.max) {
            (Some(min), _) => min,
            (None, Some(_)) => 0,
            (None, None) => 1,
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_count() && self.max.map_or(true, |max| count <= max)
    }

    /// Human readable expectation, e.g. `at least 1` or `between 1 and 3`.
    pub fn expectation(&self) -> String {
        match (self.min_count(), self.max) {
            (0, Some(0)) => "none".to_string(),
            (min, Some(max)) if min == max => format!("exactly {min}"),
            (0, Some(max)) => format!("at most {max}"),
            (min, Some(max)) => format!("between {min} and {max}"),
            (min, None) => format!("at least {min}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyCheckList,
    MissingField {
        check_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        check_id: String,
    },
    InvalidSelector {
        check_id: Option<String>,
        message: String,
    },
    InvalidCombo {
        check_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyCheckList => write!(f, "proof file contains no checks"),
            ValidationIssue::MissingField { check_id, field } => match check_id {
                Some(id) => write!(f, "check '{id}' missing required field '{field}'"),
                None => write!(f, "check missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { check_id } => {
                write!(f, "check id '{check_id}' is used more than once")
            }
            ValidationIssue::InvalidSelector { check_id, message } => match check_id {
                Some(id) => write!(f, "check '{id}' has an invalid selector: {message}"),
                None => write!(f, "invalid selector: {message}"),
            },
            ValidationIssue::InvalidCombo { check_id, message } => match check_id {
                Some(id) => write!(f, "check '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid check configuration: {message}"),
            },
        }
    }
}
