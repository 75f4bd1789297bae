//! Named query targets: operator rules and the registries that resolve
//! selector names to them.

pub mod operators;
pub mod registry;
pub mod rule;

pub use operators::operator_rules;
pub use registry::{Action, Construct, Registry};
pub use rule::{FieldExtractor, NodePredicate, OptionalParam, Rule};
