//! Proof files (TOML check lists) and runtime settings.

pub mod loader;
pub mod runner;
pub mod schema;
pub mod settings;

pub use loader::{
    load_from_path, load_from_str, load_settings_from_path, load_settings_from_str, ConfigError,
    Document,
};
pub use runner::{all_passed, run_check, run_checks, CheckOutcome, CheckStatus};
pub use schema::{CheckDefinition, Metadata, ProofFile, ValidationError, ValidationIssue};
pub use settings::{Settings, LOCAL_MODE, MODE_ENV, SETTINGS_FILE};
