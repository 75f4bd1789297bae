use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use code_proof::code::PSEUDO_NAMES;
use code_proof::config::{all_passed, load_from_path, run_checks, CheckStatus, Settings};
use code_proof::{parse_selector, Code, Registry, SelectorParser};
use colored::Colorize;
use log::LevelFilter;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "code-proof")]
#[command(about = "Query PHP syntax trees with selectors and run proof checks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print nodes matching a selector
    Find {
        /// Selector, e.g. `operator[name=equal]:first`
        selector: String,

        /// Files or directories to search (defaults to the configured code path)
        paths: Vec<PathBuf>,

        /// Emit matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a selector is tokenized and parsed
    Parse {
        selector: String,
    },

    /// Run proof checks against a source file
    Check {
        /// Proof file to run (otherwise runs every proof in the proof directory)
        #[arg(short, long)]
        proof: Option<PathBuf>,

        /// Source file to check (defaults to the configured code path)
        path: Option<PathBuf>,
    },

    /// List supported node kinds, names and pseudo-filters
    List,
}

#[derive(Serialize)]
struct MatchReport<'a> {
    path: &'a Path,
    line: usize,
    column: usize,
    kind: &'a str,
    text: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let user_filter = init_logging(cli.verbose);

    let settings = Settings::load()?;
    if settings.verbose && !user_filter {
        log::set_max_level(LevelFilter::Debug);
    }
    log::debug!("settings: {settings:?}");

    match cli.command {
        Commands::Find {
            selector,
            paths,
            json,
        } => cmd_find(&settings, &selector, paths, json),

        Commands::Parse { selector } => cmd_parse(&selector),

        Commands::Check { proof, path } => cmd_check(&settings, proof, path),

        Commands::List => cmd_list(),
    }
}

/// Start logging at `debug` or `warn`. Returns whether `RUST_LOG` chose the
/// levels instead, in which case they are left alone.
fn init_logging(verbose: bool) -> bool {
    let user_filter = env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    if !user_filter {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
    user_filter
}

/// Expand directories into the `.php` files below them, sorted by name.
fn collect_php_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("path does not exist: {}", path.display());
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some("php")
            {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    Ok(files)
}

fn load_code(path: &Path) -> Result<Code> {
    let code = Code::from_path(path).with_context(|| format!("failed to load {}", path.display()))?;
    if code.has_errors() {
        for error in code.syntax_errors() {
            eprintln!(
                "{}",
                format!(
                    "Warning: {}:{}:{}: syntax error",
                    path.display(),
                    error.line,
                    error.column
                )
                .yellow()
            );
        }
    }
    Ok(code)
}

fn cmd_find(settings: &Settings, selector: &str, paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let filter = parse_selector(selector)?;
    let paths = if paths.is_empty() {
        vec![settings.code_file_path.clone()]
    } else {
        paths
    };

    let mut total = 0;
    let mut reports = Vec::new();
    let files = collect_php_files(&paths)?;
    let sources = files
        .iter()
        .map(|file| load_code(file).map(|code| (file, code)))
        .collect::<Result<Vec<_>>>()?;

    for (file, code) in &sources {
        let matches = code.find_filter(&filter)?;
        total += matches.len();

        for node in matches {
            let (line, column) = node.start_point();
            if json {
                reports.push(MatchReport {
                    path: file,
                    line,
                    column,
                    kind: node.kind(),
                    text: node.text(),
                });
            } else {
                let first_line = node.text().lines().next().unwrap_or_default();
                println!(
                    "{}:{}:{} {} {}",
                    file.display(),
                    line,
                    column,
                    node.kind().dimmed(),
                    first_line
                );
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!(
            "{}",
            format!("{} match(es) in {} file(s)", total, files.len()).bold()
        );
    }

    if total == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_parse(selector: &str) -> Result<()> {
    let parser = SelectorParser::new();
    let tokens = parser.tokenize(selector)?;
    let filter = parser.parse(selector)?;

    let output = serde_json::json!({
        "selector": filter.to_string(),
        "tokens": tokens,
        "filter": filter,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run one proof file and print its outcomes. Returns whether all passed.
fn run_proof(proof_path: &Path, code_path: &Path) -> Result<bool> {
    let proof = load_from_path(proof_path)?;
    let code = load_code(code_path)?;

    let title = if proof.meta.name.is_empty() {
        proof_path.display().to_string()
    } else {
        proof.meta.name.clone()
    };
    println!("{} {}", title.bold(), format!("({})", code_path.display()).dimmed());

    let outcomes = run_checks(&code, &proof);
    for outcome in &outcomes {
        match &outcome.status {
            CheckStatus::Passed => {
                println!("  {} {} ({} match(es))", "✓".green(), outcome.id, outcome.matched);
            }
            CheckStatus::Failed { expected } => {
                println!(
                    "  {} {}: expected {}, found {}",
                    "✗".red(),
                    outcome.id,
                    expected,
                    outcome.matched
                );
                if let Some(message) = &outcome.message {
                    println!("    {}", message.dimmed());
                }
            }
            CheckStatus::Error(err) => {
                println!("  {} {}: {}", "✗".red(), outcome.id, err);
            }
            CheckStatus::Invalid { reason } => {
                println!("  {} {}: {}", "✗".red(), outcome.id, reason);
            }
        }
    }

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    println!(
        "  {} passed, {} failed",
        format!("{passed}").green(),
        format!("{}", outcomes.len() - passed).red()
    );
    Ok(all_passed(&outcomes))
}

fn discover_proof_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("toml")
        {
            files.push(entry.path().to_path_buf());
        }
    }

    if files.is_empty() {
        anyhow::bail!("No .toml proof files found in {}", dir.display());
    }
    Ok(files)
}

fn cmd_check(settings: &Settings, proof: Option<PathBuf>, path: Option<PathBuf>) -> Result<()> {
    let mut ok = true;

    if let Some(proof) = proof {
        let path = path.unwrap_or_else(|| settings.code_file_path.clone());
        ok = run_proof(&proof, &path)?;
    } else {
        for proof in discover_proof_files(&settings.proof_dir)? {
            let answer = match &path {
                Some(path) => path.clone(),
                None => settings
                    .answer_for(&proof)
                    .with_context(|| format!("no answer file for {}", proof.display()))?,
            };
            ok &= run_proof(&proof, &answer)?;
            println!();
        }
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_list() -> Result<()> {
    let registry = Registry::standard();

    println!("{}", "Node kinds:".bold());
    for action in code_proof::Action::ALL {
        println!(
            "  {:<16} {:<24} [{}]",
            action.kind_name(),
            action.method_name().dimmed(),
            action.accepted_params().join(", ")
        );
    }

    println!("\n{}", "Operators:".bold());
    for rule in registry.operators() {
        let optional: Vec<_> = rule.allowed_optional_filter().collect();
        println!(
            "  {:<16} {} [{}]",
            rule.name(),
            rule.description().dimmed(),
            optional.join(", ")
        );
    }

    println!("\n{}", "Constructs:".bold());
    println!("  {}", registry.construct_names().join(", "));

    println!("\n{}", "Built-in functions:".bold());
    println!("  {}", registry.builtin_function_names().join(", "));

    println!("\n{}", "Pseudo-filters:".bold());
    println!("  {}", PSEUDO_NAMES.join(", "));

    Ok(())
}
