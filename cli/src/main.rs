//! crashsig CLI: driving adapter for the crashsig predicate engine.
//!
//! Subcommands:
//! - `check <file>`: compile every predicate in a descriptor file
//! - `eval <file> <name> (--value V | --absent)`: evaluate one predicate
//! - `backoff`: print the submission retry schedule
//!
//! Descriptor files are JSON (`.json`) or YAML (anything else) and map a
//! predicate name to its kind and descriptor:
//!
//! ```yaml
//! null_deref:
//!   kind: numeric
//!   descriptor: "< 1000"
//! asan_uaf:
//!   kind: text
//!   descriptor: "/heap-use-after-free on address 0x[0-9a-f]+/"
//! ```
//!
//! Logging goes to stderr and is controlled by `CRASHSIG_LOG`
//! (`EnvFilter` syntax, default `warn`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crashsig::submission::RetryPolicy;
use crashsig::{parse_hex, Descriptor, FieldValue, PredicateKind, ValueMatcher};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CRASHSIG_LOG";

#[derive(Debug, Parser)]
#[command(name = "crashsig", version, about = "Crash signature predicate engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate that every predicate in a descriptor file compiles
    Check {
        /// Descriptor file (.json, .yaml or .yml)
        file: PathBuf,
    },
    /// Evaluate one predicate against a candidate value
    Eval {
        /// Descriptor file (.json, .yaml or .yml)
        file: PathBuf,
        /// Name of the predicate in the file
        name: String,
        /// Candidate value (hex for numeric predicates)
        #[arg(long, conflicts_with = "absent")]
        value: Option<String>,
        /// Evaluate against the absent value
        #[arg(long)]
        absent: bool,
    },
    /// Print the submission retry schedule
    Backoff,
}

/// One named entry of a descriptor file.
#[derive(Debug, Deserialize)]
struct Entry {
    kind: PredicateKind,
    descriptor: Descriptor,
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check { file } => cmd_check(&file),
        Command::Eval {
            file,
            name,
            value,
            absent,
        } => cmd_eval(&file, &name, value.as_deref(), absent),
        Command::Backoff => {
            cmd_backoff(&RetryPolicy::default());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if let Err(e) = subscriber.try_init() {
        eprintln!("Failed to init tracing subscriber: {e}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(path: &Path) -> anyhow::Result<()> {
    let entries = load_descriptors(path)?;
    let count = compile_all(&entries)?.len();
    println!("{count} predicates valid");
    Ok(())
}

fn cmd_eval(path: &Path, name: &str, value: Option<&str>, absent: bool) -> anyhow::Result<()> {
    let entries = load_descriptors(path)?;
    let verdict = evaluate(&entries, name, value, absent)?;
    println!("{}", if verdict { "match" } else { "no match" });
    Ok(())
}

fn cmd_backoff(policy: &RetryPolicy) {
    for (attempt, delay) in policy.schedule().enumerate() {
        println!("retry {}: {}s", attempt + 1, delay.as_secs_f64());
    }
    println!("total: {}s", policy.total_wait().as_secs_f64());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile every entry, failing on the first invalid one in name order.
fn compile_all(
    entries: &BTreeMap<String, Entry>,
) -> anyhow::Result<Vec<(&str, Box<dyn ValueMatcher>)>> {
    entries
        .iter()
        .map(|(name, entry)| {
            let matcher = entry
                .kind
                .compile(&entry.descriptor)
                .with_context(|| format!("predicate \"{name}\" is invalid"))?;
            tracing::debug!(name = %name, kind = %entry.kind, "compiled predicate");
            Ok((name.as_str(), matcher))
        })
        .collect()
}

fn evaluate(
    entries: &BTreeMap<String, Entry>,
    name: &str,
    value: Option<&str>,
    absent: bool,
) -> anyhow::Result<bool> {
    let Some(entry) = entries.get(name) else {
        bail!("no predicate named \"{name}\"");
    };
    let matcher = entry
        .kind
        .compile(&entry.descriptor)
        .with_context(|| format!("predicate \"{name}\" is invalid"))?;

    let candidate = match (value, absent) {
        (Some(text), false) => parse_candidate(entry.kind, text)?,
        (None, true) => FieldValue::Absent,
        _ => bail!("exactly one of --value or --absent is required"),
    };
    Ok(matcher.matches_value(&candidate))
}

/// Interpret a command-line candidate for a predicate kind.
fn parse_candidate(kind: PredicateKind, text: &str) -> anyhow::Result<FieldValue> {
    Ok(match kind {
        PredicateKind::Text => FieldValue::from(text),
        PredicateKind::Bytes => FieldValue::from(text.as_bytes().to_vec()),
        PredicateKind::Numeric => FieldValue::from(
            parse_hex(text)
                .with_context(|| format!("candidate \"{text}\" is not a hexadecimal number"))?,
        ),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Descriptor file loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_descriptors(path: &Path) -> anyhow::Result<BTreeMap<String, Entry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    tracing::debug!(path = %path.display(), is_json, "loading descriptor file");

    let entries = if is_json {
        serde_json::from_str(&content).context("JSON parse error")?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).context("YAML parse error")?
    };
    Ok(entries)
}
