//! Spec Command Line Interface
//!
//! Parses a spec, prints its canonical text, and optionally checks type
//! names against the standard registry.
//!
//! # Usage
//!
//! ```bash
//! # Canonical text
//! echo "java.lang.Integer ( 123 )" | spec_cli
//!
//! # Tree as JSON
//! spec_cli --json --file job.spec
//!
//! # Report unknown type names
//! spec_cli --check --file job.spec
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spec_repo::{ConfigLoader, RegistryRepo, Repo, Spec, TypeRegistry};
use spec_types::Urn;

#[derive(Parser)]
#[command(name = "spec_cli")]
#[command(version = "0.1.0")]
#[command(about = "Parse object specs, print canonical text, check type names")]
struct Cli {
    /// Input file (reads stdin if not provided)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print the parsed tree as JSON instead of canonical text
    #[arg(long)]
    json: bool,

    /// Validate type names against the standard registry
    #[arg(long)]
    check: bool,

    /// Config file (defaults to SPEC_REPO_CONFIG, then ./spec-repo.yaml)
    #[arg(long, env = "SPEC_REPO_CONFIG")]
    config: Option<PathBuf>,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for piping
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spec_repo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false when `--check` found errors
fn run(cli: &Cli) -> Result<bool, String> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new(path),
        None => ConfigLoader::from_env(),
    };
    let config = loader.load().map_err(|e| format!("{:#}", e))?;
    let repo = RegistryRepo::with_config(Arc::new(TypeRegistry::standard()), config);

    let source = read_input(cli.file.clone())?;
    let spec = match repo.make(&Urn::anonymous(), &Spec::simple(source.as_str())) {
        Ok(spec) => spec,
        Err(spec_repo::SpecError::Parse(e)) => return Err(e.to_diagnostic(&source).to_string()),
        Err(e) => return Err(e.to_string()),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(spec.root())
            .map_err(|e| format!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", spec.as_text());
    }

    if !cli.check {
        return Ok(true);
    }
    let result = spec.check();
    for diag in &result.diagnostics {
        eprintln!("{}", diag);
    }
    eprintln!(
        "checked {} construct(s), {} unknown type(s), nesting depth {}",
        result.stats.construct_count, result.stats.unknown_type_count, result.stats.max_depth
    );
    Ok(result.is_valid())
}

fn read_input(file: Option<PathBuf>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}
