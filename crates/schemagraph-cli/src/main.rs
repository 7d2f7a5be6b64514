//! schemagraph CLI - JSON Schema and union dispatch generator
//!
//! Commands:
//! - `schemagraph generate` - Write schema files and dispatch code
//! - `schemagraph check` - Validate a schemagraph.toml manifest and resolve it

use clap::{Parser, Subcommand};
use schemagraph_cli::codegen::{FileStatus, WriteMode};
use schemagraph_cli::generate::{self, GenerateOptions};
use schemagraph_cli::logging::{LogLevel, init_logging};
use schemagraph_cli::manifest::{self, DEFAULT_MANIFEST};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schemagraph")]
#[command(author, version, about = "JSON Schema and union dispatch generator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log level (overrides -v)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema files and dispatch code
    Generate {
        /// Path to schemagraph.toml (default: ./schemagraph.toml)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Rewrite every output file
        #[arg(short, long, conflicts_with = "check")]
        force: bool,

        /// Fail if any output file is missing or out of date, writing nothing
        #[arg(short, long)]
        check: bool,

        /// Skip the dispatch code file
        #[arg(long)]
        no_code: bool,
    },

    /// Validate a schemagraph.toml manifest
    Check {
        /// Path to schemagraph.toml (default: ./schemagraph.toml)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .unwrap_or_else(|| LogLevel::from_verbosity(cli.verbose));
    init_logging(level)?;

    match cli.command {
        Commands::Generate {
            manifest,
            force,
            check,
            no_code,
        } => {
            let mode = if check {
                WriteMode::Check
            } else if force {
                WriteMode::Force
            } else {
                WriteMode::Update
            };
            let options = GenerateOptions {
                manifest: manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
                mode,
                emit_code: !no_code,
            };
            run_generate(&options)?;
        }
        Commands::Check { manifest } => {
            manifest::check(manifest.as_deref())?;
        }
    }

    Ok(())
}

fn run_generate(options: &GenerateOptions) -> anyhow::Result<()> {
    println!("Generating from manifest: {}", options.manifest.display());

    let report = generate::run(options)?;

    for file in &report.schemas {
        match file.status {
            FileStatus::Written => println!("✓ Wrote {}", file.path.display()),
            FileStatus::Unchanged => println!("✓ Up to date {}", file.path.display()),
            FileStatus::Stale => println!("✗ Stale {}", file.path.display()),
        }
    }
    if let Some((path, status)) = &report.code_file {
        match status {
            FileStatus::Written => println!("✓ Wrote {} ({} union(s))", path.display(), report.unions),
            FileStatus::Unchanged => println!("✓ Up to date {}", path.display()),
            FileStatus::Stale => println!("✗ Stale {}", path.display()),
        }
    }

    let stale = report.stale();
    if !stale.is_empty() {
        anyhow::bail!(
            "{} generated file(s) are out of date; run `schemagraph generate`",
            stale.len()
        );
    }

    Ok(())
}
