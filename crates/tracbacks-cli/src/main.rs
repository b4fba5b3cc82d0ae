#![forbid(unsafe_code)]

mod cmd;
mod output;
mod store;

use anyhow::Context;
use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::{Path, PathBuf};
use tracbacks_core::config::{self, TracbackConfig};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tracbacks: post back-references between tickets",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of `.tracbacks/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Show the trackbacks a comment would produce",
        long_about = "Scan a comment for ticket references and print the trackback \
                      each referenced ticket would receive. Nothing is written.",
        after_help = "EXAMPLES:\n    # Scan a comment from stdin\n    echo 'fixes #2' | tb scan --ticket 1\n\n    # Scan a file, machine-readable\n    tb scan --ticket 1 comment.txt --json"
    )]
    Scan(cmd::scan::ScanArgs),

    #[command(
        about = "Add a comment to a ticket and post its trackbacks",
        long_about = "Append a comment to a ticket in a JSON ticket store, then post \
                      trackbacks on every existing ticket it references.",
        after_help = "EXAMPLES:\n    # Comment on ticket 1 as alice\n    tb apply --store tickets.json --ticket 1 --author alice comment.txt"
    )]
    Apply(cmd::apply::ApplyArgs),

    #[command(
        about = "Post trackbacks for a ticket's description",
        long_about = "Run the ticket-created hook: scan the ticket's description and \
                      post trackbacks attributed to its reporter.",
        after_help = "EXAMPLES:\n    tb created --store tickets.json --ticket 9"
    )]
    Created(cmd::created::CreatedArgs),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    if let Err(err) = run(&cli, output) {
        // Nothing sensible left to do if stderr itself is gone.
        let _ = output::render_error(output, &err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    debug!(?config, "resolved config");

    match &cli.command {
        Commands::Scan(args) => cmd::scan::run_scan(args, &config, output),
        Commands::Apply(args) => cmd::apply::run_apply(args, &config, output),
        Commands::Created(args) => cmd::created::run_created(args, &config, output),
    }
}

fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<TracbackConfig> {
    if let Some(path) = explicit {
        return Ok(config::load_config_file(path)?);
    }
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    Ok(config::load_project_config(&cwd)?)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TRACBACKS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "tracbacks=debug,info"
        } else {
            "tracbacks=info,warn"
        })
    });

    let format = env::var("TRACBACKS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
