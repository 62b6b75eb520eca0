//! # chronofs CLI - Time-Travelling File System
//!
//! Interactive shell over an in-memory chronofs repository.
//!
//! ## Usage
//! ```bash
//! # Start an interactive session
//! chronofs
//!
//! # Run a command script without banner or prompt
//! chronofs --quiet --script commands.txt
//!
//! # Custom configuration and debug logging
//! chronofs --config chronofs.json --verbose
//! ```
//!
//! Logging goes to stderr and honours `CHRONOFS_LOG` (e.g. `CHRONOFS_LOG=debug`).

use anyhow::Context;
use chronofs::{Repository, RepositoryConfig, Shell};
use clap::Parser;
use colored::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// chronofs CLI - per-file version trees with snapshots and rollback
#[derive(Parser)]
#[command(name = "chronofs")]
#[command(version)]
#[command(about = "Time-travelling file system: snapshot, branch and roll back text files in memory")]
#[command(long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the banner and prompt
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CHRONOFS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Disable colors if needed
    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main session runner
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => RepositoryConfig::from_json_file(path)
            .map_err(|e| anyhow::anyhow!(e.user_message()))
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RepositoryConfig::default(),
    };
    let repo = Repository::with_config(config)?;
    let mut shell = Shell::new(repo);

    let interactive = cli.script.is_none() && !cli.quiet;
    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    if !cli.quiet {
        println!("{}", "--- Time-Travelling File System ---".blue().bold());
        println!("Enter 'QUIT' or 'EXIT' to terminate.");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut lines = input.lines();

    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        // End of input ends the session like EXIT
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading command")?;

        let response = shell.execute(&line);
        for text in &response.lines {
            writeln!(out, "{}", paint(text))?;
        }

        if response.exit {
            break;
        }
    }

    Ok(())
}

/// Color a response line by its kind
fn paint(line: &str) -> ColoredString {
    if line.starts_with("Error:") {
        line.red()
    } else if line.starts_with("---") {
        line.blue().bold()
    } else {
        line.normal()
    }
}
