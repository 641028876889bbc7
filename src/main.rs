//! poule command-line interface

mod cli;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use poule::config::{Config, parse_duration};
use poule::operations::catalog::Catalog;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "poule")]
#[command(version, about = "Mass interact with GitHub issues and pull requests")]
struct Cli {
    /// Delay between mutating GitHub calls (e.g. 500ms, 10s, 1m)
    #[arg(long, global = true, default_value = "10s", value_parser = parse_delay)]
    delay: Duration,

    /// Describe what would be done without changing anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// Target repository (owner/name or GitHub URL)
    #[arg(long, short = 'r', global = true, env = "POULE_REPOSITORY")]
    repository: Option<String>,

    /// GitHub API token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File containing the GitHub API token
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// GitHub Enterprise host (e.g. github.example.com)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Item filter, repeatable (e.g. is=pr, labels=bug, age=2w)
    #[arg(long = "filter", short = 'f', global = true, value_name = "KEY=VALUE")]
    filters: Vec<String>,

    /// Log debug diagnostics to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label items whose body matches a pattern
    Label {
        /// Label and pattern pairs
        #[arg(value_name = "LABEL=PATTERN", required = true)]
        settings: Vec<String>,
    },

    /// Remove labels from closed items
    Clean {
        /// Labels to remove
        #[arg(value_name = "label=NAME", required = true)]
        settings: Vec<String>,
    },

    /// Ping or close inactive issues
    Prune {
        /// Settings: action=ping|close|force-close, outdated=DURATION, comment=TEXT
        #[arg(value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },

    /// Request a rebuild of pull requests with failed statuses
    Rebuild {
        /// Settings: context=NAME (repeatable), label=NAME
        #[arg(value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },

    /// Report items missing a classification label
    Audit {
        /// Settings: prefix=PREFIX (repeatable)
        #[arg(value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },

    /// Run the operations listed in a TOML batch file
    Batch {
        /// Path to the batch file
        file: PathBuf,
    },

    /// List available operations
    Operations,
}

fn parse_delay(raw: &str) -> std::result::Result<Duration, String> {
    parse_duration(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    cli::logging::init(args.verbose);

    let catalog = Catalog::builtin();
    let config = Config {
        delay: args.delay,
        dry_run: args.dry_run,
        repository: args.repository,
        token: args.token,
        token_file: args.token_file,
        host: args.host,
    };

    let (name, settings) = match args.command {
        Commands::Label { settings } => ("label", settings),
        Commands::Clean { settings } => ("clean", settings),
        Commands::Prune { settings } => ("prune", settings),
        Commands::Rebuild { settings } => ("rebuild", settings),
        Commands::Audit { settings } => ("audit", settings),
        Commands::Batch { file } => {
            if !args.filters.is_empty() {
                bail!("--filter is not supported with batch, set filters in the batch file");
            }
            cli::execute_batch(config, &file, &catalog).await?;
            return Ok(());
        }
        Commands::Operations => {
            cli::list_operations(&catalog);
            return Ok(());
        }
    };

    let descriptor = catalog.get(name)?;
    cli::execute_single_operation(config, descriptor, &settings, &args.filters).await?;
    Ok(())
}
