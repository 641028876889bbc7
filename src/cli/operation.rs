//! Operation commands - single operations, batch files and the catalog listing

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use poule::batch::{BatchFile, run_batch};
use poule::config::Config;
use poule::error::Result;
use poule::operations::catalog::{Catalog, OperationDescriptor};
use poule::operations::{RunSummary, run_single_operation};
use poule::settings::FilterSet;
use std::path::Path;

/// Run one operation built from command-line settings
///
/// Configuration, filters and settings are all validated before the first
/// remote call.
pub async fn execute_single_operation(
    config: Config,
    descriptor: &dyn OperationDescriptor,
    settings: &[String],
    filters: &[String],
) -> Result<()> {
    config.validate()?;
    let filters = FilterSet::parse(filters)?;
    let operation = descriptor.from_args(settings)?;
    let cmd = CommandContext::new(config)?;

    print_header(&cmd, operation.name());
    let summaries = run_single_operation(
        &cmd.context(),
        &cmd.config,
        operation.as_ref(),
        &filters,
        &CliProgress,
    )
    .await?;
    print_totals(&summaries, cmd.config.dry_run);
    Ok(())
}

/// Run every operation of a batch file in order
pub async fn execute_batch(config: Config, path: &Path, catalog: &Catalog) -> Result<()> {
    config.validate()?;
    let batch = BatchFile::load(path)?;
    let prepared = batch.prepare(catalog)?;
    let cmd = CommandContext::new(config)?;

    print_header(&cmd, &format!("{} ({} operations)", path.display(), prepared.len()));
    let summaries = run_batch(&cmd.context(), &cmd.config, &prepared, &CliProgress).await?;
    print_totals(&summaries, cmd.config.dry_run);
    Ok(())
}

/// Print the available operations
pub fn list_operations(catalog: &Catalog) {
    println!("{}", "Operations:".emphasis());
    for descriptor in catalog.iter() {
        println!(
            "  {} {}",
            format!("{:<10}", descriptor.name()).accent(),
            descriptor.description()
        );
    }
}

fn print_header(cmd: &CommandContext, what: &str) {
    let mode = if cmd.config.dry_run {
        format!(" {}", "(dry run)".warn())
    } else {
        String::new()
    };
    println!(
        "{} {} on {}{mode}",
        "Running".emphasis(),
        what.accent(),
        cmd.repository.to_string().accent()
    );
}

fn print_totals(summaries: &[RunSummary], dry_run: bool) {
    let line = totals_line(summaries, dry_run);
    if summaries.is_empty() || dry_run {
        println!("{}", line.muted());
    } else {
        println!("{}", line.success());
    }
}

/// One-line outcome; report-only runs are counted apart from changes
fn totals_line(summaries: &[RunSummary], dry_run: bool) -> String {
    if summaries.is_empty() {
        return "Nothing to do for these filters".to_string();
    }

    let (mutating, reporting): (Vec<&RunSummary>, Vec<&RunSummary>) =
        summaries.iter().partition(|s| s.mutating);
    let mut parts = Vec::with_capacity(2);
    if !mutating.is_empty() {
        if dry_run {
            let accepted: usize = mutating.iter().map(|s| s.accepted).sum();
            parts.push(format!("{accepted} item(s) would be changed, nothing was applied"));
        } else {
            let applied: usize = mutating.iter().map(|s| s.applied).sum();
            parts.push(format!("{applied} item(s) changed"));
        }
    }
    if !reporting.is_empty() {
        let accepted: usize = reporting.iter().map(|s| s.accepted).sum();
        parts.push(format!("{accepted} item(s) reported"));
    }
    parts.join(", ")
}
