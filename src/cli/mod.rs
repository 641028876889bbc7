//! Command-line front end

pub mod context;
pub mod logging;
pub mod operation;
pub mod style;

use crate::cli::style::{Stylize, arrow, check};
use anstream::println;
use async_trait::async_trait;
use poule::operations::{Progress, RunSummary};
use poule::types::Item;

pub use operation::{execute_batch, execute_single_operation, list_operations};

/// Prints one line per accepted item and a summary per item kind
#[derive(Debug, Default)]
pub struct CliProgress;

#[async_trait]
impl Progress for CliProgress {
    async fn on_describe(&self, item: &Item, description: &str, dry_run: bool) {
        let marker = if dry_run {
            "[dry-run]".warn()
        } else {
            arrow()
        };
        println!("{marker} {description} {}", item.title().muted());
    }

    async fn on_complete(&self, summary: &RunSummary) {
        let outcome = if summary.mutating {
            format!("{} applied", summary.applied)
        } else {
            format!("{} reported", summary.accepted)
        };
        println!(
            "{} {}: {} seen, {} matched, {outcome}",
            check(),
            format!("{}s", summary.kind).emphasis(),
            summary.seen,
            summary.accepted,
        );
    }
}
